//! Tiebreak functions and the registry that resolves identifiers to them
//!
//! Every function reads the finished [`ScoreTable`]; none depends on another
//! tiebreak's value.

use arbiter_core::{CompetitorId, Outcome, Tiebreak};

use crate::score::ScoreTable;

/// Value for one competitor
pub type ScalarFn = fn(CompetitorId, &ScoreTable) -> f64;

/// Value for `a` when compared against `b` alone
pub type PairwiseFn = fn(CompetitorId, CompetitorId, &ScoreTable) -> f64;

/// A tiebreak as a function value
#[derive(Clone, Copy)]
pub enum TiebreakFn {
    Scalar(ScalarFn),
    Pairwise(PairwiseFn),
}

/// Resolve an identifier to its function
pub fn registry(tiebreak: Tiebreak) -> TiebreakFn {
    match tiebreak {
        Tiebreak::SonnebornBerger => TiebreakFn::Scalar(sonneborn_berger),
        Tiebreak::Buchholz => TiebreakFn::Scalar(buchholz),
        Tiebreak::HeadToHead => TiebreakFn::Pairwise(head_to_head),
        Tiebreak::GamesWon => TiebreakFn::Scalar(games_won),
        Tiebreak::GamePoints => TiebreakFn::Scalar(game_points),
    }
}

/// Opponents' final game points weighted by the result against each.
/// Byes contribute nothing.
pub fn sonneborn_berger(id: CompetitorId, table: &ScoreTable) -> f64 {
    let Some(score) = table.get(id) else {
        return 0.0;
    };

    score
        .encounters
        .iter()
        .filter_map(|e| e.opponent.map(|opp| table.game_points(opp) * e.outcome.fraction()))
        .sum()
}

/// Opponents' final game points regardless of result. Byes contribute nothing.
pub fn buchholz(id: CompetitorId, table: &ScoreTable) -> f64 {
    let Some(score) = table.get(id) else {
        return 0.0;
    };

    score
        .encounters
        .iter()
        .filter_map(|e| e.opponent)
        .map(|opp| table.game_points(opp))
        .sum()
}

/// Match points `a` scored in direct encounters with `b`
pub fn head_to_head(a: CompetitorId, b: CompetitorId, table: &ScoreTable) -> f64 {
    let Some(score) = table.get(a) else {
        return 0.0;
    };

    score
        .encounters
        .iter()
        .filter(|e| e.opponent == Some(b))
        .map(|e| e.match_points)
        .sum()
}

/// Decisive game wins, forfeit wins included
pub fn games_won(id: CompetitorId, table: &ScoreTable) -> f64 {
    table.get(id).map_or(0.0, |s| f64::from(s.wins))
}

pub fn game_points(id: CompetitorId, table: &ScoreTable) -> f64 {
    table.game_points(id)
}

/// Whether the competitor recorded any decisive result against a real opponent
pub fn has_decisive_result(id: CompetitorId, table: &ScoreTable) -> bool {
    table.get(id).is_some_and(|s| {
        s.encounters
            .iter()
            .any(|e| !e.is_bye() && matches!(e.outcome, Outcome::Win | Outcome::Loss))
    })
}

//! Knockout evaluation - who advances from each stage and who takes the event
//!
//! A stage is `legs` consecutive rounds. Every pairing in a stage is decided by
//! counting match wins across its legs; a single-leg stage is decided by the
//! match itself.
//!
//! Level 2 - Phase-level implementation

use arbiter_core::{CompetitorId, DataError, Match, Round, ScoringSystem, Tournament};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::score::validate_match;

/// Two competitors meeting in a stage, with their matches in play order
#[derive(Clone, Debug)]
pub struct Pairing<'a> {
    pub first: CompetitorId,
    /// None when `first` holds a bye
    pub second: Option<CompetitorId>,
    pub matches: Vec<&'a Match>,
}

/// Result of one knockout stage
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StageResult {
    /// Round numbers forming the stage
    pub rounds: Vec<u32>,
    /// Advancing competitors in bracket order
    pub advancing: Vec<CompetitorId>,
}

/// Evaluated knockout bracket
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KnockoutResult {
    /// Stages whose rounds are all completed
    pub stages: Vec<StageResult>,
    /// Set once the final stage is decided with a single survivor
    pub winner: Option<CompetitorId>,
}

impl KnockoutResult {
    pub fn is_complete(&self) -> bool {
        self.winner.is_some()
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Evaluate completed knockout stages in order, stopping at the first stage
/// with an unfinished round
pub fn evaluate_knockout(tournament: &Tournament, legs: usize) -> Result<KnockoutResult, DataError> {
    let legs = legs.max(1);
    let mut stages = Vec::new();
    let mut decided_all = true;

    for rounds in tournament.rounds().chunks(legs) {
        if !rounds.iter().all(Round::is_completed) {
            decided_all = false;
            break;
        }
        let advancing = stage_advancement(tournament, rounds)?;
        tracing::debug!(
            first_round = rounds[0].number(),
            advancing = advancing.len(),
            "knockout stage decided"
        );
        stages.push(StageResult {
            rounds: rounds.iter().map(Round::number).collect(),
            advancing,
        });
    }

    let winner = match stages.last() {
        Some(stage) if decided_all && stage.advancing.len() == 1 => Some(stage.advancing[0]),
        _ => None,
    };

    Ok(KnockoutResult { stages, winner })
}

/// Winner of a finished knockout, if there is one
pub fn knockout_winner(tournament: &Tournament, legs: usize) -> Option<CompetitorId> {
    evaluate_knockout(tournament, legs).ok().and_then(|r| r.winner)
}

pub fn is_knockout_complete(tournament: &Tournament, legs: usize) -> bool {
    knockout_winner(tournament, legs).is_some()
}

// ============================================================================
// Level 2 - Stages
// ============================================================================

/// Competitors advancing from one stage. Every round must be completed and
/// every pairing decided.
pub fn stage_advancement(
    tournament: &Tournament,
    rounds: &[Round],
) -> Result<Vec<CompetitorId>, DataError> {
    for round in rounds {
        if !round.is_completed() {
            return Err(DataError::RoundIncomplete { round: round.number() });
        }
        for m in round.matches() {
            validate_match(tournament, round.number(), m)?;
        }
    }
    let last_round = rounds.last().map_or(0, Round::number);

    stage_pairings(rounds)
        .iter()
        .map(|pairing| {
            aggregate_winner(pairing, tournament.scoring()).ok_or(DataError::UndecidedPairing {
                round: last_round,
                first: pairing.first,
                second: pairing.second.unwrap_or(pairing.first),
            })
        })
        .collect()
}

/// Group a stage's matches by the two competitors involved, in order of first
/// appearance
pub fn stage_pairings(rounds: &[Round]) -> Vec<Pairing<'_>> {
    let mut index: FxHashMap<(CompetitorId, Option<CompetitorId>), usize> = FxHashMap::default();
    let mut pairings: Vec<Pairing<'_>> = Vec::new();

    for m in rounds.iter().flat_map(Round::matches) {
        let key = match m.away() {
            Some(away) => (m.home().min(away), Some(m.home().max(away))),
            None => (m.home(), None),
        };
        match index.get(&key) {
            Some(&i) => pairings[i].matches.push(m),
            None => {
                index.insert(key, pairings.len());
                pairings.push(Pairing {
                    first: m.home(),
                    second: m.away(),
                    matches: vec![m],
                });
            }
        }
    }
    pairings
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Pairing winner: whoever won more of its matches. A bye advances its holder.
pub fn aggregate_winner(pairing: &Pairing<'_>, scoring: &ScoringSystem) -> Option<CompetitorId> {
    let Some(second) = pairing.second else {
        return Some(pairing.first);
    };

    let (mut first_wins, mut second_wins) = (0u32, 0u32);
    for m in &pairing.matches {
        match match_winner(m, scoring) {
            Some(id) if id == pairing.first => first_wins += 1,
            Some(id) if id == second => second_wins += 1,
            _ => {}
        }
    }

    match first_wins.cmp(&second_wins) {
        std::cmp::Ordering::Greater => Some(pairing.first),
        std::cmp::Ordering::Less => Some(second),
        std::cmp::Ordering::Equal => None,
    }
}

/// Winner of one match on aggregate game points; None for a drawn match
pub fn match_winner(m: &Match, scoring: &ScoringSystem) -> Option<CompetitorId> {
    let Some(away) = m.away() else {
        return Some(m.home());
    };

    let (mut home_points, mut away_points) = (0.0, 0.0);
    for game in m.games() {
        for (side, id) in game.sides() {
            let points = scoring.game_points(game.result(), side);
            if id == m.home() {
                home_points += points;
            } else {
                away_points += points;
            }
        }
    }

    let (home_mp, away_mp) = scoring.match_points(home_points, away_points);
    if home_mp > away_mp {
        Some(m.home())
    } else if away_mp > home_mp {
        Some(away)
    } else {
        None
    }
}

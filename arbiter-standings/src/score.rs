//! Score accumulation - walks completed rounds and credits every competitor
//!
//! Level 2 - Phase-level implementation

use std::collections::BTreeMap;

use arbiter_core::{
    CompetitorId, DataError, Format, Game, Match, MatchKind, Outcome, Round, ScoringSystem,
    Side, Tiebreak, Tournament,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// One competitor's view of one match
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Encounter {
    pub round: u32,
    /// None for a bye
    pub opponent: Option<CompetitorId>,
    /// Game points scored in this match
    pub points_for: f64,
    /// Game points the opponent scored
    pub points_against: f64,
    pub match_points: f64,
    pub outcome: Outcome,
    /// Decisive game wins in this match
    pub games_won: u32,
}

impl Encounter {
    pub fn is_bye(&self) -> bool {
        self.opponent.is_none()
    }
}

/// Cumulative results for a competitor
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompetitorScore {
    pub competitor: CompetitorId,
    pub name: Option<String>,
    pub match_points: f64,
    pub game_points: f64,
    /// Games counted, bye games and double forfeits included
    pub games_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub byes: u32,
    /// Subset of `wins` awarded by forfeit
    pub forfeit_wins: u32,
    /// Subset of `losses` awarded by forfeit, double forfeits included
    pub forfeit_losses: u32,
    /// Matches against a real opponent
    pub matches_played: u32,
    pub match_wins: u32,
    pub match_draws: u32,
    pub match_losses: u32,
    /// Computed tiebreak values by identifier
    pub tiebreaks: BTreeMap<Tiebreak, f64>,
    #[serde(skip)]
    pub encounters: Vec<Encounter>,
}

impl CompetitorScore {
    pub fn new(competitor: CompetitorId, name: Option<String>) -> Self {
        Self {
            competitor,
            name,
            match_points: 0.0,
            game_points: 0.0,
            games_played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            byes: 0,
            forfeit_wins: 0,
            forfeit_losses: 0,
            matches_played: 0,
            match_wins: 0,
            match_draws: 0,
            match_losses: 0,
            tiebreaks: BTreeMap::new(),
            encounters: Vec::new(),
        }
    }

    /// Primary ranking score for the format
    pub fn primary_points(&self, format: Format) -> f64 {
        match format {
            Format::Team => self.match_points,
            Format::Lone => self.game_points,
        }
    }

    pub fn tiebreak(&self, tiebreak: Tiebreak) -> Option<f64> {
        self.tiebreaks.get(&tiebreak).copied()
    }

    /// Display name, falling back to the id
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.competitor.to_string())
    }

    fn record_game(&mut self, game: &Game, side: Side, points: f64) {
        let result = game.result();
        self.games_played += 1;
        self.game_points += points;

        match result.outcome(side) {
            Outcome::Win => {
                self.wins += 1;
                if result.is_forfeit() {
                    self.forfeit_wins += 1;
                }
            }
            Outcome::Loss => {
                self.losses += 1;
                if result.is_forfeit() {
                    self.forfeit_losses += 1;
                }
            }
            Outcome::Draw => self.draws += 1,
            Outcome::Bye => self.byes += 1,
        }
    }

    fn record_encounter(&mut self, encounter: Encounter) {
        self.match_points += encounter.match_points;

        if !encounter.is_bye() {
            self.matches_played += 1;
            match encounter.outcome {
                Outcome::Win => self.match_wins += 1,
                Outcome::Draw => self.match_draws += 1,
                Outcome::Loss => self.match_losses += 1,
                Outcome::Bye => {}
            }
        }

        self.encounters.push(encounter);
    }
}

/// Scores for every rostered competitor
#[derive(Clone, Debug)]
pub struct ScoreTable {
    format: Format,
    order: Vec<CompetitorId>,
    scores: FxHashMap<CompetitorId, CompetitorScore>,
    rounds_counted: usize,
}

impl ScoreTable {
    /// Zeroed table holding every roster competitor
    pub fn new(tournament: &Tournament) -> Self {
        let order: Vec<CompetitorId> = tournament.competitors().iter().map(|c| c.id).collect();
        let scores = tournament
            .competitors()
            .iter()
            .map(|c| (c.id, CompetitorScore::new(c.id, c.name.clone())))
            .collect();

        Self {
            format: tournament.format(),
            order,
            scores,
            rounds_counted: 0,
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn rounds_counted(&self) -> usize {
        self.rounds_counted
    }

    pub fn get(&self, id: CompetitorId) -> Option<&CompetitorScore> {
        self.scores.get(&id)
    }

    /// Competitor ids in roster order
    pub fn ids(&self) -> &[CompetitorId] {
        &self.order
    }

    /// Scores in roster order
    pub fn iter(&self) -> impl Iterator<Item = &CompetitorScore> {
        self.order.iter().filter_map(|id| self.scores.get(id))
    }

    /// Final game points, zero for unknown ids
    pub fn game_points(&self, id: CompetitorId) -> f64 {
        self.get(id).map_or(0.0, |s| s.game_points)
    }

    pub fn primary_points(&self, id: CompetitorId) -> f64 {
        self.get(id).map_or(0.0, |s| s.primary_points(self.format))
    }

    pub(crate) fn set_tiebreak(&mut self, id: CompetitorId, tiebreak: Tiebreak, value: f64) {
        if let Some(score) = self.scores.get_mut(&id) {
            score.tiebreaks.insert(tiebreak, value);
        }
    }

    /// Consume the table, yielding scores in roster order
    pub fn into_scores(mut self) -> Vec<CompetitorScore> {
        self.order
            .iter()
            .filter_map(|id| self.scores.remove(id))
            .collect()
    }

    fn score_mut(&mut self, id: CompetitorId, round: u32) -> Result<&mut CompetitorScore, DataError> {
        self.scores
            .get_mut(&id)
            .ok_or(DataError::NotInRoster { round, competitor: id })
    }
}

// ============================================================================
// Level 2 - Accumulation
// ============================================================================

/// Credit every completed round of the tournament
pub fn accumulate(tournament: &Tournament) -> Result<ScoreTable, DataError> {
    let mut table = ScoreTable::new(tournament);

    for round in tournament.rounds() {
        if !round.is_completed() {
            tracing::debug!(round = round.number(), "skipping incomplete round");
            continue;
        }

        credit_round(&mut table, tournament, round)?;
        table.rounds_counted += 1;
    }

    Ok(table)
}

fn credit_round(
    table: &mut ScoreTable,
    tournament: &Tournament,
    round: &Round,
) -> Result<(), DataError> {
    for m in round.matches() {
        validate_match(tournament, round.number(), m)?;

        match m.kind() {
            MatchKind::Lone => credit_lone(table, tournament.scoring(), round.number(), m)?,
            MatchKind::Team => credit_team(table, tournament.scoring(), round.number(), m)?,
        }
    }
    Ok(())
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Check a match against the tournament before crediting it
pub(crate) fn validate_match(tournament: &Tournament, round: u32, m: &Match) -> Result<(), DataError> {
    let expected_kind = match tournament.format() {
        Format::Lone => MatchKind::Lone,
        Format::Team => MatchKind::Team,
    };
    if m.kind() != expected_kind {
        return Err(DataError::FormatMismatch {
            round,
            kind: m.kind().name(),
            format: tournament.format().name(),
        });
    }

    if let Some(competitor) = m.participants().find(|&id| !tournament.is_rostered(id)) {
        return Err(DataError::NotInRoster { round, competitor });
    }

    for game in m.games() {
        if let Some((_, competitor)) = game.sides().find(|&(_, id)| !m.involves(id)) {
            return Err(DataError::ForeignCompetitor {
                round,
                board: game.board(),
                competitor,
            });
        }
        if game.is_bye() && !m.is_bye() {
            let competitor = game.sides().map(|(_, id)| id).next().unwrap_or(m.home());
            return Err(DataError::ByeInMatch {
                round,
                board: game.board(),
                competitor,
            });
        }
    }

    if m.kind() == MatchKind::Team {
        check_boards(tournament, round, m)?;
    }

    Ok(())
}

/// Each board from 1 up to the required count holds exactly one game
fn check_boards(tournament: &Tournament, round: u32, m: &Match) -> Result<(), DataError> {
    let home = m.home();
    let away = m.away().unwrap_or(home);

    let mut seen = FxHashSet::default();
    for game in m.games() {
        if !seen.insert(game.board()) {
            return Err(DataError::DuplicateBoard {
                round,
                home,
                away,
                board: game.board(),
            });
        }
    }

    let highest = m.games().iter().map(|g| g.board() as usize).max().unwrap_or(0);
    let expected = tournament.boards_per_match().unwrap_or(highest);
    if m.games().len() > expected {
        return Err(DataError::ExtraBoards {
            round,
            home,
            away,
            expected,
            found: m.games().len(),
        });
    }

    let found = (1..=expected)
        .filter(|&board| seen.contains(&(board as u32)))
        .count();
    if found < expected {
        return Err(DataError::MissingBoards {
            round,
            home,
            away,
            expected,
            found,
        });
    }
    Ok(())
}

/// Lone match: match points equal game points
fn credit_lone(
    table: &mut ScoreTable,
    scoring: &ScoringSystem,
    round: u32,
    m: &Match,
) -> Result<(), DataError> {
    for game in m.games() {
        for (side, id) in game.sides() {
            let points = scoring.game_points(game.result(), side);
            let opponent = game.on(side.opponent());
            let points_against = if opponent.is_some() {
                scoring.game_points(game.result(), side.opponent())
            } else {
                0.0
            };
            let outcome = game.result().outcome(side);

            let score = table.score_mut(id, round)?;
            score.record_game(game, side, points);
            score.record_encounter(Encounter {
                round,
                opponent,
                points_for: points,
                points_against,
                match_points: points,
                outcome,
                games_won: u32::from(outcome == Outcome::Win),
            });
        }
    }
    Ok(())
}

/// Running board totals for one team within a match
#[derive(Clone, Copy, Debug, Default)]
struct Tally {
    points: f64,
    wins: u32,
}

/// Team match: game points per board, match points once per match
fn credit_team(
    table: &mut ScoreTable,
    scoring: &ScoringSystem,
    round: u32,
    m: &Match,
) -> Result<(), DataError> {
    let home = m.home();
    let Some(away) = m.away() else {
        return credit_team_bye(table, scoring, round, m);
    };

    let mut home_tally = Tally::default();
    let mut away_tally = Tally::default();

    for game in m.games() {
        for (side, id) in game.sides() {
            let points = scoring.game_points(game.result(), side);
            let tally = if id == home { &mut home_tally } else { &mut away_tally };
            tally.points += points;
            if game.result().outcome(side) == Outcome::Win {
                tally.wins += 1;
            }
            table.score_mut(id, round)?.record_game(game, side, points);
        }
    }

    let (home_mp, away_mp) = scoring.match_points(home_tally.points, away_tally.points);

    for (id, opponent, own, other, match_points) in [
        (home, away, home_tally, away_tally, home_mp),
        (away, home, away_tally, home_tally, away_mp),
    ] {
        table.score_mut(id, round)?.record_encounter(Encounter {
            round,
            opponent: Some(opponent),
            points_for: own.points,
            points_against: other.points,
            match_points,
            outcome: aggregate_outcome(own.points, other.points),
            games_won: own.wins,
        });
    }
    Ok(())
}

/// Team bye: a bye game on every board plus the bye match points
fn credit_team_bye(
    table: &mut ScoreTable,
    scoring: &ScoringSystem,
    round: u32,
    m: &Match,
) -> Result<(), DataError> {
    let score = table.score_mut(m.home(), round)?;
    let mut points_for = 0.0;

    for game in m.games() {
        for (side, _) in game.sides() {
            let points = scoring.game_points(game.result(), side);
            points_for += points;
            score.record_game(game, side, points);
        }
    }

    score.record_encounter(Encounter {
        round,
        opponent: None,
        points_for,
        points_against: 0.0,
        match_points: scoring.bye_match_points,
        outcome: Outcome::Bye,
        games_won: 0,
    });
    Ok(())
}

fn aggregate_outcome(points_for: f64, points_against: f64) -> Outcome {
    if points_for > points_against {
        Outcome::Win
    } else if points_for < points_against {
        Outcome::Loss
    } else {
        Outcome::Draw
    }
}

//! Fluent builder for tournament values
//!
//! ```
//! use arbiter_core::{GameResult, TournamentBuilder};
//!
//! let tournament = TournamentBuilder::new()
//!     .competitor(1, "Alice")
//!     .competitor(2, "Bob")
//!     .round(1)
//!     .game(1, 2, GameResult::WhiteWin)
//!     .build()
//!     .unwrap();
//! assert_eq!(tournament.rounds().len(), 1);
//! ```
//!
//! Errors are deferred: the first one recorded is returned by `build()`.

use crate::config::{Format, Tiebreak};
use crate::error::StructuralError;
use crate::game::{Competitor, CompetitorId, Game, GameResult, Side};
use crate::round::{Match, Round};
use crate::scoring::{ScoringPreset, ScoringSystem};
use crate::tournament::Tournament;

#[derive(Clone, Debug)]
struct PendingRound {
    number: u32,
    matches: Vec<Match>,
    completed: bool,
}

/// Builds a [`Tournament`] round by round
#[derive(Clone, Debug, Default)]
pub struct TournamentBuilder {
    format: Format,
    boards: Option<usize>,
    competitors: Vec<Competitor>,
    scoring: ScoringSystem,
    tiebreaks: Vec<Tiebreak>,
    rounds: Vec<PendingRound>,
    error: Option<StructuralError>,
}

impl TournamentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Individual format
    pub fn lone(mut self) -> Self {
        self.format = Format::Lone;
        self.boards = None;
        self
    }

    /// Team format with the given number of boards per match
    pub fn team(mut self, boards: usize) -> Self {
        self.format = Format::Team;
        self.boards = Some(boards);
        self
    }

    pub fn competitor(mut self, id: u32, name: impl Into<String>) -> Self {
        self.competitors.push(Competitor::named(CompetitorId(id), name));
        self
    }

    /// Add unnamed competitors
    pub fn competitors(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.competitors
            .extend(ids.into_iter().map(|id| Competitor::new(CompetitorId(id))));
        self
    }

    pub fn scoring(mut self, scoring: ScoringSystem) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn preset(self, preset: ScoringPreset) -> Self {
        self.scoring(preset.system())
    }

    pub fn tiebreaks(mut self, tiebreaks: impl IntoIterator<Item = Tiebreak>) -> Self {
        self.tiebreaks = tiebreaks.into_iter().collect();
        self
    }

    /// Open a new round; later matches go into it
    pub fn round(mut self, number: u32) -> Self {
        self.rounds.push(PendingRound {
            number,
            matches: Vec::new(),
            completed: true,
        });
        self
    }

    /// Mark the open round as not yet completed
    pub fn incomplete(mut self) -> Self {
        match self.rounds.last_mut() {
            Some(round) => round.completed = false,
            None => self.fail(StructuralError::NoOpenRound),
        }
        self
    }

    /// Add a lone match
    pub fn game(self, white: u32, black: u32, result: GameResult) -> Self {
        let built =
            Game::played(CompetitorId(white), CompetitorId(black), result, 1).and_then(Match::lone);
        self.push_match(built)
    }

    /// Add a lone bye
    pub fn bye(self, competitor: u32) -> Self {
        self.push_match(Ok(Match::lone_bye(CompetitorId(competitor))))
    }

    /// Add a team match. `results` are given per board from team A's point of
    /// view; team A takes white on odd boards and black on even boards.
    pub fn team_match(self, team_a: u32, team_b: u32, results: &[GameResult]) -> Self {
        let boards: Vec<(Side, GameResult)> = results
            .iter()
            .enumerate()
            .map(|(i, &result)| {
                if i % 2 == 0 {
                    (Side::White, result)
                } else {
                    (Side::Black, result.flipped())
                }
            })
            .collect();
        self.team_match_coloured(team_a, team_b, &boards)
    }

    /// Add a team match with explicit colours. Each board gives team A's
    /// colour and the result as recorded, white's score first.
    pub fn team_match_coloured(
        self,
        team_a: u32,
        team_b: u32,
        boards: &[(Side, GameResult)],
    ) -> Self {
        let (a, b) = (CompetitorId(team_a), CompetitorId(team_b));
        let games: Result<Vec<Game>, StructuralError> = boards
            .iter()
            .enumerate()
            .map(|(i, &(colour, result))| {
                let board = i as u32 + 1;
                match colour {
                    Side::White => Game::played(a, b, result, board),
                    Side::Black => Game::played(b, a, result, board),
                }
            })
            .collect();

        self.push_match(games.and_then(|games| Match::team(a, b, games)))
    }

    /// Add a team bye covering every board
    pub fn team_bye(self, team: u32) -> Self {
        let boards = self.boards.unwrap_or(1) as u32;
        self.push_match(Ok(Match::team_bye(CompetitorId(team), boards)))
    }

    /// Give a bye to every roster competitor without a match in the open round
    pub fn auto_byes(mut self) -> Self {
        let Some(round) = self.rounds.last() else {
            self.fail(StructuralError::NoOpenRound);
            return self;
        };

        let idle: Vec<u32> = self
            .competitors
            .iter()
            .map(|c| c.id)
            .filter(|&id| !round.matches.iter().any(|m| m.involves(id)))
            .map(|id| id.0)
            .collect();

        for id in idle {
            self = match self.format {
                Format::Lone => self.bye(id),
                Format::Team => self.team_bye(id),
            };
        }
        self
    }

    /// Validate and return the finished tournament
    pub fn build(self) -> Result<Tournament, StructuralError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let rounds = self
            .rounds
            .into_iter()
            .map(|r| Round::new(r.number, r.matches, r.completed))
            .collect::<Result<Vec<_>, _>>()?;

        Tournament::new(
            self.format,
            self.competitors,
            rounds,
            self.scoring,
            self.tiebreaks,
            self.boards,
        )
    }

    fn push_match(mut self, built: Result<Match, StructuralError>) -> Self {
        match built {
            Ok(m) => match self.rounds.last_mut() {
                Some(round) => round.matches.push(m),
                None => self.fail(StructuralError::NoOpenRound),
            },
            Err(e) => self.fail(e),
        }
        self
    }

    fn fail(&mut self, error: StructuralError) {
        self.error.get_or_insert(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::MatchKind;

    #[test]
    fn test_builds_lone_tournament() {
        let t = TournamentBuilder::new()
            .competitors([1, 2, 3])
            .tiebreaks([Tiebreak::Buchholz])
            .round(1)
            .game(1, 2, GameResult::Draw)
            .bye(3)
            .round(2)
            .game(3, 1, GameResult::BlackWin)
            .incomplete()
            .build()
            .unwrap();

        assert_eq!(t.format(), Format::Lone);
        assert_eq!(t.rounds().len(), 2);
        assert!(!t.rounds()[1].is_completed());
        assert_eq!(t.tiebreaks(), &[Tiebreak::Buchholz]);
    }

    #[test]
    fn test_team_match_alternates_colours() {
        let t = TournamentBuilder::new()
            .team(4)
            .competitors([10, 20])
            .round(1)
            .team_match(
                10,
                20,
                &[
                    GameResult::WhiteWin,
                    GameResult::WhiteWin,
                    GameResult::Draw,
                    GameResult::BlackForfeitWin,
                ],
            )
            .build()
            .unwrap();

        let m = &t.rounds()[0].matches()[0];
        assert_eq!(m.kind(), MatchKind::Team);
        let games = m.games();
        assert_eq!(games[0].white(), Some(CompetitorId(10)));
        assert_eq!(games[0].result(), GameResult::WhiteWin);
        // Board 2: team A on black, so A's win is recorded as a black win
        assert_eq!(games[1].white(), Some(CompetitorId(20)));
        assert_eq!(games[1].result(), GameResult::BlackWin);
        assert_eq!(games[3].result(), GameResult::WhiteForfeitWin);
        assert_eq!(games[3].board(), 4);
    }

    #[test]
    fn test_team_match_with_explicit_colours() {
        let t = TournamentBuilder::new()
            .team(2)
            .competitors([1, 2])
            .round(1)
            .team_match_coloured(
                1,
                2,
                &[(Side::Black, GameResult::WhiteWin), (Side::Black, GameResult::Draw)],
            )
            .build()
            .unwrap();

        let games = t.rounds()[0].matches()[0].games();
        assert_eq!(games[0].white(), Some(CompetitorId(2)));
        assert_eq!(games[0].result(), GameResult::WhiteWin);
        assert_eq!(games[1].black(), Some(CompetitorId(1)));
        assert_eq!(games[1].board(), 2);
    }

    #[test]
    fn test_auto_byes_fill_idle_competitors() {
        let t = TournamentBuilder::new()
            .team(2)
            .competitors([1, 2, 3])
            .round(1)
            .team_match(1, 2, &[GameResult::Draw, GameResult::Draw])
            .auto_byes()
            .build()
            .unwrap();

        let matches = t.rounds()[0].matches();
        assert_eq!(matches.len(), 2);
        assert!(matches[1].is_bye());
        assert_eq!(matches[1].home(), CompetitorId(3));
        assert_eq!(matches[1].games().len(), 2);
    }

    #[test]
    fn test_match_before_round_is_error() {
        let result = TournamentBuilder::new()
            .competitors([1, 2])
            .game(1, 2, GameResult::Draw)
            .build();
        assert_eq!(result.unwrap_err(), StructuralError::NoOpenRound);
    }

    #[test]
    fn test_first_error_wins() {
        let result = TournamentBuilder::new()
            .team(2)
            .competitors([1, 2])
            .round(1)
            .team_match(1, 2, &[])
            .game(1, 1, GameResult::Draw)
            .build();
        assert_eq!(
            result.unwrap_err(),
            StructuralError::EmptyTeamMatch(CompetitorId(1), CompetitorId(2))
        );
    }

    #[test]
    fn test_double_booking_surfaces_on_build() {
        let result = TournamentBuilder::new()
            .competitors([1, 2, 3])
            .round(1)
            .game(1, 2, GameResult::WhiteWin)
            .game(2, 3, GameResult::Draw)
            .build();
        assert_eq!(
            result.unwrap_err(),
            StructuralError::DoubleBooked { round: 1, competitor: CompetitorId(2) }
        );
    }
}

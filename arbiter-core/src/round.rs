//! Matches and rounds

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::StructuralError;
use crate::game::{CompetitorId, Game};

/// Shape of a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// One game between two players, or a single bye game
    Lone,
    /// One game per board between two teams, or a team bye
    Team,
}

impl MatchKind {
    pub fn name(self) -> &'static str {
        match self {
            MatchKind::Lone => "lone",
            MatchKind::Team => "team",
        }
    }
}

/// One pairing event within a round
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Match {
    kind: MatchKind,
    home: CompetitorId,
    away: Option<CompetitorId>,
    games: Vec<Game>,
}

impl Match {
    /// Lone match holding exactly one game
    pub fn lone(game: Game) -> Result<Self, StructuralError> {
        Self::lone_from_games(vec![game])
    }

    /// Lone match from a game list, which must hold exactly one game
    pub fn lone_from_games(mut games: Vec<Game>) -> Result<Self, StructuralError> {
        if games.len() != 1 {
            return Err(StructuralError::LoneMatchGameCount(games.len()));
        }
        let game = games.remove(0);
        let (home, away) = {
            let mut sides = game.sides().map(|(_, id)| id);
            (sides.next(), sides.next())
        };
        // Game::new guarantees at least one side
        let home = home.ok_or(StructuralError::MissingSide { board: game.board() })?;

        Ok(Self {
            kind: MatchKind::Lone,
            home,
            away,
            games: vec![game],
        })
    }

    /// Lone bye
    pub fn lone_bye(competitor: CompetitorId) -> Self {
        Self {
            kind: MatchKind::Lone,
            home: competitor,
            away: None,
            games: vec![Game::bye(competitor, 1)],
        }
    }

    /// Team match; `home` is team A, which takes white on board 1
    pub fn team(
        home: CompetitorId,
        away: CompetitorId,
        games: Vec<Game>,
    ) -> Result<Self, StructuralError> {
        if games.is_empty() {
            return Err(StructuralError::EmptyTeamMatch(home, away));
        }
        if home == away {
            return Err(StructuralError::SelfPairing(home));
        }

        Ok(Self {
            kind: MatchKind::Team,
            home,
            away: Some(away),
            games,
        })
    }

    /// Team bye: a bye game on every board
    pub fn team_bye(team: CompetitorId, boards: u32) -> Self {
        Self {
            kind: MatchKind::Team,
            home: team,
            away: None,
            games: (1..=boards.max(1)).map(|board| Game::bye(team, board)).collect(),
        }
    }

    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    pub fn home(&self) -> CompetitorId {
        self.home
    }

    pub fn away(&self) -> Option<CompetitorId> {
        self.away
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn is_bye(&self) -> bool {
        self.away.is_none()
    }

    /// Competitors taking part in this match
    pub fn participants(&self) -> impl Iterator<Item = CompetitorId> + '_ {
        std::iter::once(self.home).chain(self.away)
    }

    pub fn involves(&self, competitor: CompetitorId) -> bool {
        self.home == competitor || self.away == Some(competitor)
    }

    /// The other participant, if any
    pub fn opponent_of(&self, competitor: CompetitorId) -> Option<CompetitorId> {
        if competitor == self.home {
            self.away
        } else if self.away == Some(competitor) {
            Some(self.home)
        } else {
            None
        }
    }
}

/// Numbered collection of matches
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Round {
    number: u32,
    matches: Vec<Match>,
    completed: bool,
}

impl Round {
    /// Build a round, rejecting any competitor booked in two matches
    pub fn new(number: u32, matches: Vec<Match>, completed: bool) -> Result<Self, StructuralError> {
        let mut seen = FxHashSet::default();
        for competitor in matches.iter().flat_map(Match::participants) {
            if !seen.insert(competitor) {
                return Err(StructuralError::DoubleBooked {
                    round: number,
                    competitor,
                });
            }
        }

        Ok(Self {
            number,
            matches,
            completed,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Copy of this round with a different completion flag
    pub fn with_completed(&self, completed: bool) -> Self {
        Self {
            completed,
            ..self.clone()
        }
    }
}

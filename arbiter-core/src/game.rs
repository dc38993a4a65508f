//! Competitors, game results and single games

use serde::Serialize;
use std::fmt;

use crate::error::StructuralError;

// ============================================================================
// COMPETITORS
// ============================================================================

/// Opaque competitor identifier (a player or a team)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CompetitorId(pub u32);

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Roster entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: Option<String>,
}

impl Competitor {
    pub fn new(id: CompetitorId) -> Self {
        Self { id, name: None }
    }

    pub fn named(id: CompetitorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }

    /// Display name, falling back to the id
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Side of the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

/// Outcome of a game seen from one side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
    Bye,
}

impl Outcome {
    /// Fraction of a full point: 1.0 win, 0.5 draw, 0.0 loss or bye
    pub fn fraction(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Draw => 0.5,
            Outcome::Loss | Outcome::Bye => 0.0,
        }
    }
}

/// Result of a single game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
    WhiteForfeitWin,
    BlackForfeitWin,
    DoubleForfeit,
    Bye,
}

impl GameResult {
    /// Outcome for the given side. A double forfeit is a loss for both.
    pub fn outcome(self, side: Side) -> Outcome {
        match (self, side) {
            (GameResult::WhiteWin | GameResult::WhiteForfeitWin, Side::White) => Outcome::Win,
            (GameResult::WhiteWin | GameResult::WhiteForfeitWin, Side::Black) => Outcome::Loss,
            (GameResult::BlackWin | GameResult::BlackForfeitWin, Side::White) => Outcome::Loss,
            (GameResult::BlackWin | GameResult::BlackForfeitWin, Side::Black) => Outcome::Win,
            (GameResult::Draw, _) => Outcome::Draw,
            (GameResult::DoubleForfeit, _) => Outcome::Loss,
            (GameResult::Bye, _) => Outcome::Bye,
        }
    }

    /// Whether the result was awarded without play
    pub fn is_forfeit(self) -> bool {
        matches!(
            self,
            GameResult::WhiteForfeitWin | GameResult::BlackForfeitWin | GameResult::DoubleForfeit
        )
    }

    /// The same result with colours swapped
    pub fn flipped(self) -> Self {
        match self {
            GameResult::WhiteWin => GameResult::BlackWin,
            GameResult::BlackWin => GameResult::WhiteWin,
            GameResult::WhiteForfeitWin => GameResult::BlackForfeitWin,
            GameResult::BlackForfeitWin => GameResult::WhiteForfeitWin,
            GameResult::Draw => GameResult::Draw,
            GameResult::DoubleForfeit => GameResult::DoubleForfeit,
            GameResult::Bye => GameResult::Bye,
        }
    }
}

// ============================================================================
// GAME
// ============================================================================

/// One board's result. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Game {
    white: Option<CompetitorId>,
    black: Option<CompetitorId>,
    result: GameResult,
    board: u32,
}

impl Game {
    /// Build a game, checking that only a bye leaves a side empty
    pub fn new(
        white: Option<CompetitorId>,
        black: Option<CompetitorId>,
        result: GameResult,
        board: u32,
    ) -> Result<Self, StructuralError> {
        match (white, black, result) {
            (Some(_), None, GameResult::Bye) | (None, Some(_), GameResult::Bye) => {}
            (_, _, GameResult::Bye) => return Err(StructuralError::MalformedBye { board }),
            (Some(w), Some(b), _) if w == b => return Err(StructuralError::SelfPairing(w)),
            (Some(_), Some(_), _) => {}
            _ => return Err(StructuralError::MissingSide { board }),
        }

        Ok(Self {
            white,
            black,
            result,
            board,
        })
    }

    /// Two-sided game
    pub fn played(
        white: CompetitorId,
        black: CompetitorId,
        result: GameResult,
        board: u32,
    ) -> Result<Self, StructuralError> {
        Self::new(Some(white), Some(black), result, board)
    }

    /// Bye game for a single competitor, who is placed on white
    pub fn bye(competitor: CompetitorId, board: u32) -> Self {
        Self {
            white: Some(competitor),
            black: None,
            result: GameResult::Bye,
            board,
        }
    }

    pub fn white(&self) -> Option<CompetitorId> {
        self.white
    }

    pub fn black(&self) -> Option<CompetitorId> {
        self.black
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn board(&self) -> u32 {
        self.board
    }

    pub fn is_bye(&self) -> bool {
        self.result == GameResult::Bye
    }

    /// Competitor on the given side
    pub fn on(&self, side: Side) -> Option<CompetitorId> {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    /// Present sides with their competitors
    pub fn sides(&self) -> impl Iterator<Item = (Side, CompetitorId)> + '_ {
        [Side::White, Side::Black]
            .into_iter()
            .filter_map(move |side| self.on(side).map(|id| (side, id)))
    }
}

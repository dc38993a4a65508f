//! Error types
//!
//! Two kinds fail a scoring pass: [`StructuralError`] when a result value is
//! built, [`DataError`] while a tournament is aggregated. [`ConfigError`]
//! covers parsing of configuration identifiers.

use crate::game::CompetitorId;

/// Invalid shape detected while constructing the result model
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error("team match between {0} and {1} has no games")]
    EmptyTeamMatch(CompetitorId, CompetitorId),

    #[error("lone match must hold exactly one game, got {0}")]
    LoneMatchGameCount(usize),

    #[error("competitor {competitor} is booked more than once in round {round}")]
    DoubleBooked { round: u32, competitor: CompetitorId },

    #[error("bye game on board {board} must have exactly one side present")]
    MalformedBye { board: u32 },

    #[error("non-bye game on board {board} is missing a side")]
    MissingSide { board: u32 },

    #[error("competitor {0} cannot be paired against itself")]
    SelfPairing(CompetitorId),

    #[error("round {found} must come after round {previous}")]
    RoundOrder { previous: u32, found: u32 },

    #[error("competitor {0} is listed twice in the roster")]
    DuplicateCompetitor(CompetitorId),

    #[error("no round is open; call round() first")]
    NoOpenRound,
}

/// Inconsistent results detected during aggregation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("round {round}: team match {home} vs {away} expected {expected} boards, found {found}")]
    MissingBoards {
        round: u32,
        home: CompetitorId,
        away: CompetitorId,
        expected: usize,
        found: usize,
    },

    #[error("round {round}: team match {home} vs {away} has board {board} more than once")]
    DuplicateBoard {
        round: u32,
        home: CompetitorId,
        away: CompetitorId,
        board: u32,
    },

    #[error("round {round}: team match {home} vs {away} has {found} games for {expected} boards")]
    ExtraBoards {
        round: u32,
        home: CompetitorId,
        away: CompetitorId,
        expected: usize,
        found: usize,
    },

    #[error("round {round}: bye for {competitor} on board {board} inside a match against an opponent")]
    ByeInMatch {
        round: u32,
        board: u32,
        competitor: CompetitorId,
    },

    #[error("round {round}: game on board {board} references {competitor}, who is not in the match")]
    ForeignCompetitor {
        round: u32,
        board: u32,
        competitor: CompetitorId,
    },

    #[error("round {round}: competitor {competitor} is not on the roster")]
    NotInRoster { round: u32, competitor: CompetitorId },

    #[error("round {round} is not completed")]
    RoundIncomplete { round: u32 },

    #[error("round {round}: pairing {first} vs {second} has no winner")]
    UndecidedPairing {
        round: u32,
        first: CompetitorId,
        second: CompetitorId,
    },

    #[error("round {round}: {kind} match found in a {format} tournament")]
    FormatMismatch {
        round: u32,
        kind: &'static str,
        format: &'static str,
    },
}

/// Unknown configuration identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown tiebreak: {0}")]
    UnknownTiebreak(String),

    #[error("unknown scoring preset: {0}")]
    UnknownScoringPreset(String),

    #[error("unknown tournament format: {0}")]
    UnknownFormat(String),
}

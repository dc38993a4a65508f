//! Arbiter Core - Tournament result model and scoring
//!
//! This crate provides the value types a standings pass consumes:
//! - Competitors, games and game results
//! - Lone and team matches, rounds, the tournament record
//! - Configurable scoring systems and named presets
//! - Tiebreak and format identifiers
//! - A fluent builder returning validated, immutable tournaments

pub mod builder;
pub mod config;
pub mod error;
pub mod game;
pub mod round;
pub mod scoring;
pub mod tournament;

// Re-exports for convenient access
pub use builder::TournamentBuilder;
pub use config::{Format, Tiebreak};
pub use error::{ConfigError, DataError, StructuralError};
pub use game::{Competitor, CompetitorId, Game, GameResult, Outcome, Side};
pub use round::{Match, MatchKind, Round};
pub use scoring::{ScoringPreset, ScoringSystem};
pub use tournament::Tournament;

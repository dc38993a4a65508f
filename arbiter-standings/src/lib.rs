//! Arbiter Standings - Scoring and ranking of tournament records
//!
//! This crate turns a validated tournament into a ranked standings table:
//! - Score accumulation over completed rounds
//! - Tiebreak functions and their registry
//! - Ranking with shared ranks for genuine ties
//! - Batch scoring of independent tournaments
//! - Knockout stage advancement and the event winner
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: compute_standings, score_many, evaluate_knockout (orchestration)
//! - Level 2: accumulate, stage_advancement (phases)
//! - Level 3: tiebreak functions, rank_competitors (steps)
//! - Level 4: utilities, configuration

mod config;
mod knockout;
mod ranking;
mod score;
mod standings;
mod tiebreak;

pub use config::StandingsConfig;
pub use knockout::{
    aggregate_winner, evaluate_knockout, is_knockout_complete, knockout_winner, match_winner,
    stage_advancement, stage_pairings, KnockoutResult, Pairing, StageResult,
};
pub use ranking::rank_competitors;
pub use score::{accumulate, CompetitorScore, Encounter, ScoreTable};
pub use standings::{compute_standings, score_many, Standing, Standings};
pub use tiebreak::{
    buchholz, game_points, games_won, has_decisive_result, head_to_head, registry,
    sonneborn_berger, PairwiseFn, ScalarFn, TiebreakFn,
};

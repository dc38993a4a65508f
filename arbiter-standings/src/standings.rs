//! Standings computation - the ranked result of a tournament
//!
//! Level 1 - Orchestration

use arbiter_core::{CompetitorId, DataError, Format, Tiebreak, Tournament};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::config::StandingsConfig;
use crate::ranking::rank_competitors;
use crate::score::{accumulate, CompetitorScore};

/// One row of the standings table
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Standing {
    /// Competition rank; tied competitors share it
    pub rank: u32,
    pub competitor: CompetitorId,
    pub score: CompetitorScore,
}

/// Ranked result of a tournament
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Standings {
    pub format: Format,
    /// Tiebreaks in the order they were applied
    pub tiebreaks: Vec<Tiebreak>,
    /// Completed rounds that contributed
    pub rounds_counted: usize,
    /// Rows sorted by rank, ties by ascending competitor id
    pub standings: Vec<Standing>,
}

impl Standings {
    /// First row, if any competitors exist
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }

    /// First N rows
    pub fn top_n(&self, n: usize) -> &[Standing] {
        let n = n.min(self.standings.len());
        &self.standings[..n]
    }

    pub fn standing_for(&self, competitor: CompetitorId) -> Option<&Standing> {
        self.standings.iter().find(|s| s.competitor == competitor)
    }

    /// Whether the competitor shares its rank with anyone else
    pub fn is_tied(&self, competitor: CompetitorId) -> bool {
        let Some(standing) = self.standing_for(competitor) else {
            return false;
        };
        self.standings
            .iter()
            .any(|s| s.rank == standing.rank && s.competitor != competitor)
    }

    pub fn len(&self) -> usize {
        self.standings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Standing> {
        self.standings.iter()
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Compute standings for one tournament
///
/// # Arguments
/// * `tournament` - Validated tournament record
///
/// # Returns
/// Ranked standings, or the first inconsistency found in a completed round
pub fn compute_standings(tournament: &Tournament) -> Result<Standings, DataError> {
    let mut table = accumulate(tournament)?;
    let ranked = rank_competitors(&mut table, tournament.tiebreaks());
    let rounds_counted = table.rounds_counted();

    let mut scores: FxHashMap<CompetitorId, CompetitorScore> = table
        .into_scores()
        .into_iter()
        .map(|s| (s.competitor, s))
        .collect();

    let standings: Vec<Standing> = ranked
        .into_iter()
        .filter_map(|(rank, competitor)| {
            scores.remove(&competitor).map(|score| Standing {
                rank,
                competitor,
                score,
            })
        })
        .collect();

    tracing::debug!(
        competitors = standings.len(),
        rounds = rounds_counted,
        "computed standings"
    );

    Ok(Standings {
        format: tournament.format(),
        tiebreaks: tournament.tiebreaks().to_vec(),
        rounds_counted,
        standings,
    })
}

/// Score independent tournaments, results in input order
pub fn score_many(
    tournaments: &[Tournament],
    config: &StandingsConfig,
) -> Vec<Result<Standings, DataError>> {
    tracing::info!(
        tournaments = tournaments.len(),
        parallel = config.parallel,
        "scoring tournaments"
    );

    if config.parallel {
        tournaments.par_iter().map(compute_standings).collect()
    } else {
        tournaments.iter().map(compute_standings).collect()
    }
}

//! Standings command - score tournament files and print the tables
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_all(), apply_overrides(), report()
//! - Level 3: override steps
//! - Level 4: argument definitions

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use arbiter_core::{ScoringPreset, Tiebreak, Tournament};
use arbiter_standings::{score_many, Standings, StandingsConfig};

use crate::ingest::load_tournament;
use crate::report::{render_json, render_text, FileReport};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct StandingsArgs {
    /// Tournament files (JSON or TRF16)
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the scoring preset (standard, alternative, football)
    #[arg(long, value_name = "PRESET")]
    pub scoring: Option<ScoringPreset>,

    /// Override the tiebreak order, comma separated
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub tiebreaks: Option<Vec<Tiebreak>>,

    /// Treat a round as not yet completed (repeatable)
    #[arg(long = "exclude-round", value_name = "N")]
    pub exclude_rounds: Vec<u32>,

    /// Score files one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Show only the first N rows of each text table
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run standings command
///
/// 1. Load every tournament file
/// 2. Apply command-line overrides
/// 3. Score all tournaments
/// 4. Report
pub fn run(args: StandingsArgs) -> Result<()> {
    let tournaments = load_all(&args.files)?;
    let tournaments: Vec<Tournament> = tournaments
        .iter()
        .map(|t| apply_overrides(t, &args))
        .collect();

    let config = StandingsConfig::default().with_parallel(!args.sequential);
    let results = score_many(&tournaments, &config);

    let mut scored = Vec::with_capacity(results.len());
    for (path, result) in args.files.iter().zip(results) {
        let standings =
            result.with_context(|| format!("Failed to score tournament: {}", path.display()))?;
        scored.push((path.display().to_string(), standings));
    }

    report(&scored, args.json, args.top)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_all(files: &[PathBuf]) -> Result<Vec<Tournament>> {
    files
        .iter()
        .map(|path| {
            let tournament = load_tournament(path)?;
            tracing::info!(
                "Loaded {}: {} competitors, {} rounds",
                path.display(),
                tournament.competitors().len(),
                tournament.rounds().len()
            );
            Ok(tournament)
        })
        .collect()
}

fn apply_overrides(tournament: &Tournament, args: &StandingsArgs) -> Tournament {
    let mut tournament = tournament.clone();

    if let Some(preset) = args.scoring {
        tournament = tournament.with_scoring(preset.system());
    }
    if let Some(tiebreaks) = &args.tiebreaks {
        tournament = tournament.with_tiebreaks(tiebreaks.clone());
    }
    for &number in &args.exclude_rounds {
        tournament = exclude_round(&tournament, number);
    }
    tournament
}

fn report(scored: &[(String, Standings)], json: bool, top: Option<usize>) -> Result<()> {
    if json {
        let reports: Vec<FileReport<'_>> = scored
            .iter()
            .map(|(file, standings)| FileReport {
                file: file.clone(),
                standings,
            })
            .collect();
        println!("{}", render_json(&reports)?);
    } else {
        for (file, standings) in scored {
            print!("{}", render_text(file, standings, top));
        }
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Mark one round incomplete, warning when the round does not exist
fn exclude_round(tournament: &Tournament, number: u32) -> Tournament {
    if !tournament.rounds().iter().any(|r| r.number() == number) {
        tracing::warn!("Round {} not found; nothing excluded", number);
    }
    tournament.with_round_completed(number, false)
}

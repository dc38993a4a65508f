//! Knockout command - stage advancement and the event winner

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use arbiter_standings::evaluate_knockout;

use crate::ingest::load_tournament;
use crate::report::{render_knockout, render_knockout_json};

#[derive(Args)]
pub struct KnockoutArgs {
    /// Tournament file (JSON or TRF16)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Rounds per stage, e.g. 2 for home-and-away ties
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub legs: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run knockout command
///
/// 1. Load the tournament
/// 2. Decide every completed stage
/// 3. Report advancement and the winner
pub fn run(args: KnockoutArgs) -> Result<()> {
    let tournament = load_tournament(&args.file)?;
    let result = evaluate_knockout(&tournament, args.legs as usize)
        .with_context(|| format!("Failed to evaluate knockout: {}", args.file.display()))?;

    match result.winner {
        Some(winner) => tracing::info!("{} decided: winner {}", args.file.display(), winner),
        None => tracing::info!(
            "{}: {} stages decided, no winner yet",
            args.file.display(),
            result.stages.len()
        ),
    }

    if args.json {
        println!("{}", render_knockout_json(&result)?);
    } else {
        print!(
            "{}",
            render_knockout(&args.file.display().to_string(), &tournament, &result)
        );
    }
    Ok(())
}

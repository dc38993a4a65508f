//! Validate command - check tournament files without printing standings

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;

use arbiter_standings::compute_standings;

use crate::ingest::load_tournament;

#[derive(Args)]
pub struct ValidateArgs {
    /// Tournament files (JSON or TRF16)
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

/// Run validate command
///
/// Every file is checked; the command fails if any file did.
pub fn run(args: ValidateArgs) -> Result<()> {
    let mut failures = 0;

    for path in &args.files {
        match validate_file(path) {
            Ok(summary) => println!("ok    {}: {}", path.display(), summary),
            Err(e) => {
                failures += 1;
                println!("error {}: {:#}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} files failed validation", failures, args.files.len());
    }
    Ok(())
}

/// Structural checks on load, data checks through a full scoring pass
fn validate_file(path: &Path) -> Result<String> {
    let tournament = load_tournament(path)?;
    let standings = compute_standings(&tournament)?;

    let skipped = tournament.rounds().len() - standings.rounds_counted;
    tracing::debug!("{} validated, {} incomplete rounds", path.display(), skipped);

    Ok(format!(
        "{} competitors, {} of {} rounds completed",
        standings.len(),
        standings.rounds_counted,
        tournament.rounds().len()
    ))
}

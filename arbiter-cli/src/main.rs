//! Arbiter CLI - Command-line interface
//!
//! Commands:
//! - standings: Score tournament files and print standings
//! - validate: Check tournament files for structural and data errors
//! - knockout: Decide knockout stages and the event winner

mod ingest;
mod knockout_cmd;
mod report;
mod standings_cmd;
mod trf;
mod validate_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use knockout_cmd::KnockoutArgs;
use standings_cmd::StandingsArgs;
use validate_cmd::ValidateArgs;

#[derive(Parser)]
#[command(name = "arbiter")]
#[command(about = "Chess tournament scoring and standings")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute standings for one or more tournaments
    Standings(StandingsArgs),
    /// Validate tournament files
    Validate(ValidateArgs),
    /// Evaluate a knockout bracket
    Knockout(KnockoutArgs),
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Standings(args) => standings_cmd::run(args),
        Commands::Validate(args) => validate_cmd::run(args),
        Commands::Knockout(args) => knockout_cmd::run(args),
    }
}

/// Log to stderr, filtered by RUST_LOG (default: info)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

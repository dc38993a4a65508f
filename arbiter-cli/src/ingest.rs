//! Ingest - JSON tournament documents to tournament values
//!
//! Result notation is parsed here; the core only sees typed results.
//!
//! ```json
//! {
//!   "format": "team",
//!   "boards": 2,
//!   "scoring": "standard",
//!   "tiebreaks": ["game_points", "head_to_head"],
//!   "competitors": [{ "id": 1, "name": "Knights" }, { "id": 2 }, { "id": 3 }],
//!   "rounds": [
//!     { "number": 1, "matches": [
//!       { "home": 1, "away": 2, "boards": ["1-0", "1/2-1/2"] },
//!       { "team_bye": 3 }
//!     ] }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use arbiter_core::{Format, GameResult, ScoringPreset, Tiebreak, Tournament, TournamentBuilder};

use crate::trf::parse_trf;

// ============================================================================
// DOCUMENT SCHEMA (Level 4 - Configuration)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TournamentDoc {
    #[serde(default = "default_format")]
    format: String,
    boards: Option<usize>,
    scoring: Option<String>,
    bye_game_points: Option<f64>,
    bye_match_points: Option<f64>,
    #[serde(default)]
    tiebreaks: Vec<String>,
    competitors: Vec<CompetitorDoc>,
    #[serde(default)]
    rounds: Vec<RoundDoc>,
}

#[derive(Debug, Deserialize)]
struct CompetitorDoc {
    id: u32,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoundDoc {
    number: u32,
    #[serde(default = "default_completed")]
    completed: bool,
    /// Give a bye to every competitor left without a match
    #[serde(default)]
    auto_byes: bool,
    #[serde(default)]
    matches: Vec<MatchDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MatchDoc {
    Lone {
        white: u32,
        black: u32,
        result: String,
    },
    /// Board results from the home team's point of view
    Team {
        home: u32,
        away: u32,
        boards: Vec<String>,
    },
    Bye {
        bye: u32,
    },
    TeamBye {
        team_bye: u32,
    },
}

fn default_format() -> String {
    "lone".to_string()
}

fn default_completed() -> bool {
    true
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Read and build a tournament from a JSON or TRF16 file
pub fn load_tournament(path: &Path) -> Result<Tournament> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tournament file: {}", path.display()))?;

    let parsed = if is_trf(path, &text) {
        parse_trf(&text)
    } else {
        parse_tournament(&text)
    };
    parsed.with_context(|| format!("Failed to load tournament: {}", path.display()))
}

/// TRF files by extension, or by a leading `012` tournament-name record
fn is_trf(path: &Path, text: &str) -> bool {
    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("trf") || ext.eq_ignore_ascii_case("trfx"));
    by_extension || text.trim_start().starts_with("012 ")
}

/// Build a tournament from JSON text
pub fn parse_tournament(text: &str) -> Result<Tournament> {
    let doc: TournamentDoc =
        serde_json::from_str(text).context("Malformed tournament document")?;
    build_tournament(doc)
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn build_tournament(doc: TournamentDoc) -> Result<Tournament> {
    let format: Format = doc.format.parse()?;
    let mut builder = match (format, doc.boards) {
        (Format::Lone, _) => TournamentBuilder::new().lone(),
        (Format::Team, Some(boards)) if boards > 0 => TournamentBuilder::new().team(boards),
        (Format::Team, _) => bail!("team tournaments need a positive \"boards\" count"),
    };

    let preset: ScoringPreset = match &doc.scoring {
        Some(name) => name.parse()?,
        None => ScoringPreset::Standard,
    };
    let defaults = preset.system();
    let scoring = defaults.with_bye(
        doc.bye_game_points.unwrap_or(defaults.bye_game_points),
        doc.bye_match_points.unwrap_or(defaults.bye_match_points),
    );

    let tiebreaks = doc
        .tiebreaks
        .iter()
        .map(|name| name.parse::<Tiebreak>())
        .collect::<Result<Vec<_>, _>>()?;

    builder = builder.scoring(scoring).tiebreaks(tiebreaks);

    for competitor in doc.competitors {
        builder = match competitor.name {
            Some(name) => builder.competitor(competitor.id, name),
            None => builder.competitors([competitor.id]),
        };
    }

    for round in doc.rounds {
        builder = add_round(builder, round)?;
    }

    let tournament = builder.build().context("Invalid tournament structure")?;
    Ok(tournament)
}

fn add_round(builder: TournamentBuilder, round: RoundDoc) -> Result<TournamentBuilder> {
    let mut builder = builder.round(round.number);
    if !round.completed {
        builder = builder.incomplete();
    }

    for m in round.matches {
        builder = match m {
            MatchDoc::Lone { white, black, result } => {
                let result = parse_result(&result)
                    .with_context(|| format!("Round {}: {} vs {}", round.number, white, black))?;
                builder.game(white, black, result)
            }
            MatchDoc::Team { home, away, boards } => {
                let results = boards
                    .iter()
                    .map(|notation| parse_result(notation))
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("Round {}: {} vs {}", round.number, home, away))?;
                builder.team_match(home, away, &results)
            }
            MatchDoc::Bye { bye } => builder.bye(bye),
            MatchDoc::TeamBye { team_bye } => builder.team_bye(team_bye),
        };
    }

    if round.auto_byes {
        builder = builder.auto_byes();
    }
    Ok(builder)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Parse result notation, white's score first
pub fn parse_result(notation: &str) -> Result<GameResult> {
    let result = match notation.trim().to_ascii_uppercase().as_str() {
        "1-0" => GameResult::WhiteWin,
        "0-1" => GameResult::BlackWin,
        "1/2-1/2" | "½-½" => GameResult::Draw,
        "1X-0F" => GameResult::WhiteForfeitWin,
        "0F-1X" => GameResult::BlackForfeitWin,
        "0F-0F" => GameResult::DoubleForfeit,
        _ => bail!("Unknown result notation: {:?}", notation),
    };
    Ok(result)
}

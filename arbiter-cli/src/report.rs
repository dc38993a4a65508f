//! Report rendering - standings and knockout results as text or JSON

use anyhow::{Context, Result};
use serde::Serialize;

use arbiter_core::{CompetitorId, Format, Tournament};
use arbiter_standings::{KnockoutResult, Standing, Standings};

/// Standings for one input file
#[derive(Serialize)]
pub struct FileReport<'a> {
    pub file: String,
    pub standings: &'a Standings,
}

/// Render reports as pretty JSON
pub fn render_json(reports: &[FileReport<'_>]) -> Result<String> {
    serde_json::to_string_pretty(reports).context("Failed to serialize standings")
}

/// Render one standings table as aligned text, optionally only the first rows
pub fn render_text(title: &str, standings: &Standings, top: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n=== {} ({} rounds) ===\n",
        title, standings.rounds_counted
    ));

    let mut header = format!("{:>4}  {:<24}", "Rank", "Competitor");
    if standings.format == Format::Team {
        header.push_str(&format!(" {:>6}", "MP"));
    }
    header.push_str(&format!(" {:>6} {:>4} {:>4} {:>4} {:>4}", "GP", "W", "D", "L", "Bye"));
    for tiebreak in &standings.tiebreaks {
        header.push_str(&format!(" {:>6}", tiebreak.abbreviation()));
    }
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(header.len()));
    out.push('\n');

    let rows = match top {
        Some(n) => standings.top_n(n),
        None => standings.standings.as_slice(),
    };
    for standing in rows {
        out.push_str(&render_row(standing, standings));
        out.push('\n');
    }
    out
}

/// Render knockout stages as pretty JSON
pub fn render_knockout_json(result: &KnockoutResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize knockout result")
}

/// Render advancement per stage and the winner
pub fn render_knockout(title: &str, tournament: &Tournament, result: &KnockoutResult) -> String {
    let label = |id: CompetitorId| {
        tournament
            .competitor(id)
            .map_or_else(|| id.to_string(), |c| c.label())
    };

    let mut out = format!("\n=== {} (knockout) ===\n", title);
    for (i, stage) in result.stages.iter().enumerate() {
        let rounds: Vec<String> = stage.rounds.iter().map(u32::to_string).collect();
        let advancing: Vec<String> = stage.advancing.iter().map(|&id| label(id)).collect();
        out.push_str(&format!(
            "Stage {} (rounds {}): {}\n",
            i + 1,
            rounds.join(", "),
            advancing.join(", ")
        ));
    }
    match result.winner {
        Some(id) => out.push_str(&format!("Winner: {}\n", label(id))),
        None => out.push_str("Winner: undecided\n"),
    }
    out
}

fn render_row(standing: &Standing, standings: &Standings) -> String {
    let score = &standing.score;
    let rank = if standings.is_tied(standing.competitor) {
        format!("{}=", standing.rank)
    } else {
        standing.rank.to_string()
    };

    let mut row = format!("{:>4}  {:<24}", rank, truncate(&score.label(), 24));
    if standings.format == Format::Team {
        row.push_str(&format!(" {:>6}", points(score.match_points)));
    }
    row.push_str(&format!(
        " {:>6} {:>4} {:>4} {:>4} {:>4}",
        points(score.game_points),
        score.wins,
        score.draws,
        score.losses,
        score.byes
    ));
    for &tiebreak in &standings.tiebreaks {
        let value = score.tiebreak(tiebreak).map_or("-".to_string(), points);
        row.push_str(&format!(" {:>6}", value));
    }
    row
}

/// Points without a trailing `.0`
fn points(value: f64) -> String {
    format!("{}", value)
}

fn truncate(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

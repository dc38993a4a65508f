//! Configuration identifiers: tournament format and tiebreaks

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Tournament format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Player against player, one game per match
    Lone,
    /// Team against team, one game per board
    Team,
}

impl Default for Format {
    fn default() -> Self {
        Format::Lone
    }
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Format::Lone => "lone",
            Format::Team => "team",
        }
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lone" | "individual" => Ok(Format::Lone),
            "team" => Ok(Format::Team),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

/// Tiebreak identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tiebreak {
    SonnebornBerger,
    Buchholz,
    HeadToHead,
    GamesWon,
    GamePoints,
}

impl Tiebreak {
    pub const ALL: [Tiebreak; 5] = [
        Tiebreak::SonnebornBerger,
        Tiebreak::Buchholz,
        Tiebreak::HeadToHead,
        Tiebreak::GamesWon,
        Tiebreak::GamePoints,
    ];

    /// Identifier used in configuration and reports
    pub fn name(self) -> &'static str {
        match self {
            Tiebreak::SonnebornBerger => "sonneborn_berger",
            Tiebreak::Buchholz => "buchholz",
            Tiebreak::HeadToHead => "head_to_head",
            Tiebreak::GamesWon => "games_won",
            Tiebreak::GamePoints => "game_points",
        }
    }

    /// Short column header
    pub fn abbreviation(self) -> &'static str {
        match self {
            Tiebreak::SonnebornBerger => "SB",
            Tiebreak::Buchholz => "Buch",
            Tiebreak::HeadToHead => "H2H",
            Tiebreak::GamesWon => "GW",
            Tiebreak::GamePoints => "GP",
        }
    }
}

impl fmt::Display for Tiebreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tiebreak {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Tiebreak::ALL
            .into_iter()
            .find(|tb| tb.name() == normalized || tb.abbreviation().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownTiebreak(s.to_string()))
    }
}

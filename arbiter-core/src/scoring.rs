//! Scoring systems: game results to points, board totals to match points

use serde::Serialize;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::game::{GameResult, Outcome, Side};

/// Point values for games and matches
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoringSystem {
    pub game_win: f64,
    pub game_draw: f64,
    pub game_loss: f64,

    pub match_win: f64,
    pub match_draw: f64,
    pub match_loss: f64,

    /// Game points credited for each bye game
    pub bye_game_points: f64,
    /// Match points credited for a team bye
    pub bye_match_points: f64,
}

impl Default for ScoringSystem {
    fn default() -> Self {
        ScoringPreset::Standard.system()
    }
}

impl ScoringSystem {
    /// Game points for one side of a game. Forfeits score like ordinary
    /// results; a double forfeit scores nothing for either side.
    pub fn game_points(&self, result: GameResult, side: Side) -> f64 {
        match result {
            GameResult::DoubleForfeit => 0.0,
            _ => match result.outcome(side) {
                Outcome::Win => self.game_win,
                Outcome::Draw => self.game_draw,
                Outcome::Loss => self.game_loss,
                Outcome::Bye => self.bye_game_points,
            },
        }
    }

    /// Match points for both teams from their aggregate board scores
    pub fn match_points(&self, points_for: f64, points_against: f64) -> (f64, f64) {
        if points_for > points_against {
            (self.match_win, self.match_loss)
        } else if points_for < points_against {
            (self.match_loss, self.match_win)
        } else {
            (self.match_draw, self.match_draw)
        }
    }

    /// Set bye values
    pub fn with_bye(mut self, game_points: f64, match_points: f64) -> Self {
        self.bye_game_points = game_points;
        self.bye_match_points = match_points;
        self
    }
}

/// Named scoring configurations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPreset {
    /// 1 / ½ / 0 per game, 2-1-0 per team match
    Standard,
    /// 1 / ½ / 0 per game, 3-1-0 per team match
    Alternative,
    /// 3 / 1 / 0 per game and per team match
    Football,
}

impl ScoringPreset {
    pub fn name(self) -> &'static str {
        match self {
            ScoringPreset::Standard => "standard",
            ScoringPreset::Alternative => "alternative",
            ScoringPreset::Football => "football",
        }
    }

    /// Resolve to explicit numbers. Byes are worth a full win.
    pub fn system(self) -> ScoringSystem {
        let (game_win, game_draw, match_win, match_draw) = match self {
            ScoringPreset::Standard => (1.0, 0.5, 2.0, 1.0),
            ScoringPreset::Alternative => (1.0, 0.5, 3.0, 1.0),
            ScoringPreset::Football => (3.0, 1.0, 3.0, 1.0),
        };

        ScoringSystem {
            game_win,
            game_draw,
            game_loss: 0.0,
            match_win,
            match_draw,
            match_loss: 0.0,
            bye_game_points: game_win,
            bye_match_points: match_win,
        }
    }
}

impl FromStr for ScoringPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "2-1-0" => Ok(ScoringPreset::Standard),
            "alternative" | "3-1-0" => Ok(ScoringPreset::Alternative),
            "football" => Ok(ScoringPreset::Football),
            _ => Err(ConfigError::UnknownScoringPreset(s.to_string())),
        }
    }
}

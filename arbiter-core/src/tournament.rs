//! Tournament value: roster, rounds and scoring configuration

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::config::{Format, Tiebreak};
use crate::error::StructuralError;
use crate::game::{Competitor, CompetitorId};
use crate::round::Round;
use crate::scoring::ScoringSystem;

/// Complete tournament record. Immutable once built; modifying helpers
/// return new values.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tournament {
    format: Format,
    competitors: Vec<Competitor>,
    rounds: Vec<Round>,
    scoring: ScoringSystem,
    tiebreaks: Vec<Tiebreak>,
    boards_per_match: Option<usize>,
}

impl Tournament {
    /// Build a tournament, checking roster uniqueness and round order
    pub fn new(
        format: Format,
        competitors: Vec<Competitor>,
        rounds: Vec<Round>,
        scoring: ScoringSystem,
        tiebreaks: Vec<Tiebreak>,
        boards_per_match: Option<usize>,
    ) -> Result<Self, StructuralError> {
        let mut seen = FxHashSet::default();
        for competitor in &competitors {
            if !seen.insert(competitor.id) {
                return Err(StructuralError::DuplicateCompetitor(competitor.id));
            }
        }

        for pair in rounds.windows(2) {
            if pair[1].number() <= pair[0].number() {
                return Err(StructuralError::RoundOrder {
                    previous: pair[0].number(),
                    found: pair[1].number(),
                });
            }
        }

        Ok(Self {
            format,
            competitors,
            rounds,
            scoring,
            tiebreaks,
            boards_per_match,
        })
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn scoring(&self) -> &ScoringSystem {
        &self.scoring
    }

    pub fn tiebreaks(&self) -> &[Tiebreak] {
        &self.tiebreaks
    }

    /// Required boards per team match, when known
    pub fn boards_per_match(&self) -> Option<usize> {
        self.boards_per_match
    }

    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    pub fn is_rostered(&self, id: CompetitorId) -> bool {
        self.competitor(id).is_some()
    }

    /// Rounds that count towards standings
    pub fn completed_rounds(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter().filter(|r| r.is_completed())
    }

    /// Copy with the given round's completion flag changed.
    /// Unknown round numbers leave the copy unchanged.
    pub fn with_round_completed(&self, number: u32, completed: bool) -> Self {
        let rounds = self
            .rounds
            .iter()
            .map(|r| {
                if r.number() == number {
                    r.with_completed(completed)
                } else {
                    r.clone()
                }
            })
            .collect();

        Self {
            rounds,
            ..self.clone()
        }
    }

    /// Copy scored under a different system
    pub fn with_scoring(&self, scoring: ScoringSystem) -> Self {
        Self {
            scoring,
            ..self.clone()
        }
    }

    /// Copy ranked with a different tiebreak order
    pub fn with_tiebreaks(&self, tiebreaks: Vec<Tiebreak>) -> Self {
        Self {
            tiebreaks,
            ..self.clone()
        }
    }
}

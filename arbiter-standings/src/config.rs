//! Configuration for standings computation
//!
//! Level 4 - Utilities and configuration

/// Options for batch scoring
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StandingsConfig {
    /// Score independent tournaments on the rayon thread pool
    pub parallel: bool,
}

impl Default for StandingsConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl StandingsConfig {
    /// Single-threaded configuration
    pub fn sequential() -> Self {
        Self { parallel: false }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

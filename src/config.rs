//! Engine configuration.
//!
//! [`EngineConfig`] holds the attempt caps that bound every randomized
//! retry loop in the engine, plus operator parameters.

use serde::{Deserialize, Serialize};

/// Configuration for construction and repair.
///
/// # Defaults
///
/// ```
/// use u_timetable::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.max_init_attempts, 300);
/// assert_eq!(config.max_repair_attempts, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_sector_size(6)
///     .with_seed(7);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Restarts the greedy initializer may make for one timetable.
    pub max_init_attempts: usize,

    /// Repair attempts per crossover child before falling back to the
    /// unmodified parent.
    pub max_repair_attempts: usize,

    /// Random (day, period) probes per leftover lecture during repair.
    pub random_placements: usize,

    /// Swap attempts per mutation before giving up.
    pub max_mutation_attempts: usize,

    /// Meetings moved by sector-based crossover.
    pub sector_size: usize,

    /// Random seed for reproducibility. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_init_attempts: 300,
            max_repair_attempts: 100,
            random_placements: 100,
            max_mutation_attempts: 100,
            sector_size: 4,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Sets the initializer restart cap.
    pub fn with_max_init_attempts(mut self, n: usize) -> Self {
        self.max_init_attempts = n.max(1);
        self
    }

    /// Sets the crossover repair attempt cap.
    pub fn with_max_repair_attempts(mut self, n: usize) -> Self {
        self.max_repair_attempts = n.max(1);
        self
    }

    /// Sets the number of random probes per leftover lecture.
    pub fn with_random_placements(mut self, n: usize) -> Self {
        self.random_placements = n;
        self
    }

    /// Sets the mutation attempt cap.
    pub fn with_max_mutation_attempts(mut self, n: usize) -> Self {
        self.max_mutation_attempts = n.max(1);
        self
    }

    /// Sets the sector size for sector-based crossover.
    pub fn with_sector_size(mut self, n: usize) -> Self {
        self.sector_size = n.max(1);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

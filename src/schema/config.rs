//! Configuration types for tree generation runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of independent search workers.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Local search settings shared by every worker.
    #[serde(default)]
    pub search: SearchConfig,
    /// Where the global best tree is written on checkpoint.
    #[serde(default = "default_checkpoint_path")]
    pub checkpoint_path: PathBuf,
    /// How often the driver logs the global best, in milliseconds.
    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u64,
    /// Stop after this many seconds. Runs until interrupted if unset.
    #[serde(default = "default_duration_secs")]
    pub duration_secs: Option<u64>,
    /// Restart the worst half of the workers at this interval, in seconds.
    #[serde(default)]
    pub restart_interval_secs: Option<u64>,
    /// Base random seed. Worker `i` is seeded with `seed + i`.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            search: SearchConfig::default(),
            checkpoint_path: default_checkpoint_path(),
            report_interval_ms: default_report_interval_ms(),
            duration_secs: default_duration_secs(),
            restart_interval_secs: None,
            random_seed: None,
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
fn default_checkpoint_path() -> PathBuf {
    PathBuf::from("alg.txt")
}
fn default_report_interval_ms() -> u64 {
    1000
}
fn default_duration_secs() -> Option<u64> {
    Some(60)
}

/// Local search (seeding + refining) settings for one worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Seeding rounds before refinement starts.
    #[serde(default = "default_seeding_rounds")]
    pub seeding_rounds: usize,
    /// Whole trees built per seeding round.
    #[serde(default = "default_seeding_trials")]
    pub seeding_trials: usize,
    /// Range the seeding goal weights are drawn from.
    #[serde(default = "default_seeding_weight_range")]
    pub seeding_weight_range: (f64, f64),
    /// Exclusive upper bound of the seeding `count_ones_threshold`.
    #[serde(default = "default_seeding_threshold_bound")]
    pub seeding_threshold_bound: usize,
    /// Exclusive upper bound of the refining `count_ones_threshold`.
    #[serde(default = "default_refining_threshold_bound")]
    pub refining_threshold_bound: usize,
    /// Upper bound on subtrees regenerated by one regenerate mutation.
    #[serde(default = "default_max_regenerations")]
    pub max_regenerations: usize,
    /// Probability of choosing the swap operator over regenerate.
    #[serde(default = "default_swap_probability")]
    pub swap_probability: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seeding_rounds: default_seeding_rounds(),
            seeding_trials: default_seeding_trials(),
            seeding_weight_range: default_seeding_weight_range(),
            seeding_threshold_bound: default_seeding_threshold_bound(),
            refining_threshold_bound: default_refining_threshold_bound(),
            max_regenerations: default_max_regenerations(),
            swap_probability: default_swap_probability(),
        }
    }
}

fn default_seeding_rounds() -> usize {
    10
}
fn default_seeding_trials() -> usize {
    10
}
fn default_seeding_weight_range() -> (f64, f64) {
    (0.1, 0.4)
}
fn default_seeding_threshold_bound() -> usize {
    20
}
fn default_refining_threshold_bound() -> usize {
    25
}
fn default_max_regenerations() -> usize {
    12
}
fn default_swap_probability() -> f64 {
    0.5
}

impl GeneratorConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount);
        }
        if self.report_interval_ms == 0 {
            return Err(ConfigError::InvalidReportInterval);
        }
        self.search.validate()
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seeding_rounds == 0 || self.seeding_trials == 0 {
            return Err(ConfigError::InvalidSeeding);
        }
        let (low, high) = self.seeding_weight_range;
        if !(low >= 0.0 && low < high && high.is_finite()) {
            return Err(ConfigError::InvalidWeightRange { low, high });
        }
        if self.max_regenerations == 0 {
            return Err(ConfigError::InvalidRegenerations);
        }
        if !(0.0..=1.0).contains(&self.swap_probability) {
            return Err(ConfigError::InvalidProbability(self.swap_probability));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Worker count must be non-zero")]
    InvalidWorkerCount,
    #[error("Report interval must be non-zero")]
    InvalidReportInterval,
    #[error("Seeding rounds and trials must be non-zero")]
    InvalidSeeding,
    #[error("Seeding weight range [{low}, {high}) is empty or negative")]
    InvalidWeightRange { low: f64, high: f64 },
    #[error("Max regenerations must be non-zero")]
    InvalidRegenerations,
    #[error("Swap probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
}

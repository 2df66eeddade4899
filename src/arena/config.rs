//! Configuration options for policy evaluation.
//!
//! This module provides the configuration struct that controls how many
//! matches are simulated, how randomness is seeded and how work is spread
//! across threads, plus the statistics reported after a batch.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, ArenaResult};

/// Number of matches per batch when nothing else is configured.
pub const DEFAULT_NUM_MATCHES: usize = 200;

/// Mask width baked into the Deep CFR model artifact.
pub const DEFAULT_MAX_ACTION_WIDTH: usize = 18;

/// Configuration for an evaluation run.
///
/// # Example
/// ```
/// use policy_arena::arena::ArenaConfig;
///
/// let config = ArenaConfig::default().with_seed(7).with_threads(1);
/// assert_eq!(config.num_matches, 200);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Matches simulated per seat assignment.
    pub num_matches: usize,

    /// Width of the model's legal-action mask and output vector.
    ///
    /// This is a property of the trained artifact, not of the live game.
    pub max_action_width: usize,

    /// Base seed for action sampling.
    ///
    /// Each match derives its own generator from this seed and its index, so
    /// results do not depend on how matches are scheduled. If `None`, a base
    /// seed is drawn from entropy for every batch.
    pub seed: Option<u64>,

    /// Number of worker threads.
    ///
    /// `None` uses the global rayon pool, `Some(1)` runs sequentially.
    pub num_threads: Option<usize>,

    /// Draw a progress bar on stderr while a batch runs.
    pub show_progress: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            num_matches: DEFAULT_NUM_MATCHES,
            max_action_width: DEFAULT_MAX_ACTION_WIDTH,
            seed: None,
            num_threads: None,
            show_progress: false,
        }
    }
}

impl ArenaConfig {
    /// Create a new ArenaConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ArenaResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder method: set matches per batch.
    pub fn with_matches(mut self, num_matches: usize) -> Self {
        self.num_matches = num_matches;
        self
    }

    /// Builder method: set the model's action width.
    pub fn with_action_width(mut self, width: usize) -> Self {
        self.max_action_width = width;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set number of threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Builder method: toggle the progress bar.
    pub fn with_progress(mut self, enable: bool) -> Self {
        self.show_progress = enable;
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> ArenaResult<()> {
        if self.num_matches == 0 {
            return Err(ArenaError::Config("num_matches must be positive".into()));
        }
        if self.max_action_width == 0 {
            return Err(ArenaError::Config("max_action_width must be positive".into()));
        }
        if self.num_threads == Some(0) {
            return Err(ArenaError::Config("num_threads must be positive".into()));
        }
        Ok(())
    }
}

/// Outcome counts for one evaluation batch, from the evaluated seat's view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalStats {
    /// Total number of matches played.
    pub matches: usize,

    /// Matches where the evaluated seat's return was strictly positive.
    pub wins: usize,

    /// Matches where the evaluated seat's return was exactly zero.
    pub draws: usize,

    /// Matches where the evaluated seat's return was negative.
    pub losses: usize,

    /// `wins / matches`; draws count against the evaluated seat.
    pub win_rate: f64,

    /// Wall-clock time spent on the batch (in seconds).
    pub elapsed_seconds: f64,

    /// Matches per second.
    pub matches_per_second: f64,
}

impl EvalStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one terminal return for the evaluated seat.
    pub fn record(&mut self, seat_return: f64) {
        self.matches += 1;
        if seat_return > 0.0 {
            self.wins += 1;
        } else if seat_return == 0.0 {
            self.draws += 1;
        } else {
            self.losses += 1;
        }
    }

    /// Recompute derived rates from the counts and elapsed time.
    pub fn finish(&mut self, elapsed_seconds: f64) {
        self.elapsed_seconds = elapsed_seconds;
        if self.matches > 0 {
            self.win_rate = self.wins as f64 / self.matches as f64;
        }
        if elapsed_seconds > 0.0 {
            self.matches_per_second = self.matches as f64 / elapsed_seconds;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ArenaConfig::default();
        assert_eq!(config.num_matches, 200);
        assert_eq!(config.max_action_width, 18);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        assert!(ArenaConfig::default().with_matches(0).validate().is_err());
        assert!(ArenaConfig::default().with_action_width(0).validate().is_err());
        assert!(ArenaConfig::default().with_threads(0).validate().is_err());
    }

    #[test]
    fn test_from_json_file_fills_defaults() {
        let path = std::env::temp_dir().join(format!("arena_config_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "num_matches": 50, "seed": 3 }"#).unwrap();

        let config = ArenaConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.num_matches, 50);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.max_action_width, DEFAULT_MAX_ACTION_WIDTH);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_from_json_file_validates() {
        let path = std::env::temp_dir().join(format!("arena_bad_config_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "num_matches": 0 }"#).unwrap();

        let result = ArenaConfig::from_json_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ArenaError::Config(_))));
    }

    #[test]
    fn test_stats_count_draws_as_non_wins() {
        let mut stats = EvalStats::new();
        for r in [1.0, 0.0, -1.0, 1.0] {
            stats.record(r);
        }
        stats.finish(2.0);

        assert_eq!(stats.matches, 4);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.win_rate, 0.5);
        assert_eq!(stats.matches_per_second, 2.0);
    }
}

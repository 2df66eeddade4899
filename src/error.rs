//! Error types shared across the crate.
//!
//! Every condition here is fatal for an evaluation run: they all point at a
//! configuration or data inconsistency, so nothing is retried.

use thiserror::Error;

/// Errors raised while loading policies or simulating matches.
#[derive(Error, Debug)]
pub enum ArenaError {
    /// The tabular policy file is empty, malformed, or holds an undecodable value.
    #[error("Malformed policy file: {0}")]
    Parse(String),

    /// An information state was queried that the policy table never stored.
    #[error("Information state not found in policy table: {0:?}")]
    KeyNotFound(String),

    /// The stored policy and the live game disagree on the action count.
    #[error("Policy for {key:?} has {stored} entries but the game offers {legal} legal actions")]
    PolicyMismatch {
        /// Information state key.
        key: String,
        /// Length of the stored vector.
        stored: usize,
        /// Number of legal actions at the live state.
        legal: usize,
    },

    /// The model artifact could not be loaded or violated its contract.
    #[error("Model inference failed: {0}")]
    Inference(String),

    /// Error raised by the tensor runtime during load or inference.
    #[error("Candle error: {0}")]
    Candle(#[from] candle_core::Error),

    /// A caller-supplied argument is outside the accepted domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A policy cannot be used as sampling weights.
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    /// The arena configuration failed validation.
    #[error("Invalid config: {0}")]
    Config(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dedicated worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ArenaError {
    /// Whether this error came from the model-backed policy.
    pub fn is_inference(&self) -> bool {
        matches!(self, ArenaError::Inference(_) | ArenaError::Candle(_))
    }
}

/// Convenience alias used throughout the crate.
pub type ArenaResult<T> = Result<T, ArenaError>;

//! # Policy Arena
//!
//! Head-to-head evaluation of game-playing policies in two-player zero-sum
//! imperfect-information games.
//!
//! ## Features
//!
//! - **Tabular Policies**: Loads hex-encoded policy tables written by a CFR
//!   solver
//! - **Neural Policies**: Runs a safetensors policy network with action masking
//! - **Seeded Sampling**: Reproducible matches regardless of thread count
//! - **Parallel Matches**: Independent matches are spread across a thread pool
//!
//! ## Quick Start
//!
//! ```ignore
//! use policy_arena::{ArenaConfig, Evaluator, UniformPolicyProvider};
//! use policy_arena::games::secret_tic_tac_toe::SecretTicTacToe;
//!
//! let evaluator = Evaluator::new(SecretTicTacToe::new(), ArenaConfig::default())?;
//! let uniform = UniformPolicyProvider::new();
//! let win_rate = evaluator.evaluate(&uniform, &uniform, 200)?;
//! ```
//!
//! ## Modules
//!
//! - [`arena`]: Providers, sampling, match loop and evaluation
//! - [`games`]: Game implementations (Secret Tic-Tac-Toe)
//! - [`error`]: Error type shared by every operation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Evaluator (Generic)                      │
//! │  - Seat assignment        - Win-rate accounting                 │
//! │  - Per-match seeding      - Parallel match execution            │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ MatchRunner + sample_action
//!                               ▼
//!         ┌─────────────────────┼─────────────────────┐
//!         │                     │                     │
//!         ▼                     ▼                     ▼
//!    ┌─────────┐         ┌───────────┐         ┌───────────┐
//!    │ Tabular │         │   Model   │         │  Uniform  │
//!    │ (table) │         │ (network) │         │ baseline  │
//!    └─────────┘         └───────────┘         └───────────┘
//! ```

#![warn(missing_docs)]

/// Policy arena module.
///
/// Policy providers, the match loop and the evaluator.
pub mod arena;

/// Error types.
pub mod error;

/// Game implementations module.
///
/// Contains the reference Secret Tic-Tac-Toe engine.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use arena::{
    Action, ArenaConfig, EvalStats, Evaluator, Game, GameState, ModelPolicyProvider,
    PolicyProvider, PolicyTable, SeatReport, TabularPolicyProvider, UniformPolicyProvider,
};
pub use error::{ArenaError, ArenaResult};

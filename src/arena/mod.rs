//! Policy Arena Module.
//!
//! Plays two policies against each other on a two-player game and reports
//! how often the first-seated one wins.
//!
//! # Overview
//!
//! An evaluation runs a fixed number of independent matches. In each match:
//! 1. The current player's information state is rendered as a string key and
//!    as a feature tensor
//! 2. The seated provider turns it into a distribution over legal actions
//! 3. One action is sampled and applied until the game is over
//!
//! A match counts as a win for seat 0 only when its terminal return is
//! strictly positive. Draws and losses are both non-wins.
//!
//! # Providers
//!
//! - **Tabular**: looks up the cumulative policy stored in a text table,
//!   keyed by information-state string
//! - **Model**: runs a feed-forward policy network on the information-state
//!   tensor with a mask over the full action space
//! - **Uniform**: equal weight on every legal action, used as a baseline
//!
//! # Example
//!
//! ```ignore
//! use policy_arena::arena::{ArenaConfig, Evaluator, ModelPolicyProvider, TabularPolicyProvider};
//! use policy_arena::games::secret_tic_tac_toe::SecretTicTacToe;
//!
//! let tabular = TabularPolicyProvider::load("output.txt")?;
//! let model = ModelPolicyProvider::load("deep_cfr.txt", 18)?;
//!
//! let evaluator = Evaluator::new(SecretTicTacToe::new(), ArenaConfig::default())?;
//! let report = evaluator.evaluate_both_seats(&model, &tabular)?;
//! println!("{}", report.first.win_rate);
//! println!("{}", report.swapped.win_rate);
//! ```
//!
//! # Table Format
//!
//! ```text
//! <key><~><actions>;<regrets>;<policy>;<current><~><key><~>...
//! ```
//!
//! `<policy>` is the cumulative policy, the only field the tabular provider
//! reads. Every value in it is the 16 hex digit IEEE-754 bit pattern of an
//! `f64`.

pub mod config;
pub mod evaluator;
pub mod game;
pub mod hexfloat;
pub mod model;
pub mod provider;
pub mod runner;
pub mod sampler;
pub mod table;

pub use config::{ArenaConfig, EvalStats};
pub use evaluator::{Evaluator, SeatReport};
pub use game::{Action, Game, GameState};
pub use hexfloat::{decode_hex_f64, encode_hex_f64};
pub use model::{ModelPolicyProvider, NetworkShape, PolicyModel, PolicyNetwork};
pub use provider::{PolicyProvider, TabularPolicyProvider, UniformPolicyProvider};
pub use runner::MatchRunner;
pub use sampler::sample_action;
pub use table::{encode_entry, PolicyTable};

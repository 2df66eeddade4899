//! Game implementations for the policy arena.
//!
//! The arena only sees games through the `Game` trait. The games here serve
//! as:
//!
//! 1. **Reference engine**: the game that the stored policies were trained on,
//!    so matches can be played without an external engine.
//!
//! 2. **Validation**: small games with hand-checkable outcomes exercise the
//!    match loop and evaluator end to end.
//!
//! ## Available Games
//!
//! - [`secret_tic_tac_toe`]: tic-tac-toe where each player sees where the
//!   opponent played but not which marker
//!
//! ## Adding New Games
//!
//! 1. Create a new module under `src/games/`
//! 2. Define the state type and register it with `impl_game_state!`
//! 3. Implement the `Game` trait, including the information-state string and
//!    tensor the providers consume
//! 4. Add tests that verify expected behavior

pub mod secret_tic_tac_toe;

//! Game engine interface consumed by the arena.
//!
//! The arena never looks inside a game: it only drives states through this
//! trait. Any two-player, zero-sum, perfect-recall game that implements
//! `Game` can be used to pit policies against each other.

use std::fmt::Debug;

/// Action identifier.
///
/// Actions are dense indices into the game's distinct action space, which is
/// also how the model-backed policy addresses its mask and output vector.
pub type Action = usize;

/// Trait for game states.
///
/// A state holds everything about a match in progress, including information
/// hidden from one or both players.
pub trait GameState: Clone + Debug + Send + Sync {}

/// The main Game trait that defines the interface for any game.
///
/// Transitions are immutable: `apply_action` returns a new state and leaves
/// its input untouched.
///
/// # Example
/// ```ignore
/// struct MyGame;
///
/// impl Game for MyGame {
///     type State = MyGameState;
///
///     // ... implement required methods
/// }
/// ```
pub trait Game: Clone + Send + Sync {
    /// The type representing a complete game state.
    type State: GameState;

    /// Short name of the game, used in logs.
    fn name(&self) -> &str;

    /// Create the initial game state.
    fn new_initial_state(&self) -> Self::State;

    /// Get the total number of players (seats) in the game.
    fn num_players(&self) -> usize;

    /// Size of the full action space; every action id is below this bound.
    fn num_distinct_actions(&self) -> usize;

    /// Length of the vector returned by `information_state_tensor`.
    fn information_state_tensor_size(&self) -> usize;

    /// Check if the given state is terminal (game over).
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Get the seat that acts at the current state.
    ///
    /// # Returns
    /// - `Some(player_index)` if a player should act
    /// - `None` if the state is terminal
    fn current_player(&self, state: &Self::State) -> Option<usize>;

    /// Ordered list of legal actions at the current state.
    ///
    /// Never empty at a non-terminal state. Policies are aligned
    /// index-for-index with this ordering.
    fn legal_actions(&self, state: &Self::State) -> Vec<Action>;

    /// Unique string key for the information state of `player`.
    fn information_state_string(&self, state: &Self::State, player: usize) -> String;

    /// Numeric feature vector for the information state of `player`.
    fn information_state_tensor(&self, state: &Self::State, player: usize) -> Vec<f32>;

    /// Apply an action to a state and return the resulting new state.
    fn apply_action(&self, state: &Self::State, action: Action) -> Self::State;

    /// Terminal return for every seat, indexed by seat.
    ///
    /// Only meaningful when `is_terminal` holds.
    fn returns(&self, state: &Self::State) -> Vec<f64>;

    /// Get a human-readable name for an action.
    fn action_to_string(&self, _player: usize, action: Action) -> String {
        action.to_string()
    }

    /// Get a human-readable description of a state.
    fn state_description(&self, state: &Self::State) -> String {
        format!("{:?}", state)
    }
}

/// Macro to simplify implementing the GameState trait.
#[macro_export]
macro_rules! impl_game_state {
    ($type:ty) => {
        impl $crate::arena::game::GameState for $type {}
    };
}

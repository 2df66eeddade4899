//! Playing a single match between seated policies.

use rand::Rng;

use crate::arena::game::Game;
use crate::arena::provider::PolicyProvider;
use crate::arena::sampler::sample_action;
use crate::error::{ArenaError, ArenaResult};

/// Drives one game from its initial state to a terminal state.
///
/// The loop has no step limit; termination is the game's guarantee.
pub struct MatchRunner<'g, G: Game> {
    game: &'g G,
}

impl<'g, G: Game> MatchRunner<'g, G> {
    /// Create a runner for the given game.
    pub fn new(game: &'g G) -> Self {
        Self { game }
    }

    /// Play one match and return the terminal returns, indexed by seat.
    ///
    /// `seats[p]` chooses the actions of player `p`.
    pub fn run<R: Rng + ?Sized>(
        &self,
        seats: &[&dyn PolicyProvider],
        rng: &mut R,
    ) -> ArenaResult<Vec<f64>> {
        if seats.len() != self.game.num_players() {
            return Err(ArenaError::InvalidArgument(format!(
                "{} needs {} seats, got {}",
                self.game.name(),
                self.game.num_players(),
                seats.len()
            )));
        }

        let mut state = self.game.new_initial_state();
        while !self.game.is_terminal(&state) {
            let player = self.game.current_player(&state).ok_or_else(|| {
                ArenaError::InvalidArgument(format!(
                    "no player to act at non-terminal state {}",
                    self.game.state_description(&state)
                ))
            })?;
            let provider = seats.get(player).ok_or_else(|| {
                ArenaError::InvalidArgument(format!("no provider seated for player {}", player))
            })?;

            let legal_actions = self.game.legal_actions(&state);
            let key = self.game.information_state_string(&state, player);
            let tensor = self.game.information_state_tensor(&state, player);

            let policy = provider.get_policy(&key, &tensor, &legal_actions)?;
            let action = sample_action(&policy, &legal_actions, rng)?;
            log::trace!(
                "player {} ({}) at {:?} plays {}",
                player,
                provider.name(),
                key,
                self.game.action_to_string(player, action)
            );

            state = self.game.apply_action(&state, action);
        }

        Ok(self.game.returns(&state))
    }
}

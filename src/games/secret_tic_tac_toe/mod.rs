//! Secret Tic-Tac-Toe.
//!
//! A two-player imperfect-information variant of tic-tac-toe used to compare
//! policies.
//!
//! ## Game Rules
//!
//! - 3x3 board, player 0 moves first, players alternate
//! - On each move a player picks an empty cell and **either** marker
//!   (nought or cross); the cell becomes visible to the opponent, the marker
//!   does not
//! - Whoever completes a line of three identical markers wins, regardless of
//!   who placed the earlier markers
//! - A full board without a line is a draw
//!
//! ## Actions
//!
//! ```text
//! action  0..=8   nought on cell action
//! action  9..=17  cross  on cell action - 9
//! ```
//!
//! Cells are numbered row-major from the top-left corner.

use std::fmt;

use crate::arena::game::{Action, Game};

/// Board side length.
pub const SIZE: usize = 3;

/// Number of cells on the board.
pub const NUM_CELLS: usize = SIZE * SIZE;

/// Number of distinct actions (one per cell and marker).
pub const NUM_DISTINCT_ACTIONS: usize = 2 * NUM_CELLS;

/// Length of the information-state tensor.
pub const INFO_STATE_TENSOR_SIZE: usize = 2 + NUM_CELLS * 4;

/// All eight winning lines.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Contents of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Nothing placed yet.
    Empty,
    /// "o"
    Nought,
    /// "x"
    Cross,
}

impl Marker {
    /// Marker placed by an action.
    pub fn of_action(action: Action) -> Self {
        debug_assert!(action < NUM_DISTINCT_ACTIONS, "action {} out of range", action);
        if action < NUM_CELLS {
            Marker::Nought
        } else {
            Marker::Cross
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Empty => write!(f, "."),
            Marker::Nought => write!(f, "o"),
            Marker::Cross => write!(f, "x"),
        }
    }
}

/// Cell targeted by an action.
pub fn cell_of(action: Action) -> usize {
    action % NUM_CELLS
}

/// One move in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerMove {
    /// Seat that made the move.
    pub player: usize,
    /// Action id.
    pub action: Action,
}

impl PlayerMove {
    /// Render the move as seen by `viewer`: full marker if it is their own.
    fn render(&self, viewer: usize) -> String {
        if self.player == viewer {
            format!("{}{}", cell_of(self.action), Marker::of_action(self.action))
        } else {
            format!("{}?", cell_of(self.action))
        }
    }
}

/// Complete game state: the ordered move history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretTicTacToeState {
    /// Moves made so far.
    pub history: Vec<PlayerMove>,
}

crate::impl_game_state!(SecretTicTacToeState);

impl SecretTicTacToeState {
    /// Current board, derived from the history.
    pub fn board(&self) -> [Marker; NUM_CELLS] {
        let mut board = [Marker::Empty; NUM_CELLS];
        for m in &self.history {
            board[cell_of(m.action)] = Marker::of_action(m.action);
        }
        board
    }

    /// Seat that completed a line, if any.
    ///
    /// Only the last mover can have completed a line.
    pub fn winner(&self) -> Option<usize> {
        let board = self.board();
        let line_made = LINES.iter().any(|line| {
            let first = board[line[0]];
            first != Marker::Empty && line.iter().all(|&cell| board[cell] == first)
        });
        if line_made {
            self.history.last().map(|m| m.player)
        } else {
            None
        }
    }

    /// Whether every cell is taken.
    pub fn is_full(&self) -> bool {
        self.history.len() == NUM_CELLS
    }
}

impl fmt::Display for SecretTicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.board();
        for row in 0..SIZE {
            for col in 0..SIZE {
                write!(f, "{}", board[row * SIZE + col])?;
            }
            if row + 1 < SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Secret Tic-Tac-Toe game.
#[derive(Debug, Clone, Default)]
pub struct SecretTicTacToe;

impl SecretTicTacToe {
    /// Create a new game.
    pub fn new() -> Self {
        Self
    }
}

impl Game for SecretTicTacToe {
    type State = SecretTicTacToeState;

    fn name(&self) -> &str {
        "secret_tic_tac_toe"
    }

    fn new_initial_state(&self) -> Self::State {
        SecretTicTacToeState::default()
    }

    fn num_players(&self) -> usize {
        2
    }

    fn num_distinct_actions(&self) -> usize {
        NUM_DISTINCT_ACTIONS
    }

    fn information_state_tensor_size(&self) -> usize {
        INFO_STATE_TENSOR_SIZE
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        state.is_full() || state.winner().is_some()
    }

    fn current_player(&self, state: &Self::State) -> Option<usize> {
        if self.is_terminal(state) {
            None
        } else {
            Some(state.history.len() % 2)
        }
    }

    fn legal_actions(&self, state: &Self::State) -> Vec<Action> {
        if self.is_terminal(state) {
            return vec![];
        }
        let board = state.board();
        (0..NUM_CELLS)
            .filter(|&cell| board[cell] == Marker::Empty)
            .flat_map(|cell| [cell, cell + NUM_CELLS])
            .collect()
    }

    fn information_state_string(&self, state: &Self::State, player: usize) -> String {
        state
            .history
            .iter()
            .map(|m| m.render(player))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn information_state_tensor(&self, state: &Self::State, player: usize) -> Vec<f32> {
        let mut tensor = vec![0.0; INFO_STATE_TENSOR_SIZE];
        tensor[player] = 1.0;

        // Per cell: [empty, own nought, own cross, opponent]
        let mut slots = [0usize; NUM_CELLS];
        for m in &state.history {
            slots[cell_of(m.action)] = if m.player != player {
                3
            } else {
                match Marker::of_action(m.action) {
                    Marker::Cross => 2,
                    _ => 1,
                }
            };
        }
        for (cell, &slot) in slots.iter().enumerate() {
            tensor[2 + cell * 4 + slot] = 1.0;
        }
        tensor
    }

    fn apply_action(&self, state: &Self::State, action: Action) -> Self::State {
        debug_assert!(
            state.board()[cell_of(action)] == Marker::Empty,
            "cell {} is already taken",
            cell_of(action)
        );
        let player = state.history.len() % 2;
        let mut new_state = state.clone();
        new_state.history.push(PlayerMove { player, action });
        new_state
    }

    fn returns(&self, state: &Self::State) -> Vec<f64> {
        match state.winner() {
            Some(0) => vec![1.0, -1.0],
            Some(_) => vec![-1.0, 1.0],
            None => vec![0.0, 0.0],
        }
    }

    fn action_to_string(&self, _player: usize, action: Action) -> String {
        let cell = cell_of(action);
        format!("{}({},{})", Marker::of_action(action), cell / SIZE, cell % SIZE)
    }

    fn state_description(&self, state: &Self::State) -> String {
        format!("{}", state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn play(game: &SecretTicTacToe, actions: &[Action]) -> SecretTicTacToeState {
        actions
            .iter()
            .fold(game.new_initial_state(), |state, &a| game.apply_action(&state, a))
    }

    #[test]
    fn test_initial_state() {
        let game = SecretTicTacToe::new();
        let state = game.new_initial_state();

        assert!(!game.is_terminal(&state));
        assert_eq!(game.current_player(&state), Some(0));
        assert_eq!(game.legal_actions(&state).len(), NUM_DISTINCT_ACTIONS);
        assert_eq!(game.information_state_string(&state, 0), "");
        assert_eq!(game.information_state_string(&state, 1), "");
    }

    #[test]
    fn test_legal_action_order() {
        let game = SecretTicTacToe::new();
        let state = play(&game, &[4, 9]);

        assert_eq!(game.current_player(&state), Some(0));
        assert_eq!(
            game.legal_actions(&state),
            vec![1, 10, 2, 11, 3, 12, 5, 14, 6, 15, 7, 16, 8, 17]
        );
    }

    #[test]
    fn test_info_state_hides_opponent_markers() {
        let game = SecretTicTacToe::new();
        let state = play(&game, &[4, 9, 11]);

        assert_eq!(game.information_state_string(&state, 0), "4o, 0?, 2x");
        assert_eq!(game.information_state_string(&state, 1), "4?, 0x, 2?");
    }

    #[test]
    fn test_info_state_tensor_layout() {
        let game = SecretTicTacToe::new();
        let state = play(&game, &[4, 9]);
        let tensor = game.information_state_tensor(&state, 0);

        assert_eq!(tensor.len(), INFO_STATE_TENSOR_SIZE);
        assert_eq!(&tensor[0..2], &[1.0, 0.0]);
        // cell 0: opponent
        assert_eq!(&tensor[2..6], &[0.0, 0.0, 0.0, 1.0]);
        // cell 4: own nought
        assert_eq!(&tensor[18..22], &[0.0, 1.0, 0.0, 0.0]);
        // cell 8: empty
        assert_eq!(&tensor[34..38], &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(tensor.iter().sum::<f32>(), 1.0 + NUM_CELLS as f32);
    }

    #[test]
    fn test_last_mover_wins_with_shared_markers() {
        let game = SecretTicTacToe::new();
        // P0: o@0, P1: o@1, P0: x@5, P1: o@2 completes the top row.
        let state = play(&game, &[0, 1, 14, 2]);

        assert!(game.is_terminal(&state));
        assert_eq!(game.current_player(&state), None);
        assert_eq!(game.returns(&state), vec![-1.0, 1.0]);
        assert!(game.legal_actions(&state).is_empty());
    }

    #[test]
    fn test_mixed_markers_do_not_win() {
        let game = SecretTicTacToe::new();
        let state = play(&game, &[0, 10, 2]);
        assert!(!game.is_terminal(&state));
    }

    #[test]
    fn test_diagonal_win_for_player_zero() {
        let game = SecretTicTacToe::new();
        let state = play(&game, &[9, 1, 13, 2, 17]);
        assert!(game.is_terminal(&state));
        assert_eq!(game.returns(&state), vec![1.0, -1.0]);
    }

    #[test]
    fn test_full_board_draw() {
        let game = SecretTicTacToe::new();
        // o x o / o x x / x o o
        let state = play(&game, &[0, 10, 2, 3, 13, 14, 15, 7, 8]);

        assert!(game.is_terminal(&state));
        assert_eq!(game.returns(&state), vec![0.0, 0.0]);
        assert_eq!(format!("{}", state), "oxo\noxx\nxoo");
    }

    #[test]
    fn test_random_playouts_terminate_zero_sum() {
        let game = SecretTicTacToe::new();
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..500 {
            let mut state = game.new_initial_state();
            let mut moves = 0;
            while !game.is_terminal(&state) {
                let legal = game.legal_actions(&state);
                let action = *legal.choose(&mut rng).unwrap();
                state = game.apply_action(&state, action);
                moves += 1;
            }
            assert!(moves <= NUM_CELLS);
            let returns = game.returns(&state);
            assert_eq!(returns[0] + returns[1], 0.0);
        }
    }
}

//! Step-based environment wrapper around [`BoardState`].
//!
//! This is the surface a game driver or a learning loop talks to. It adds an
//! observation encoding and a `(observation, reward, done)` step result on
//! top of the board rules.

use super::action::Action;
use super::board::BoardState;
use super::player::Player;
use crate::Result;

/// Board encoding returned by [`UtttEnv::step`].
///
/// Plane 0 marks X, plane 1 marks O, plane 2 is all ones while X is to move.
/// Index `[plane][row][col]` uses global coordinates
/// `row = macro_row * 3 + micro_row`, `col = macro_col * 3 + micro_col`.
pub type Observation = [[[u8; 9]; 9]; 3];

/// Result of a single environment step
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub observation: Observation,
    /// Terminal reward (X's perspective) once `done`, otherwise `0.0`
    pub reward: f64,
    pub done: bool,
}

/// Game environment holding one board
#[derive(Debug, Clone, Default)]
pub struct UtttEnv {
    board: BoardState,
}

impl UtttEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new game
    pub fn reset(&mut self) -> Observation {
        self.board = BoardState::new();
        self.observation()
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Plays `action` and reports the new observation, reward and terminal flag.
    ///
    /// # Errors
    ///
    /// [`crate::UtttError::IllegalAction`] if the action is not legal; the
    /// environment is unchanged.
    pub fn step(&mut self, action: Action) -> Result<Step> {
        self.board.apply(action)?;
        Ok(Step {
            observation: self.observation(),
            reward: self.reward(),
            done: self.done(),
        })
    }

    /// Legal actions, empty once the game is over
    pub fn valid_actions(&self) -> Vec<Action> {
        self.board.legal_actions().unwrap_or_default()
    }

    pub fn current_player(&self) -> Player {
        self.board.turn()
    }

    pub fn done(&self) -> bool {
        self.board.is_terminal()
    }

    /// Terminal reward from X's perspective, `0.0` while the game is running
    pub fn reward(&self) -> f64 {
        self.board.terminal_reward().unwrap_or(0.0)
    }

    pub fn observation(&self) -> Observation {
        let mut observation = [[[0u8; 9]; 9]; 3];

        for action in Action::all() {
            let plane = match self.board.cell(action) {
                Some(Player::X) => 0,
                Some(Player::O) => 1,
                None => continue,
            };
            let row = (action.macro_row() * 3 + action.micro_row()) as usize;
            let col = (action.macro_col() * 3 + action.micro_col()) as usize;
            observation[plane][row][col] = 1;
        }

        if self.board.turn() == Player::X {
            observation[2] = [[1; 9]; 9];
        }

        observation
    }
}

impl From<BoardState> for UtttEnv {
    fn from(board: BoardState) -> Self {
        UtttEnv { board }
    }
}

//! Ultimate Tic-Tac-Toe rules.
//!
//! Nine tic-tac-toe sub-boards form a 3x3 meta-board. The cell a player marks
//! decides which sub-board the opponent must play in next; if that sub-board
//! is already won or drawn the opponent may play in any open sub-board. A
//! sub-board is claimed by three in a row, and the game is won by claiming
//! three sub-boards in a row.

pub mod action;
pub mod board;
pub mod env;
pub mod player;
pub mod subboard;

pub use action::{Action, ACTION_COUNT};
pub use board::{ActiveSubboard, BoardState};
pub use env::{Observation, Step, UtttEnv};
pub use player::{Cell, Player, Status};
pub use subboard::SubBoard;

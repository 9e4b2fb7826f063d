//! The packed move encoding shared by every component.

use std::fmt;

use crate::{Result, UtttError};

/// Number of distinct actions on an Ultimate Tic-Tac-Toe board.
pub const ACTION_COUNT: u8 = 81;

/// A move, packed as `macro_row*27 + macro_col*9 + micro_row*3 + micro_col`.
///
/// `(macro_row, macro_col)` picks the sub-board and `(micro_row, micro_col)`
/// the cell inside it. Every coordinate is in `0..3`, so the index is always
/// in `0..81`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Action(u8);

impl Action {
    /// Builds an action from its four coordinates.
    pub fn new(macro_row: u8, macro_col: u8, micro_row: u8, micro_col: u8) -> Result<Self> {
        if [macro_row, macro_col, micro_row, micro_col]
            .iter()
            .any(|&coord| coord >= 3)
        {
            return Err(UtttError::IllegalAction {
                action: macro_row
                    .saturating_mul(27)
                    .saturating_add(macro_col.saturating_mul(9))
                    .saturating_add(micro_row.saturating_mul(3))
                    .saturating_add(micro_col),
                reason: format!(
                    "coordinates ({macro_row}, {macro_col}, {micro_row}, {micro_col}) out of range"
                ),
            });
        }
        Ok(Action(macro_row * 27 + macro_col * 9 + micro_row * 3 + micro_col))
    }

    /// Decodes a wire index in `0..81`.
    pub fn from_index(index: u8) -> Result<Self> {
        if index >= ACTION_COUNT {
            return Err(UtttError::IllegalAction {
                action: index,
                reason: format!("index must be below {ACTION_COUNT}"),
            });
        }
        Ok(Action(index))
    }

    /// Iterates over all 81 actions in index order
    pub fn all() -> impl Iterator<Item = Action> {
        (0..ACTION_COUNT).map(Action)
    }

    /// The wire index of this action
    pub fn index(self) -> u8 {
        self.0
    }

    pub fn macro_row(self) -> u8 {
        self.0 / 27
    }

    pub fn macro_col(self) -> u8 {
        self.0 / 9 % 3
    }

    pub fn micro_row(self) -> u8 {
        self.0 / 3 % 3
    }

    pub fn micro_col(self) -> u8 {
        self.0 % 3
    }

    /// `(macro_row, macro_col)`: the sub-board this action is played in
    pub fn subboard(self) -> (u8, u8) {
        (self.macro_row(), self.macro_col())
    }

    /// `(micro_row, micro_col)`: the cell inside the sub-board, which is
    /// also the sub-board the opponent is sent to
    pub fn cell(self) -> (u8, u8) {
        (self.micro_row(), self.micro_col())
    }
}

impl crate::game_state::Action for Action {
    fn id(&self) -> usize {
        self.0 as usize
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> u8 {
        action.0
    }
}

impl TryFrom<u8> for Action {
    type Error = UtttError;

    fn try_from(index: u8) -> Result<Self> {
        Action::from_index(index)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

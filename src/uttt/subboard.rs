//! A single 3x3 tic-tac-toe grid.

use super::player::{line_winner, Cell, Player, Status};

/// One of the nine small boards.
///
/// The status is recomputed on every placement and never changes once it is
/// resolved, because a resolved sub-board accepts no further marks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SubBoard {
    cells: [[Cell; 3]; 3],
    filled: u8,
    status: Status,
}

impl SubBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mark at `(row, col)`
    pub fn at(&self, (row, col): (u8, u8)) -> Cell {
        self.cells[row as usize][col as usize]
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns true if no empty cell is left
    pub fn is_full(&self) -> bool {
        self.filled == 9
    }

    /// Marks an empty cell and updates the status.
    ///
    /// Callers check legality first; placing on a marked cell or on a
    /// resolved board breaks the sub-board invariants.
    pub(crate) fn place(&mut self, player: Player, (row, col): (u8, u8)) {
        debug_assert!(!self.status.is_resolved(), "placing on a resolved sub-board");
        debug_assert!(self.at((row, col)).is_none(), "placing on a marked cell");

        self.cells[row as usize][col as usize] = Some(player);
        self.filled += 1;

        // A line needs at least three marks on the board.
        if self.filled >= 3 {
            if let Some(winner) = line_winner(&self.cells) {
                self.status = winner.won_status();
                return;
            }
        }
        if self.is_full() {
            self.status = Status::Drawn;
        }
    }
}

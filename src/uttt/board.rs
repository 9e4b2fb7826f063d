//! The full Ultimate Tic-Tac-Toe rule set.

use super::action::Action;
use super::player::{line_winner, Cell, Player, Status};
use super::subboard::SubBoard;
use crate::{game_state::GameState, Result, UtttError};

/// Where the next move has to be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActiveSubboard {
    /// Any cell of any unresolved sub-board
    #[default]
    Any,
    /// Only the sub-board at `(macro_row, macro_col)`
    At(u8, u8),
}

impl ActiveSubboard {
    /// Returns true if a move in sub-board `(row, col)` satisfies the constraint
    pub fn allows(self, (row, col): (u8, u8)) -> bool {
        match self {
            ActiveSubboard::Any => true,
            ActiveSubboard::At(r, c) => r == row && c == col,
        }
    }
}

/// Complete state of an Ultimate Tic-Tac-Toe game.
///
/// Created empty with X to move and changed only through
/// [`BoardState::apply`]. Two boards built by replaying the same actions
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardState {
    subboards: [[SubBoard; 3]; 3],
    turn: Player,
    active: ActiveSubboard,
    status: Status,
    moves_played: u8,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    /// Creates an empty board with X to move anywhere
    pub fn new() -> Self {
        BoardState {
            subboards: Default::default(),
            turn: Player::X,
            active: ActiveSubboard::Any,
            status: Status::Open,
            moves_played: 0,
        }
    }

    /// Player to move next
    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn active_subboard(&self) -> ActiveSubboard {
        self.active
    }

    /// Overall game status
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn winner(&self) -> Option<Player> {
        self.status.winner()
    }

    pub fn moves_played(&self) -> u8 {
        self.moves_played
    }

    pub fn subboard(&self, macro_row: u8, macro_col: u8) -> &SubBoard {
        &self.subboards[macro_row as usize][macro_col as usize]
    }

    pub fn subboard_status(&self, macro_row: u8, macro_col: u8) -> Status {
        self.subboard(macro_row, macro_col).status()
    }

    /// Mark in the cell targeted by `action`
    pub fn cell(&self, action: Action) -> Cell {
        let (row, col) = action.subboard();
        self.subboard(row, col).at(action.cell())
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_resolved()
    }

    /// Returns true if `action` may be played now
    pub fn is_legal(&self, action: Action) -> bool {
        if self.is_terminal() || !self.active.allows(action.subboard()) {
            return false;
        }
        let (row, col) = action.subboard();
        let subboard = self.subboard(row, col);
        !subboard.status().is_resolved() && subboard.at(action.cell()).is_none()
    }

    /// Enumerates every legal action in ascending index order.
    ///
    /// # Errors
    ///
    /// [`UtttError::InvalidState`] if the game is already over.
    pub fn legal_actions(&self) -> Result<Vec<Action>> {
        if self.is_terminal() {
            return Err(UtttError::InvalidState(format!(
                "no legal actions: game is over ({:?})",
                self.status
            )));
        }
        Ok(Action::all().filter(|&action| self.is_legal(action)).collect())
    }

    /// Plays `action` for the player to move.
    ///
    /// # Errors
    ///
    /// [`UtttError::IllegalAction`] if the action is not legal; the board is
    /// not modified.
    pub fn apply(&mut self, action: Action) -> Result<()> {
        if !self.is_legal(action) {
            return Err(UtttError::IllegalAction {
                action: action.index(),
                reason: self.illegal_reason(action),
            });
        }

        let (row, col) = action.subboard();
        self.subboards[row as usize][col as usize].place(self.turn, action.cell());
        self.moves_played += 1;
        self.status = self.meta_status();

        let (next_row, next_col) = action.cell();
        self.active = if self.subboard_status(next_row, next_col).is_resolved() {
            ActiveSubboard::Any
        } else {
            ActiveSubboard::At(next_row, next_col)
        };
        self.turn = self.turn.other();

        Ok(())
    }

    /// `1.0` if X won, `-1.0` if O won, `0.0` for a draw, `None` while the
    /// game is running
    pub fn terminal_reward(&self) -> Option<f64> {
        match self.status {
            Status::WonByX => Some(1.0),
            Status::WonByO => Some(-1.0),
            Status::Drawn => Some(0.0),
            Status::Open => None,
        }
    }

    fn meta_status(&self) -> Status {
        let mut winners: [[Cell; 3]; 3] = [[None; 3]; 3];
        for (winner_row, subboard_row) in winners.iter_mut().zip(self.subboards.iter()) {
            for (winner, subboard) in winner_row.iter_mut().zip(subboard_row.iter()) {
                *winner = subboard.status().winner();
            }
        }

        if let Some(winner) = line_winner(&winners) {
            winner.won_status()
        } else if self
            .subboards
            .iter()
            .flatten()
            .all(|subboard| subboard.status().is_resolved())
        {
            Status::Drawn
        } else {
            Status::Open
        }
    }

    fn illegal_reason(&self, action: Action) -> String {
        let (row, col) = action.subboard();
        if self.is_terminal() {
            format!("game is over ({:?})", self.status)
        } else if !self.active.allows((row, col)) {
            format!("must play in sub-board {:?}", self.active)
        } else if self.subboard_status(row, col).is_resolved() {
            format!("sub-board ({row}, {col}) is already resolved")
        } else {
            "cell is already marked".to_string()
        }
    }
}

impl GameState for BoardState {
    type Action = Action;
    type Player = Player;

    fn legal_actions(&self) -> Result<Vec<Action>> {
        BoardState::legal_actions(self)
    }

    fn apply(&mut self, action: Action) -> Result<()> {
        BoardState::apply(self, action)
    }

    fn is_terminal(&self) -> bool {
        BoardState::is_terminal(self)
    }

    fn terminal_reward(&self) -> Option<f64> {
        BoardState::terminal_reward(self)
    }

    fn current_player(&self) -> Player {
        self.turn
    }
}

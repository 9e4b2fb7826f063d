//! Players, cell marks and board statuses.

/// One of the two players. X always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Returns the opponent
    pub fn other(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Status a board takes when this player completes a line on it
    pub fn won_status(self) -> Status {
        match self {
            Player::X => Status::WonByX,
            Player::O => Status::WonByO,
        }
    }
}

impl crate::game_state::Player for Player {
    fn sign(&self) -> f64 {
        match self {
            Player::X => 1.0,
            Player::O => -1.0,
        }
    }
}

/// Content of a single cell. `None` is an empty cell.
pub type Cell = Option<Player>;

/// Resolution status of a sub-board or of the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Open,
    WonByX,
    WonByO,
    Drawn,
}

impl Status {
    /// Returns true once the board is won or drawn
    pub fn is_resolved(self) -> bool {
        self != Status::Open
    }

    /// Returns the winning player, if any
    pub fn winner(self) -> Option<Player> {
        match self {
            Status::WonByX => Some(Player::X),
            Status::WonByO => Some(Player::O),
            Status::Open | Status::Drawn => None,
        }
    }
}

/// Returns the player owning a complete row, column or diagonal of `grid`.
///
/// Shared by sub-boards (over cell marks) and the meta-board (over sub-board
/// winners).
pub fn line_winner(grid: &[[Cell; 3]; 3]) -> Option<Player> {
    const LINES: [[(usize, usize); 3]; 8] = [
        [(0, 0), (0, 1), (0, 2)],
        [(1, 0), (1, 1), (1, 2)],
        [(2, 0), (2, 1), (2, 2)],
        [(0, 0), (1, 0), (2, 0)],
        [(0, 1), (1, 1), (2, 1)],
        [(0, 2), (1, 2), (2, 2)],
        [(0, 0), (1, 1), (2, 2)],
        [(0, 2), (1, 1), (2, 0)],
    ];

    LINES.iter().find_map(|line| {
        let [a, b, c] = line.map(|(row, col)| grid[row][col]);
        match a {
            Some(player) if b == a && c == a => Some(player),
            _ => None,
        }
    })
}

//! # uttt-mcts
//!
//! Monte Carlo Tree Search engines for Ultimate Tic-Tac-Toe.
//!
//! The crate has three layers:
//!
//! - [`uttt`]: the game rules ([`BoardState`], [`Action`]) and a step-based
//!   environment wrapper ([`UtttEnv`]).
//! - [`MCTS`]: a sequential engine owning one persistent tree. It is refined
//!   by every [`MCTS::run`] and advanced move by move with
//!   [`MCTS::move_root`], so statistics gathered for the position actually
//!   reached are reused on the next turn.
//! - [`PMCTS`]: a root-parallel engine. It keeps nothing between calls and
//!   merges the root visit counts of independent per-worker trees.
//!
//! Both engines only see the game through the [`GameState`] trait and search
//! for a wall-clock budget set in [`SearchConfig`].
//!
//! ## Basic Usage
//!
//! ```
//! use uttt_mcts::{BoardState, SearchConfig, MCTS, PMCTS};
//!
//! fn main() -> Result<(), uttt_mcts::UtttError> {
//!     let mut board = BoardState::new();
//!     let config = SearchConfig::default()
//!         .with_time_budget_secs(0.02)
//!         .with_max_iterations(100);
//!
//!     let mut mcts = MCTS::new(board.clone(), config.clone())?;
//!     let pmcts = PMCTS::new(config.with_workers(2))?;
//!
//!     // X: the persistent engine
//!     let action = mcts.run()?;
//!     mcts.move_root(action)?;
//!     board.apply(action)?;
//!
//!     // O: a fresh parallel search on the current board
//!     let reply = pmcts.run(&board)?;
//!     mcts.move_root(reply)?;
//!     board.apply(reply)?;
//!
//!     println!("tree size {}, root value {:.2}", mcts.tree_size(), mcts.root_value());
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! Every iteration runs the four MCTS phases:
//!
//! 1. **Selection**: from the root, descend through fully expanded nodes
//!    along the child with the best UCT score.
//! 2. **Expansion**: add one random untried action of the reached node.
//! 3. **Simulation**: play uniformly random moves to the end of the game.
//! 4. **Backpropagation**: add the result to every node on the path, each
//!    from the perspective of the player to move there.
//!
//! After the budget is spent the most visited root action is played.

pub mod config;
pub mod game_state;
pub mod mcts;
pub mod pmcts;
pub mod policy;
pub mod stats;
pub mod tree;
pub mod utils;
pub mod uttt;

pub use config::{BestChildCriteria, SearchConfig};
pub use game_state::{Action as GameAction, GameState, Player as GamePlayer};
pub use mcts::MCTS;
pub use pmcts::{aggregate_root_stats, PMCTS};
pub use policy::{SelectionPolicy, SimulationPolicy};
pub use stats::{ActionStats, SearchStatistics};
pub use tree::{Node, NodeId, SearchTree};
pub use uttt::{Action, ActiveSubboard, BoardState, Player, Status, Step, UtttEnv};

/// Error types for the game rules and the search engines
///
/// All variants are contract violations or fatal conditions; nothing is
/// retried internally.
#[derive(thiserror::Error, Debug)]
pub enum UtttError {
    /// The action is not legal in the current state (or not a valid encoding)
    #[error("illegal action {action}: {reason}")]
    IllegalAction { action: u8, reason: String },

    /// The operation is undefined for the current state
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The search tree cannot be advanced by the requested action
    #[error("invalid root transition: {0}")]
    InvalidTransition(String),

    /// A search was requested on a game that is already over
    #[error("cannot search a terminal state")]
    TerminalState,

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The random generator could not be seeded
    #[error("random source failure: {0}")]
    RandomSource(#[from] rand::Error),
}

/// Result type for crate operations
pub type Result<T> = std::result::Result<T, UtttError>;

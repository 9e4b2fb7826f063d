//! Traits defining the game-state interface shared by both search engines.
//!
//! The [`GameState`] trait is the only thing [`crate::MCTS`] and
//! [`crate::PMCTS`] know about the game they search. The Ultimate
//! Tic-Tac-Toe board in [`crate::uttt`] is the concrete implementation.

use std::fmt::Debug;
use std::hash::Hash;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{Result, UtttError};

/// Trait for actions that can be taken in a game
///
/// Actions are small `Copy` values. Their ordering is the tie-break order used
/// whenever two actions score the same, so it must be total and stable.
pub trait Action: Copy + Ord + Hash + Debug + Send + Sync {
    /// Returns a unique identifier for this action
    fn id(&self) -> usize;
}

/// Trait for players in a game
pub trait Player: Copy + Eq + Debug + Send + Sync {
    /// Multiplier that converts a reward given from the first player's
    /// perspective into this player's perspective (`+1.0` or `-1.0`).
    fn sign(&self) -> f64;
}

/// Trait defining the game state interface required for MCTS
///
/// States are mutated in place through [`GameState::apply`]; the search
/// engines clone a state whenever they need to keep the original.
pub trait GameState: Clone + Send + Sync {
    /// The type of actions that can be taken in this game
    type Action: Action;

    /// The type of players in this game
    type Player: Player;

    /// Returns the legal actions from this state in ascending order.
    ///
    /// # Errors
    ///
    /// [`UtttError::InvalidState`] when called on a terminal state. Callers
    /// must check [`GameState::is_terminal`] first.
    fn legal_actions(&self) -> Result<Vec<Self::Action>>;

    /// Applies `action` to this state.
    ///
    /// # Errors
    ///
    /// [`UtttError::IllegalAction`] if `action` is not one of
    /// [`GameState::legal_actions`]. The state is left untouched in that case.
    fn apply(&mut self, action: Self::Action) -> Result<()>;

    /// Returns true if the game is over
    fn is_terminal(&self) -> bool;

    /// Returns the final reward from the first player's perspective:
    /// `1.0` for a first-player win, `-1.0` for a loss, `0.0` for a draw.
    ///
    /// `None` while the game is still running.
    fn terminal_reward(&self) -> Option<f64>;

    /// Returns the player whose turn it is in this state
    fn current_player(&self) -> Self::Player;

    /// Plays uniformly random legal actions until the game ends and returns
    /// the terminal reward (first player's perspective).
    fn random_playout<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64> {
        let mut state = self.clone();

        while !state.is_terminal() {
            let actions = state.legal_actions()?;
            let action = *actions.choose(rng).ok_or_else(|| {
                UtttError::InvalidState("non-terminal state has no legal actions".to_string())
            })?;
            state.apply(action)?;
        }

        state.terminal_reward().ok_or_else(|| {
            UtttError::InvalidState("terminal state reported no reward".to_string())
        })
    }
}

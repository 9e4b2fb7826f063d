//! Simulation policies for the MCTS algorithm
//!
//! Simulation policies play a game out from a given state to estimate its
//! value. They draw randomness only from the generator passed in, which the
//! engine owns.

use rand::RngCore;

use crate::game_state::GameState;
use crate::Result;

/// Trait for policies that simulate games
pub trait SimulationPolicy<S: GameState>: Send + Sync {
    /// Simulates a game from `state` and returns the terminal reward from the
    /// first player's perspective
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> Result<f64>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>>;
}

/// Random simulation policy
///
/// Plays uniformly random legal moves until the game ends. A terminal state
/// is scored directly.
#[derive(Debug, Clone, Default)]
pub struct RandomPolicy;

impl RandomPolicy {
    pub fn new() -> Self {
        RandomPolicy
    }
}

impl<S: GameState> SimulationPolicy<S> for RandomPolicy {
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> Result<f64> {
        state.random_playout(rng)
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>> {
        Box::new(self.clone())
    }
}

impl<S: GameState> SimulationPolicy<S> for Box<dyn SimulationPolicy<S>> {
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> Result<f64> {
        (**self).simulate(state, rng)
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>> {
        (**self).clone_box()
    }
}

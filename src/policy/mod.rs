//! Policies for the pluggable phases of the MCTS algorithm
//!
//! - Selection policies: how to choose which expanded child to descend into
//! - Simulation policies: how to play out games from a node

pub mod selection;
pub mod simulation;

pub use selection::{SelectionPolicy, UctPolicy};
pub use simulation::{RandomPolicy, SimulationPolicy};

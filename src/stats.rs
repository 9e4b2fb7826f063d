//! Statistics collection for MCTS searches
//!
//! [`SearchStatistics`] describes one `run` call; [`ActionStats`] is the
//! per-action summary at the root that both engines pick their move from.

use std::time::Duration;

/// Statistics collected during one search
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    /// Number of iterations performed
    pub iterations: usize,

    /// Total time spent searching
    pub total_time: Duration,

    /// Number of live nodes in the tree when the search finished
    pub tree_size: usize,

    /// Deepest node reached by selection, counted from the root
    pub max_depth: usize,

    /// Whether the search stopped because the deadline passed (as opposed to
    /// reaching the iteration cap)
    pub deadline_reached: bool,
}

impl SearchStatistics {
    /// Creates a new, empty statistics object
    pub fn new() -> Self {
        SearchStatistics {
            iterations: 0,
            total_time: Duration::from_secs(0),
            tree_size: 1,
            max_depth: 0,
            deadline_reached: false,
        }
    }

    /// Returns the average time per iteration in microseconds
    pub fn avg_time_per_iteration_us(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.total_time.as_micros() as f64 / self.iterations as f64
    }

    /// Returns the number of iterations per second
    pub fn iterations_per_second(&self) -> f64 {
        if self.total_time.as_secs_f64() <= 0.0 {
            return 0.0;
        }
        self.iterations as f64 / self.total_time.as_secs_f64()
    }

    /// Returns a one-line summary, suitable for logging
    pub fn summary(&self) -> String {
        format!(
            "iterations={} time={:.3}s avg={:.1}us tree_size={} max_depth={} it/s={:.1} deadline_reached={}",
            self.iterations,
            self.total_time.as_secs_f64(),
            self.avg_time_per_iteration_us(),
            self.tree_size,
            self.max_depth,
            self.iterations_per_second(),
            self.deadline_reached
        )
    }
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Visit and value totals of one root action.
///
/// `value_sum` is from the perspective of the player choosing the action.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionStats {
    pub visits: u64,
    pub value_sum: f64,
}

impl ActionStats {
    pub fn new(visits: u64, value_sum: f64) -> Self {
        ActionStats { visits, value_sum }
    }

    /// Mean value, `0.0` when unvisited
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            return 0.0;
        }
        self.value_sum / self.visits as f64
    }

    /// Adds another worker's totals for the same action
    pub fn merge(&mut self, other: &ActionStats) {
        self.visits += other.visits;
        self.value_sum += other.value_sum;
    }
}

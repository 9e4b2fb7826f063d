//! Configuration options for the search engines
//!
//! One [`SearchConfig`] drives both the sequential [`crate::MCTS`] engine and
//! the root-parallel [`crate::PMCTS`] engine.

use std::time::{Duration, Instant};

use crate::{Result, UtttError};

/// Longest accepted time budget (one year)
///
/// Anything longer cannot be turned into a deadline reliably and is rejected
/// by [`SearchConfig::validate`].
pub const MAX_TIME_BUDGET: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Criteria for selecting the best child after search is complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestChildCriteria {
    /// Select the child with the most visits
    ///
    /// Ties go to the higher mean value, then to the lower action index.
    MostVisits,

    /// Select the child with the highest mean value
    ///
    /// Ties go to the higher visit count, then to the lower action index.
    /// Prone to picking rarely visited children; use with long budgets.
    HighestValue,
}

/// Configuration for a search
///
/// # Example
///
/// ```
/// use uttt_mcts::{SearchConfig, config::BestChildCriteria};
///
/// let config = SearchConfig::default()
///     .with_exploration_constant(1.5)
///     .with_time_budget_secs(0.25)
///     .with_seed(7)
///     .with_workers(4)
///     .with_best_child_criteria(BestChildCriteria::MostVisits);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Exploration constant `C` of the UCT score
    pub exploration_constant: f64,

    /// Wall-clock budget of one `run` call
    ///
    /// Checked between iterations only, so a search always completes at least
    /// one iteration and may overrun by at most one iteration.
    pub time_budget: Duration,

    /// Optional cap on iterations per `run` call
    ///
    /// With a cap, a generous time budget and a fixed seed, a search is fully
    /// reproducible.
    pub max_iterations: Option<usize>,

    /// Seed of the search's random generator; `None` seeds from entropy
    pub seed: Option<u64>,

    /// Number of parallel workers for [`crate::PMCTS`]; `None` uses the
    /// available parallelism of the machine
    pub workers: Option<usize>,

    /// Criteria for selecting the action returned by `run`
    pub best_child_criteria: BestChildCriteria,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            exploration_constant: 1.41,
            time_budget: Duration::from_secs(1),
            max_iterations: None,
            seed: None,
            workers: None,
            best_child_criteria: BestChildCriteria::MostVisits,
        }
    }
}

impl SearchConfig {
    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the time budget
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Sets the time budget in (fractional) seconds
    ///
    /// Negative and NaN values become zero, which still runs one iteration.
    /// Infinite or overflowing values saturate to [`Duration::MAX`], which
    /// [`SearchConfig::validate`] rejects.
    pub fn with_time_budget_secs(mut self, seconds: f64) -> Self {
        self.time_budget = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX);
        self
    }

    /// Caps the number of iterations per search
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Fixes the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of parallel workers
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Sets the criteria for selecting the best child
    pub fn with_best_child_criteria(mut self, criteria: BestChildCriteria) -> Self {
        self.best_child_criteria = criteria;
        self
    }

    /// Worker count to use, resolving `None` to the machine's parallelism
    pub fn resolved_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Deadline of a search started at `start`
    ///
    /// # Errors
    ///
    /// [`UtttError::InvalidConfiguration`] if the budget overflows the clock.
    pub fn deadline_from(&self, start: Instant) -> Result<Instant> {
        start.checked_add(self.time_budget).ok_or_else(|| {
            UtttError::InvalidConfiguration(format!(
                "time budget {:?} overflows the clock",
                self.time_budget
            ))
        })
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// [`UtttError::InvalidConfiguration`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(UtttError::InvalidConfiguration(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if self.max_iterations == Some(0) {
            return Err(UtttError::InvalidConfiguration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.time_budget > MAX_TIME_BUDGET {
            return Err(UtttError::InvalidConfiguration(format!(
                "time budget must be at most {:?}, got {:?}",
                MAX_TIME_BUDGET, self.time_budget
            )));
        }
        if self.workers == Some(0) {
            return Err(UtttError::InvalidConfiguration(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

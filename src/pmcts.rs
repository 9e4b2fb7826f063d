//! Root-parallel Monte Carlo Tree Search
//!
//! [`PMCTS`] keeps no tree between calls. Each [`PMCTS::run`] clones the
//! board into `W` workers, each of which grows its own independent
//! [`MCTS`](crate::MCTS) tree with its own random stream until a shared
//! deadline. Only the root statistics are merged afterwards, so the workers
//! never synchronize while searching.

use std::collections::BTreeMap;
use std::thread;
use std::time::Instant;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{
    config::SearchConfig,
    game_state::GameState,
    mcts::{seeded_rng, MCTS},
    policy::{
        selection::{SelectionPolicy, UctPolicy},
        simulation::{RandomPolicy, SimulationPolicy},
    },
    stats::ActionStats,
    utils::best_action,
    Result, UtttError,
};

/// Sums per-action root statistics across workers.
///
/// Actions explored by only some workers keep the totals of those workers.
pub fn aggregate_root_stats<A, I>(per_worker: I) -> BTreeMap<A, ActionStats>
where
    A: Ord + Copy,
    I: IntoIterator<Item = BTreeMap<A, ActionStats>>,
{
    let mut total: BTreeMap<A, ActionStats> = BTreeMap::new();
    for worker in per_worker {
        for (action, stats) in worker {
            total.entry(action).or_default().merge(&stats);
        }
    }
    total
}

/// Everything one worker needs, moved onto its thread
struct WorkerJob<S: GameState> {
    state: S,
    config: SearchConfig,
    seed: u64,
    selection_policy: Box<dyn SelectionPolicy<S>>,
    simulation_policy: Box<dyn SimulationPolicy<S>>,
    deadline: Instant,
}

impl<S: GameState + 'static> WorkerJob<S> {
    fn run(self) -> Result<BTreeMap<S::Action, ActionStats>> {
        let mut mcts = MCTS::with_rng(self.state, self.config, StdRng::seed_from_u64(self.seed))?
            .with_selection_policy(self.selection_policy)
            .with_simulation_policy(self.simulation_policy);
        mcts.search(self.deadline)?;
        Ok(mcts.root_action_stats())
    }
}

/// The root-parallel search engine
///
/// # Example
///
/// ```
/// use uttt_mcts::{BoardState, SearchConfig, PMCTS};
///
/// let board = BoardState::new();
/// let pmcts = PMCTS::new(
///     SearchConfig::default()
///         .with_time_budget_secs(0.05)
///         .with_max_iterations(100)
///         .with_workers(2),
/// )?;
///
/// let action = pmcts.run(&board)?;
/// assert!(board.is_legal(action));
/// # Ok::<(), uttt_mcts::UtttError>(())
/// ```
pub struct PMCTS<S: GameState> {
    config: SearchConfig,
    selection_policy: Box<dyn SelectionPolicy<S>>,
    simulation_policy: Box<dyn SimulationPolicy<S>>,
}

impl<S: GameState + 'static> PMCTS<S> {
    /// Creates a parallel engine.
    ///
    /// # Errors
    ///
    /// [`UtttError::InvalidConfiguration`] for a bad config.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let selection_policy: Box<dyn SelectionPolicy<S>> =
            Box::new(UctPolicy::new(config.exploration_constant));
        let simulation_policy: Box<dyn SimulationPolicy<S>> = Box::new(RandomPolicy::new());

        Ok(PMCTS {
            config,
            selection_policy,
            simulation_policy,
        })
    }

    /// Sets the selection policy every worker uses
    pub fn with_selection_policy<P: SelectionPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the simulation policy every worker uses
    pub fn with_simulation_policy<P: SimulationPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.simulation_policy = Box::new(policy);
        self
    }

    /// Number of workers a run will try to spawn
    pub fn workers(&self) -> usize {
        self.config.resolved_workers()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Seeds of the per-worker random streams for one run.
    ///
    /// Drawn from a master stream built from the configured seed, so every
    /// worker searches differently while a fixed seed still reproduces the
    /// whole run.
    ///
    /// # Errors
    ///
    /// [`UtttError::RandomSource`] if no seed is configured and entropy is
    /// unavailable.
    pub fn worker_seeds(&self) -> Result<Vec<u64>> {
        let mut master = seeded_rng(self.config.seed)?;
        Ok((0..self.workers()).map(|_| master.gen()).collect())
    }

    /// Searches `board` in parallel and returns the action with the most
    /// visits summed over all workers.
    ///
    /// # Errors
    ///
    /// [`UtttError::TerminalState`] if `board` is already decided,
    /// [`UtttError::RandomSource`] if worker seeds cannot be drawn.
    pub fn run(&self, board: &S) -> Result<S::Action> {
        self.run_with_stats(board).map(|(action, _)| action)
    }

    /// Like [`PMCTS::run`], also returning the aggregated root statistics
    pub fn run_with_stats(&self, board: &S) -> Result<(S::Action, BTreeMap<S::Action, ActionStats>)> {
        if board.is_terminal() {
            return Err(UtttError::TerminalState);
        }

        let start = Instant::now();
        let deadline = self.config.deadline_from(start)?;
        let workers = self.workers();
        let seeds = self.worker_seeds()?;

        let results = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);

            for (index, &seed) in seeds.iter().enumerate() {
                let job = self.job(board, seed, deadline);
                let spawned = thread::Builder::new()
                    .name(format!("pmcts-worker-{index}"))
                    .spawn_scoped(scope, move || job.run());
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => warn!("could not spawn search worker {index}: {err}"),
                }
            }

            if handles.is_empty() {
                warn!("no search worker could be spawned, searching on the calling thread");
                return vec![self.job(board, seeds[0], deadline).run()];
            }
            if handles.len() < workers {
                warn!("searching with {} of {} workers", handles.len(), workers);
            }

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect::<Vec<_>>()
        });

        let per_worker = results.into_iter().collect::<Result<Vec<_>>>()?;
        let finished = per_worker.len();
        let total = aggregate_root_stats(per_worker);

        let action = best_action(&total, self.config.best_child_criteria).ok_or_else(|| {
            UtttError::InvalidState("no worker explored any root action".to_string())
        })?;

        debug!(
            "parallel search finished: workers={} visits={} time={:.3}s chosen={:?}",
            finished,
            total.values().map(|stats| stats.visits).sum::<u64>(),
            start.elapsed().as_secs_f64(),
            action
        );

        Ok((action, total))
    }

    fn job(&self, board: &S, seed: u64, deadline: Instant) -> WorkerJob<S> {
        WorkerJob {
            state: board.clone(),
            config: self.config.clone(),
            seed,
            selection_policy: self.selection_policy.clone_box(),
            simulation_policy: self.simulation_policy.clone_box(),
            deadline,
        }
    }
}

//! Sequential Monte Carlo Tree Search with tree reuse
//!
//! [`MCTS`] owns a single search tree that persists across calls. Each
//! [`MCTS::run`] refines it for one time budget, and [`MCTS::move_root`]
//! advances it by one move while keeping the statistics of the subtree that
//! is still reachable.

use std::collections::BTreeMap;
use std::time::Instant;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{
    config::SearchConfig,
    game_state::GameState,
    policy::{
        selection::{SelectionPolicy, UctPolicy},
        simulation::{RandomPolicy, SimulationPolicy},
    },
    stats::{ActionStats, SearchStatistics},
    tree::{Node, NodeId, SearchTree},
    utils::best_action,
    Result, UtttError,
};

/// Builds the generator for one search: seeded if `seed` is set, otherwise
/// from the thread-local entropy source.
///
/// # Errors
///
/// [`UtttError::RandomSource`] if the entropy source fails.
pub(crate) fn seeded_rng(seed: Option<u64>) -> Result<StdRng> {
    match seed {
        Some(seed) => Ok(StdRng::seed_from_u64(seed)),
        None => Ok(StdRng::from_rng(rand::thread_rng())?),
    }
}

/// The sequential Monte Carlo Tree Search engine
///
/// # Example
///
/// ```
/// use uttt_mcts::{BoardState, SearchConfig, MCTS};
///
/// let mut board = BoardState::new();
/// let config = SearchConfig::default()
///     .with_time_budget_secs(0.05)
///     .with_max_iterations(200)
///     .with_seed(1);
/// let mut mcts = MCTS::new(board.clone(), config)?;
///
/// let action = mcts.run()?;
/// mcts.move_root(action)?;
/// board.apply(action)?;
/// assert_eq!(mcts.root_state(), &board);
/// # Ok::<(), uttt_mcts::UtttError>(())
/// ```
pub struct MCTS<S: GameState> {
    /// The persistent search tree
    tree: SearchTree<S>,

    /// Configuration for the search
    config: SearchConfig,

    /// Statistics of the last `run`
    statistics: SearchStatistics,

    /// Policy for selecting nodes during the selection phase
    selection_policy: Box<dyn SelectionPolicy<S>>,

    /// Policy for simulating games during the simulation phase
    simulation_policy: Box<dyn SimulationPolicy<S>>,

    /// Random stream owned by this tree
    rng: StdRng,
}

impl<S: GameState + 'static> MCTS<S> {
    /// Creates an engine searching from `initial_state`.
    ///
    /// # Errors
    ///
    /// [`UtttError::InvalidConfiguration`] for a bad config,
    /// [`UtttError::RandomSource`] if no seed is configured and entropy is
    /// unavailable.
    pub fn new(initial_state: S, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let rng = seeded_rng(config.seed)?;
        Self::with_rng(initial_state, config, rng)
    }

    /// Creates an engine that draws from the given generator instead of the
    /// configured seed
    pub fn with_rng(initial_state: S, config: SearchConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let tree = SearchTree::new(initial_state)?;
        let selection_policy: Box<dyn SelectionPolicy<S>> =
            Box::new(UctPolicy::new(config.exploration_constant));
        let simulation_policy: Box<dyn SimulationPolicy<S>> = Box::new(RandomPolicy::new());

        Ok(MCTS {
            tree,
            config,
            statistics: SearchStatistics::new(),
            selection_policy,
            simulation_policy,
            rng,
        })
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<P: SelectionPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the simulation policy to use
    pub fn with_simulation_policy<P: SimulationPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.simulation_policy = Box::new(policy);
        self
    }

    /// Searches for the configured time budget and returns the recommended
    /// action.
    ///
    /// # Errors
    ///
    /// [`UtttError::TerminalState`] if the root state is already decided,
    /// [`UtttError::InvalidConfiguration`] if the budget overflows the clock.
    pub fn run(&mut self) -> Result<S::Action> {
        let deadline = self.config.deadline_from(Instant::now())?;
        self.search(deadline)
    }

    /// Searches until `deadline` instead of the configured budget
    pub fn run_until(&mut self, deadline: Instant) -> Result<S::Action> {
        self.search(deadline)
    }

    /// Runs iterations until the deadline passes or the iteration cap is hit.
    ///
    /// The deadline is only checked between iterations, so at least one
    /// iteration always completes.
    pub(crate) fn search(&mut self, deadline: Instant) -> Result<S::Action> {
        if self.tree.root_node().is_terminal() {
            return Err(UtttError::TerminalState);
        }

        self.statistics = SearchStatistics::new();
        let start = Instant::now();

        loop {
            self.execute_iteration()?;
            self.statistics.iterations += 1;

            if let Some(max_iterations) = self.config.max_iterations {
                if self.statistics.iterations >= max_iterations {
                    break;
                }
            }
            if Instant::now() >= deadline {
                self.statistics.deadline_reached = true;
                break;
            }
        }

        self.statistics.total_time = start.elapsed();
        self.statistics.tree_size = self.tree.len();
        debug!("search finished: {}", self.statistics.summary());

        self.select_best_action()
    }

    /// Execute a single iteration of the MCTS algorithm
    fn execute_iteration(&mut self) -> Result<()> {
        // 1. Selection phase
        let (selected, depth) = self.selection();

        // 2. Expansion phase
        let leaf = match self.expansion(selected)? {
            Some(child) => {
                self.statistics.max_depth = self.statistics.max_depth.max(depth + 1);
                child
            }
            None => selected,
        };

        // 3. Simulation phase
        let reward = self.simulation(leaf)?;

        // 4. Backpropagation phase
        self.tree.backpropagate(leaf, reward);

        Ok(())
    }

    /// Selection phase: descend through fully expanded, non-terminal nodes
    fn selection(&mut self) -> (NodeId, usize) {
        let mut current = self.tree.root();
        let mut depth = 0;

        loop {
            let node = self.tree.get(current);
            if node.is_terminal() || !node.is_fully_expanded() {
                break;
            }
            match self.selection_policy.select_child(&self.tree, current) {
                Some(child) => {
                    current = child;
                    depth += 1;
                }
                None => break,
            }
        }

        self.statistics.max_depth = self.statistics.max_depth.max(depth);
        (current, depth)
    }

    /// Expansion phase: materialize one random untried action of `node`
    fn expansion(&mut self, node: NodeId) -> Result<Option<NodeId>> {
        let untried = self.tree.get(node).untried.len();
        if untried == 0 {
            return Ok(None);
        }

        let index = self.rng.gen_range(0..untried);
        self.tree.expand(node, index).map(Some)
    }

    /// Simulation phase: score a terminal node directly, otherwise play out
    fn simulation(&mut self, node: NodeId) -> Result<f64> {
        let state = &self.tree.get(node).state;
        match state.terminal_reward() {
            Some(reward) => Ok(reward),
            None => self.simulation_policy.simulate(state, &mut self.rng),
        }
    }

    fn select_best_action(&self) -> Result<S::Action> {
        best_action(&self.tree.root_action_stats(), self.config.best_child_criteria).ok_or_else(
            || UtttError::InvalidState("root has no explored actions".to_string()),
        )
    }

    /// Advances the tree by `action`, keeping the statistics of the chosen
    /// subtree and discarding everything else.
    ///
    /// # Errors
    ///
    /// [`UtttError::InvalidTransition`] if `action` is not legal at the root.
    pub fn move_root(&mut self, action: S::Action) -> Result<()> {
        let before = self.tree.len();
        self.tree.reroot(action)?;

        let root = self.tree.root_node();
        trace!(
            "moved root by {:?}: tree {} -> {} nodes, new root visits {}",
            action,
            before,
            self.tree.len(),
            root.visits
        );
        Ok(())
    }

    /// Number of nodes in the tree, root included
    pub fn tree_size(&self) -> usize {
        self.tree.len()
    }

    /// Mean value of the root from the perspective of the player to move
    /// there, `0.0` before the first visit
    pub fn root_value(&self) -> f64 {
        self.tree.root_node().value()
    }

    /// The state the tree is currently rooted at
    pub fn root_state(&self) -> &S {
        &self.tree.root_node().state
    }

    /// Visit and value totals of the explored root actions
    pub fn root_action_stats(&self) -> BTreeMap<S::Action, ActionStats> {
        self.tree.root_action_stats()
    }

    pub fn tree(&self) -> &SearchTree<S> {
        &self.tree
    }

    /// Returns the statistics of the last search
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Returns an indented dump of the tree down to `max_depth` levels
    /// below the root
    pub fn visualize_tree(&self, max_depth: usize) -> String {
        let mut result = String::new();
        self.visualize_node(self.tree.root(), 0, max_depth, &mut result);
        result
    }

    fn visualize_node(&self, id: NodeId, depth: usize, max_depth: usize, output: &mut String) {
        let node: &Node<S> = self.tree.get(id);
        let indent = "  ".repeat(depth);
        let action_str = match &node.action {
            Some(action) if depth > 0 => format!("{:?}", action),
            _ => "Root".to_string(),
        };

        output.push_str(&format!(
            "{}{} (visits: {}, value: {:.3})\n",
            indent,
            action_str,
            node.visits,
            node.value()
        ));

        if depth < max_depth {
            for &child in node.children.values() {
                self.visualize_node(child, depth + 1, max_depth, output);
            }
        }
    }
}

//! Selection policies for the MCTS algorithm
//!
//! Selection policies pick which expanded child to descend into during the
//! selection phase, balancing exploration and exploitation.

use crate::game_state::GameState;
use crate::tree::{NodeId, SearchTree};
use crate::utils::uct_score;

/// Trait for policies that select nodes to explore
pub trait SelectionPolicy<S: GameState>: Send + Sync {
    /// Picks a child of `node` among its expanded children.
    ///
    /// Returns `None` when `node` has no children.
    fn select_child(&self, tree: &SearchTree<S>, node: NodeId) -> Option<NodeId>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SelectionPolicy<S>>;
}

/// Upper Confidence bound applied to Trees (UCT)
///
/// ```text
/// UCT = mean_value + C * sqrt(ln(parent_visits) / child_visits)
/// ```
///
/// `mean_value` is the child's mean re-expressed from the perspective of the
/// player to act at the parent. Unvisited children score +infinity. Equal
/// scores go to the lowest action.
#[derive(Debug, Clone)]
pub struct UctPolicy {
    /// Exploration constant `C`
    pub exploration_constant: f64,
}

impl UctPolicy {
    pub fn new(exploration_constant: f64) -> Self {
        UctPolicy {
            exploration_constant,
        }
    }
}

impl Default for UctPolicy {
    fn default() -> Self {
        Self::new(1.41)
    }
}

impl<S: GameState> SelectionPolicy<S> for UctPolicy {
    fn select_child(&self, tree: &SearchTree<S>, node: NodeId) -> Option<NodeId> {
        let parent = tree.get(node);
        let mover = parent.state.current_player();

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in parent.children.values() {
            let child = tree.get(child_id);
            let mean = if child.visits == 0 {
                0.0
            } else {
                child.value_sum_for(&mover) / child.visits as f64
            };
            let score = uct_score(mean, child.visits, parent.visits, self.exploration_constant);

            // Strict comparison keeps the lowest action on ties.
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }

        best.map(|(id, _)| id)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy<S>> {
        Box::new(self.clone())
    }
}

impl<S: GameState> SelectionPolicy<S> for Box<dyn SelectionPolicy<S>> {
    fn select_child(&self, tree: &SearchTree<S>, node: NodeId) -> Option<NodeId> {
        (**self).select_child(tree, node)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy<S>> {
        (**self).clone_box()
    }
}

//! Arena-backed search tree
//!
//! Nodes live in a slot vector and refer to each other through [`NodeId`]
//! handles. Rebasing the root releases the discarded part of the tree into a
//! free list that later expansions reuse, so [`SearchTree::reroot`] costs time
//! proportional to what it throws away.

use std::collections::BTreeMap;

use crate::game_state::{GameState, Player};
use crate::stats::ActionStats;
use crate::{Result, UtttError};

/// Handle of a node inside one [`SearchTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the search tree
///
/// Each node caches the game state it stands for. `value_sum` accumulates
/// rewards from the perspective of the player to act in that state.
#[derive(Debug, Clone)]
pub struct Node<S: GameState> {
    /// The game state at this node
    pub state: S,

    /// The action that led here (`None` for a root created from scratch)
    pub action: Option<S::Action>,

    /// Parent node (`None` for the root)
    pub parent: Option<NodeId>,

    /// Number of times this node has been visited
    pub visits: u64,

    /// Sum of backpropagated rewards, from the mover-at-this-node's view
    pub value_sum: f64,

    /// Expanded children keyed by action
    pub children: BTreeMap<S::Action, NodeId>,

    /// Legal actions that have not been expanded yet
    pub untried: Vec<S::Action>,

    /// Depth counted from the node the tree was first built from
    pub depth: usize,
}

impl<S: GameState> Node<S> {
    /// Creates an unvisited node for `state`
    pub fn new(
        state: S,
        action: Option<S::Action>,
        parent: Option<NodeId>,
        depth: usize,
    ) -> Result<Self> {
        let untried = if state.is_terminal() {
            Vec::new()
        } else {
            state.legal_actions()?
        };

        Ok(Node {
            state,
            action,
            parent,
            visits: 0,
            value_sum: 0.0,
            children: BTreeMap::new(),
            untried,
            depth,
        })
    }

    /// Mean value from this node's mover's perspective, `0.0` if unvisited
    pub fn value(&self) -> f64 {
        if self.visits == 0 {
            return 0.0;
        }
        self.value_sum / self.visits as f64
    }

    /// Value sum re-expressed from `player`'s perspective
    pub fn value_sum_for(&self, player: &S::Player) -> f64 {
        self.value_sum * self.state.current_player().sign() * player.sign()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Returns true if every legal action has a child
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Search tree owning all of its nodes
#[derive(Debug, Clone)]
pub struct SearchTree<S: GameState> {
    slots: Vec<Option<Node<S>>>,
    free: Vec<NodeId>,
    root: NodeId,
    len: usize,
}

impl<S: GameState> SearchTree<S> {
    /// Creates a tree holding a single root node for `state`
    pub fn new(state: S) -> Result<Self> {
        let root = Node::new(state, None, None, 0)?;
        Ok(SearchTree {
            slots: vec![Some(root)],
            free: Vec::new(),
            root: NodeId(0),
            len: 1,
        })
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn root_node(&self) -> &Node<S> {
        self.get(self.root)
    }

    /// Returns the node behind `id`.
    ///
    /// # Panics
    ///
    /// If `id` was released by a reroot. Handles are only ever obtained from
    /// this tree, and the engine never keeps one across a reroot.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<S> {
        self.slots[id.index()]
            .as_ref()
            .expect("node handle refers to a released slot")
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        self.slots[id.index()]
            .as_mut()
            .expect("node handle refers to a released slot")
    }

    /// Number of live nodes, root included
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a tree keeps its root
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots ever allocated, live or free
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Child of `parent` reached through `action`, if expanded
    pub fn child(&self, parent: NodeId, action: S::Action) -> Option<NodeId> {
        self.get(parent).children.get(&action).copied()
    }

    fn allocate(&mut self, node: Node<S>) -> NodeId {
        self.len += 1;
        match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Some(node);
                id
            }
            None => {
                let id = NodeId(self.slots.len() as u32);
                self.slots.push(Some(node));
                id
            }
        }
    }

    /// Expands `parent.untried[untried_index]` into a new child node.
    ///
    /// The untried list is reordered by `swap_remove`.
    ///
    /// # Errors
    ///
    /// [`UtttError::InvalidState`] if the index is out of range; any error of
    /// [`GameState::apply`].
    pub fn expand(&mut self, parent: NodeId, untried_index: usize) -> Result<NodeId> {
        let node = self.get_mut(parent);
        if untried_index >= node.untried.len() {
            return Err(UtttError::InvalidState(format!(
                "untried index {untried_index} out of range ({} untried)",
                node.untried.len()
            )));
        }

        let action = node.untried.swap_remove(untried_index);
        let depth = node.depth + 1;
        let mut state = node.state.clone();
        if let Err(err) = state.apply(action) {
            // Keep the node consistent with its legal action set.
            self.get_mut(parent).untried.push(action);
            return Err(err);
        }

        let child = self.allocate(Node::new(state, Some(action), Some(parent), depth)?);
        self.get_mut(parent).children.insert(action, child);
        Ok(child)
    }

    /// Adds `reward` (first player's perspective) to `leaf` and each of its
    /// ancestors, converted to the perspective of the player to act at each
    /// node.
    pub fn backpropagate(&mut self, leaf: NodeId, reward: f64) {
        let mut current = Some(leaf);

        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            node.value_sum += reward * node.state.current_player().sign();
            current = node.parent;
        }
    }

    /// Visit and value totals of each expanded root action, with values from
    /// the root mover's perspective
    pub fn root_action_stats(&self) -> BTreeMap<S::Action, ActionStats> {
        let root = self.root_node();
        let mover = root.state.current_player();

        root.children
            .iter()
            .map(|(&action, &id)| {
                let child = self.get(id);
                (action, ActionStats::new(child.visits, child.value_sum_for(&mover)))
            })
            .collect()
    }

    /// Makes the child for `action` the new root and releases everything else.
    ///
    /// An unexplored but legal action gets a fresh child with zero
    /// statistics.
    ///
    /// # Errors
    ///
    /// [`UtttError::InvalidTransition`] if the root is terminal or `action` is
    /// not legal at the root. The tree is unchanged in that case.
    pub fn reroot(&mut self, action: S::Action) -> Result<()> {
        let old_root = self.root;
        let root = self.get(old_root);

        if root.is_terminal() {
            return Err(UtttError::InvalidTransition(format!(
                "cannot play {action:?}: root state is terminal"
            )));
        }

        let explored = root.children.get(&action).copied();
        let untried_index = root.untried.iter().position(|&a| a == action);

        let new_root = match (explored, untried_index) {
            (Some(child), _) => child,
            (None, Some(index)) => self.expand(old_root, index)?,
            (None, None) => {
                return Err(UtttError::InvalidTransition(format!(
                    "{action:?} is not a legal action at the root"
                )))
            }
        };

        self.release_except(old_root, new_root);
        self.get_mut(new_root).parent = None;
        self.root = new_root;
        Ok(())
    }

    /// Releases the subtree under `top`, keeping the subtree under `keep`.
    fn release_except(&mut self, top: NodeId, keep: NodeId) {
        let mut stack = vec![top];

        while let Some(id) = stack.pop() {
            if let Some(node) = self.slots[id.index()].take() {
                stack.extend(node.children.values().copied().filter(|&child| child != keep));
                self.free.push(id);
                self.len -= 1;
            }
        }
    }
}

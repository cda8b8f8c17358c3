use std::cmp::Reverse;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use ordered_float::OrderedFloat;
use tracing::{debug, info};

use crate::error::MctsError;
use crate::game::{GameAction, GameState, Player};
use crate::node::Node;
use crate::rollout;

/// Exploration constant used during growth. `sqrt(2)` is the theoretical
/// optimum under the standard UCB1 regret bound.
pub const EXPLORATION_C: f64 = std::f64::consts::SQRT_2;

/// Owns the node arena and the index of the current root. `advance`
/// re-roots the tree by promoting a child and compacting away everything
/// that is no longer reachable, so no node outlives its tree.
pub struct GameTree<A, S>
where
    A: GameAction,
    S: GameState<A>,
{
    pub arena: Vec<Node<A, S>>,
    pub root: usize,
}

impl<A, S> GameTree<A, S>
where
    A: GameAction,
    S: GameState<A>,
{
    pub fn new(starting_state: S, maximizing_player: Player) -> Self {
        let root = Node::new(None, starting_state, A::empty(), maximizing_player);
        GameTree {
            arena: vec![root],
            root: 0,
        }
    }

    pub fn current_state(&self) -> &S {
        &self.arena[self.root].state
    }

    pub fn root_visits(&self) -> u32 {
        self.arena[self.root].visits
    }

    /// UCT value of `child` from `for_player`'s perspective. `+inf` for an
    /// unvisited child, forcing first-visit expansion.
    pub fn uct(&self, child: usize, for_player: Player, c: f64) -> f64 {
        let child_node = &self.arena[child];
        if child_node.visits == 0 {
            return f64::INFINITY;
        }
        let parent = child_node
            .parent
            .expect("uct requires a node with a parent");
        let parent_visits = self.arena[parent].visits as f64;
        child_node.win_rate(for_player)
            + c * (parent_visits.ln() / child_node.visits as f64).sqrt()
    }

    /// The child of `node` maximising UCT from `node`'s current player's
    /// perspective. Ties are broken by insertion order — the first maximal
    /// element wins, not the last (`Iterator::max_by_key` would pick the
    /// last on ties, which is wrong here).
    pub fn select_best_child(&self, node: usize, c: f64) -> Result<usize, MctsError> {
        let children = &self.arena[node].children;
        if children.is_empty() {
            return Err(MctsError::NoChildren);
        }
        let for_player = self.arena[node].state.current_player();
        let mut best = children[0];
        let mut best_value = self.uct(best, for_player, c);
        for &child in &children[1..] {
            let value = self.uct(child, for_player, c);
            if value > best_value {
                best_value = value;
                best = child;
            }
        }
        Ok(best)
    }

    /// Descends from the root choosing `select_best_child` at every
    /// fully-expanded non-terminal node, stopping at the first node that is
    /// either terminal or not fully expanded.
    pub fn select(&self) -> usize {
        let mut current = self.root;
        loop {
            let node = &self.arena[current];
            if node.terminal || !node.is_fully_expanded() {
                return current;
            }
            current = self
                .select_best_child(current, EXPLORATION_C)
                .expect("a fully expanded non-terminal node must have children");
        }
    }

    /// Expands one child of `leaf` (popping the front of its untried
    /// actions) and returns its index. On a terminal node, degenerates to
    /// re-rolling `leaf` itself — repeatedly rolling out a terminal node is
    /// harmless since its outcome is constant.
    pub fn expand(&mut self, leaf: usize) -> Result<usize, MctsError> {
        if self.arena[leaf].terminal {
            return Ok(leaf);
        }
        if self.arena[leaf].is_fully_expanded() {
            return Err(MctsError::CannotExpand);
        }
        let action = self.arena[leaf]
            .untried_actions
            .pop_front()
            .expect("is_fully_expanded guards this");
        let child_state = self.arena[leaf].state.next_state(&action);
        let maximizing_player = self.arena[leaf].maximizing_player;
        let child = Node::new(Some(leaf), child_state, action, maximizing_player);
        let child_idx = self.arena.len();
        self.arena.push(child);
        self.arena[leaf].children.push(child_idx);
        Ok(child_idx)
    }

    fn back_propagate(&mut self, mut node: usize, outcome: f64) {
        loop {
            let current = &mut self.arena[node];
            current.score += outcome;
            current.visits += 1;
            match current.parent {
                Some(parent) => node = parent,
                None => break,
            }
        }
    }

    /// Runs iterations of select/expand/rollout/back-propagate until either
    /// `max_iterations` is reached or `max_seconds` has elapsed, checked
    /// only between iterations. `grow(0, _)` and `grow(_, 0)` both leave the
    /// tree unchanged. Returns the number of iterations actually run.
    pub fn grow(&mut self, max_iterations: u32, max_seconds: u64) -> u32 {
        let start = Instant::now();
        let budget = Duration::from_secs(max_seconds);
        let mut iterations = 0u32;
        while iterations < max_iterations && start.elapsed() < budget {
            let leaf = self.select();
            let node = self
                .expand(leaf)
                .expect("select() never returns a non-terminal fully expanded node");
            let outcome =
                rollout::evaluate::<A, S>(&self.arena[node].state, self.arena[node].maximizing_player);
            self.back_propagate(node, outcome);
            iterations += 1;
        }
        iterations
    }

    /// Re-roots the tree onto the child whose `last_action` equals
    /// `action`. If no explored child matches (the opponent played a move
    /// the search never considered), builds a fresh one-node subtree
    /// instead and logs an informational notice — this is not an error.
    pub fn advance(&mut self, action: &A) {
        let matched = self.arena[self.root]
            .children
            .iter()
            .find(|&&child| self.arena[child].last_action == *action)
            .copied();

        let new_root = match matched {
            Some(child) => child,
            None => {
                info!(
                    action = %action,
                    "opponent action not found among explored children, starting a fresh subtree"
                );
                let state = self.arena[self.root].state.next_state(action);
                let maximizing_player = self.arena[self.root].maximizing_player;
                self.arena.push(Node::new(None, state, action.clone(), maximizing_player));
                self.arena.len() - 1
            }
        };

        self.compact(new_root);
    }

    /// Rebuilds the arena containing only nodes reachable from
    /// `new_root_old_index`, remapping every parent/child index. This is
    /// what reclaims the discarded subtrees: a `Vec`-indexed arena cannot
    /// simply drop an interior range without leaving dangling indices.
    fn compact(&mut self, new_root_old_index: usize) {
        let mut mapping: HashMap<usize, usize> = HashMap::new();
        let mut order = Vec::new();
        let mut frontier = vec![new_root_old_index];
        while let Some(old_index) = frontier.pop() {
            if mapping.contains_key(&old_index) {
                continue;
            }
            mapping.insert(old_index, order.len());
            order.push(old_index);
            frontier.extend(self.arena[old_index].children.iter().copied());
        }

        let mut new_arena = Vec::with_capacity(order.len());
        for &old_index in &order {
            let mut node = self.arena[old_index].clone();
            node.parent = node.parent.and_then(|p| mapping.get(&p).copied());
            node.children = node.children.iter().map(|c| mapping[c]).collect();
            new_arena.push(node);
        }
        new_arena[0].parent = None;

        self.arena = new_arena;
        self.root = 0;
    }

    /// The root's best child by exploitation-only score (`c = 0`).
    pub fn best_action(&self) -> Result<A, MctsError> {
        let best = self.select_best_child(self.root, 0.0)?;
        Ok(self.arena[best].last_action.clone())
    }

    /// Emits visits, branching factor, win probability, and per-child win
    /// rate (sorted descending) for the current root.
    pub fn log_stats(&self) {
        let root = &self.arena[self.root];
        let win_prob = if root.visits > 0 {
            root.win_rate(root.maximizing_player)
        } else {
            0.0
        };
        info!(
            visits = root.visits,
            branching_factor = root.children.len(),
            win_prob = format!("{:.4}", win_prob),
            "tree stats"
        );

        let mut children = root.children.clone();
        children.sort_by_key(|&idx| Reverse(OrderedFloat(self.arena[idx].win_rate(root.maximizing_player))));
        for idx in children {
            let child = &self.arena[idx];
            debug!(
                action = %child.last_action,
                visits = child.visits,
                win_rate = format!("{:.4}", child.win_rate(root.maximizing_player)),
                "child stats"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    struct PlaceHolderAction(u32);

    impl fmt::Display for PlaceHolderAction {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl GameAction for PlaceHolderAction {
        fn empty() -> Self {
            PlaceHolderAction(0)
        }

        fn is_empty(&self) -> bool {
            self.0 == 0
        }
    }

    #[derive(Debug, Clone)]
    struct PlaceHolderState {
        depth: u32,
    }

    impl fmt::Display for PlaceHolderState {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "depth={}", self.depth)
        }
    }

    impl GameState<PlaceHolderAction> for PlaceHolderState {
        fn current_player(&self) -> Player {
            if self.depth % 2 == 0 {
                Player::One
            } else {
                Player::Two
            }
        }

        fn legal_actions(&self) -> Vec<PlaceHolderAction> {
            vec![PlaceHolderAction(1), PlaceHolderAction(2)]
        }

        fn next_state(&self, _action: &PlaceHolderAction) -> Self {
            PlaceHolderState { depth: self.depth + 1 }
        }

        fn is_terminal(&self) -> bool {
            self.depth >= 5
        }

        fn game_result(&self) -> crate::game::GameResult {
            if self.is_terminal() {
                crate::game::GameResult::Draw
            } else {
                crate::game::GameResult::NotFinished
            }
        }

        fn rollout(&self, _maximizing_player: Player) -> f64 {
            0.5
        }
    }

    fn fresh_tree() -> GameTree<PlaceHolderAction, PlaceHolderState> {
        GameTree::new(PlaceHolderState { depth: 0 }, Player::One)
    }

    /// Builds root -> [A(visits=4,score=3.0), B(visits=6,score=2.0)],
    /// root itself visits=10.
    fn tree_with_two_children() -> GameTree<PlaceHolderAction, PlaceHolderState> {
        let mut tree = fresh_tree();
        tree.arena[0].visits = 10;
        tree.arena[0].score = 5.0;
        tree.arena[0].untried_actions.clear();

        let a = Node::new(Some(0), PlaceHolderState { depth: 1 }, PlaceHolderAction(1), Player::One);
        tree.arena.push(a);
        tree.arena[1].visits = 4;
        tree.arena[1].score = 3.0;

        let b = Node::new(Some(0), PlaceHolderState { depth: 1 }, PlaceHolderAction(2), Player::One);
        tree.arena.push(b);
        tree.arena[2].visits = 6;
        tree.arena[2].score = 2.0;

        tree.arena[0].children = vec![1, 2];
        tree
    }

    #[test]
    fn uct_prefers_higher_win_rate_child() {
        let tree = tree_with_two_children();
        let uct_a = tree.uct(1, Player::One, EXPLORATION_C);
        let uct_b = tree.uct(2, Player::One, EXPLORATION_C);
        assert!(uct_a > uct_b);
        assert_eq!(format!("{:.3}", uct_a), "1.823");
        assert_eq!(format!("{:.3}", uct_b), "1.209");
    }

    #[test]
    fn uct_is_infinite_for_unvisited_child() {
        let mut tree = tree_with_two_children();
        tree.arena[1].visits = 0;
        tree.arena[1].score = 0.0;
        assert!(tree.uct(1, Player::One, EXPLORATION_C).is_infinite());
    }

    #[test]
    fn select_best_child_breaks_ties_by_first_max() {
        let mut tree = tree_with_two_children();
        // Make child B (index 2) tie with child A (index 1) exactly.
        tree.arena[2].visits = 4;
        tree.arena[2].score = 3.0;
        let best = tree.select_best_child(0, EXPLORATION_C).unwrap();
        assert_eq!(best, 1, "first maximal child must win ties, not the last");
    }

    #[test]
    fn select_best_child_fails_on_no_children() {
        let tree = fresh_tree();
        assert!(matches!(
            tree.select_best_child(0, EXPLORATION_C),
            Err(MctsError::NoChildren)
        ));
    }

    #[test]
    fn expand_consumes_untried_actions() {
        let mut tree = fresh_tree();
        assert_eq!(tree.arena[0].untried_actions.len(), 2);
        let first_child = tree.expand(0).unwrap();
        assert_eq!(tree.arena[0].untried_actions.len(), 1);
        assert_eq!(tree.arena[0].children, vec![first_child]);
        assert_eq!(tree.arena[first_child].last_action, PlaceHolderAction(1));

        let second_child = tree.expand(0).unwrap();
        assert_eq!(tree.arena[0].untried_actions.len(), 0);
        assert_eq!(tree.arena[0].children, vec![first_child, second_child]);
        assert!(matches!(tree.expand(0), Err(MctsError::CannotExpand)));
    }

    #[test]
    fn expand_on_terminal_node_reuses_same_node() {
        let mut tree = GameTree::new(PlaceHolderState { depth: 5 }, Player::One);
        assert!(tree.arena[0].terminal);
        assert_eq!(tree.expand(0).unwrap(), 0);
    }

    #[test]
    fn back_propagate_updates_every_ancestor() {
        let mut tree = tree_with_two_children();
        tree.back_propagate(1, 1.0);
        assert_eq!(tree.arena[1].visits, 5);
        assert_eq!(tree.arena[1].score, 4.0);
        assert_eq!(tree.arena[0].visits, 11);
        assert_eq!(tree.arena[0].score, 6.0);
        assert_eq!(tree.arena[2].visits, 6, "sibling must be untouched");
    }

    #[test]
    fn grow_with_zero_budget_leaves_tree_unchanged() {
        let mut tree = fresh_tree();
        assert_eq!(tree.grow(0, 0), 0);
        assert_eq!(tree.arena.len(), 1);
        assert_eq!(tree.arena[0].visits, 0);
    }

    #[test]
    fn grow_runs_bounded_iterations() {
        let mut tree = fresh_tree();
        assert_eq!(tree.grow(20, 5), 20);
        assert_eq!(tree.root_visits(), 20);
    }

    #[test]
    fn advance_promotes_matching_child_and_drops_siblings() {
        let mut tree = tree_with_two_children();
        tree.advance(&PlaceHolderAction(1));
        assert_eq!(tree.root, 0);
        assert_eq!(tree.arena.len(), 1);
        assert_eq!(tree.arena[0].visits, 4);
        assert!(tree.arena[0].parent.is_none());
    }

    #[test]
    fn advance_on_unseen_action_builds_fresh_subtree() {
        let mut tree = tree_with_two_children();
        tree.advance(&PlaceHolderAction(99));
        assert_eq!(tree.arena.len(), 1);
        assert_eq!(tree.arena[0].visits, 0);
        assert_eq!(tree.current_state().depth, 1);
    }
}

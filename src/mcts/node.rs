use std::collections::VecDeque;

use crate::game::{GameAction, GameState, Player};

/// One vertex of a `GameTree`'s arena. Holds the position, the MCTS
/// statistics accumulated at this vertex, and structural links into the
/// arena (`parent`/`children` are plain indices, not owning references —
/// the arena itself owns every node).
#[derive(Clone)]
pub struct Node<A, S>
where
    A: GameAction,
    S: GameState<A>,
{
    pub state: S,

    /// The action that produced `state` from the parent's state. The
    /// sentinel `A::empty()` at the root.
    pub last_action: A,

    /// Index of the parent in the arena. `None` only for the current root.
    pub parent: Option<usize>,

    /// Indices of already-expanded children, in expansion order.
    pub children: Vec<usize>,

    /// Legal actions from `state` not yet materialised as children,
    /// consumed from the front by `expand`.
    pub untried_actions: VecDeque<A>,

    /// Cached `state.is_terminal()`, computed once at construction.
    pub terminal: bool,

    /// Number of simulations that have passed through this node.
    pub visits: u32,

    /// Sum of rollout outcomes from `maximizing_player`'s viewpoint.
    pub score: f64,

    /// The player whose win probability this tree maximises. Identical for
    /// every node in a tree.
    pub maximizing_player: Player,
}

impl<A, S> Node<A, S>
where
    A: GameAction,
    S: GameState<A>,
{
    pub fn new(parent: Option<usize>, state: S, last_action: A, maximizing_player: Player) -> Self {
        let terminal = state.is_terminal();
        let untried_actions = if terminal {
            VecDeque::new()
        } else {
            state.legal_actions().into_iter().collect()
        };
        Node {
            state,
            last_action,
            parent,
            children: Vec::new(),
            untried_actions,
            terminal,
            visits: 0,
            score: 0.0,
            maximizing_player,
        }
    }

    /// `score / visits` from `for_player`'s perspective. Undefined (and
    /// panics) when `visits == 0`; callers must guard.
    pub fn win_rate(&self, for_player: Player) -> f64 {
        assert!(self.visits > 0, "win_rate called on an unvisited node");
        let rate = self.score / self.visits as f64;
        if for_player == self.maximizing_player {
            rate
        } else {
            1.0 - rate
        }
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.terminal || self.untried_actions.is_empty()
    }
}

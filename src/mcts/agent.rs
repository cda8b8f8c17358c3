use std::marker::PhantomData;
use std::time::Instant;

use tracing::debug;

use crate::error::MctsError;
use crate::game::{GameAction, GameState, Player};
use crate::rng;
use crate::search::AgentConfig;
use crate::tree::GameTree;

/// Per-move entrypoint shared by every agent implementation.
pub trait Agent<A, S>
where
    A: GameAction,
    S: GameState<A>,
{
    fn get_action(&mut self, current_state: &S, opponents_last_action: &A) -> Result<A, MctsError>;
}

/// The engine's own agent: re-roots its tree on the opponent's last move,
/// grows it under the configured budget, and picks the best child.
pub struct MonteCarloTreeSearchAgent<A, S>
where
    A: GameAction,
    S: GameState<A>,
{
    tree: GameTree<A, S>,
    config: AgentConfig,
}

impl<A, S> MonteCarloTreeSearchAgent<A, S>
where
    A: GameAction,
    S: GameState<A>,
{
    pub fn new(starting_state: S, maximizing_player: Player, config: AgentConfig) -> Self {
        MonteCarloTreeSearchAgent {
            tree: GameTree::new(starting_state, maximizing_player),
            config,
        }
    }
}

impl<A, S> Agent<A, S> for MonteCarloTreeSearchAgent<A, S>
where
    A: GameAction,
    S: GameState<A>,
{
    fn get_action(&mut self, current_state: &S, opponents_last_action: &A) -> Result<A, MctsError> {
        if !opponents_last_action.is_empty() {
            self.tree.advance(opponents_last_action);
        }

        if self.tree.current_state().is_terminal() {
            return Err(MctsError::TerminalState);
        }

        if self.config.debug {
            debug!(
                legal_actions = ?current_state
                    .legal_actions()
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>(),
                "agent entry"
            );
        }

        let start = Instant::now();
        let iterations = self.tree.grow(self.config.max_iterations, self.config.max_seconds);

        if self.config.debug {
            debug!(iterations, elapsed_ms = start.elapsed().as_millis(), "search budget spent");
            self.tree.log_stats();
        }

        let best = self.tree.best_action()?;
        self.tree.advance(&best);

        if self.config.debug {
            debug!(action = %best, "selected action");
        }

        Ok(best)
    }
}

/// Uniform-random baseline used as the opponent in end-to-end tests. Shares
/// only the `get_action` shape with the MCTS agent — it keeps no tree.
pub struct RandomAgent<A, S> {
    _action: PhantomData<A>,
    _state: PhantomData<S>,
}

impl<A, S> RandomAgent<A, S> {
    pub fn new() -> Self {
        RandomAgent {
            _action: PhantomData,
            _state: PhantomData,
        }
    }
}

impl<A, S> Default for RandomAgent<A, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, S> Agent<A, S> for RandomAgent<A, S>
where
    A: GameAction,
    S: GameState<A>,
{
    fn get_action(&mut self, current_state: &S, _opponents_last_action: &A) -> Result<A, MctsError> {
        if current_state.is_terminal() {
            return Err(MctsError::TerminalState);
        }
        let legal_actions = current_state.legal_actions();
        if legal_actions.is_empty() {
            return Err(MctsError::NoLegalActions);
        }
        Ok(rng::choose(&legal_actions).clone())
    }
}

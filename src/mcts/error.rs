use thiserror::Error;

/// Failure modes surfaced by the engine. None of these are retried or
/// recovered from internally; they propagate out of `Agent::get_action`.
#[derive(Error, Debug)]
pub enum MctsError {
    /// An action inconsistent with the current state was applied.
    #[error("illegal action: {0}")]
    IllegalAction(String),

    /// A random-action request hit a state with no legal moves.
    #[error("no legal actions available")]
    NoLegalActions,

    /// `select_best_child` was called on a node with no children.
    #[error("node has no children to select from")]
    NoChildren,

    /// `expand` was called on a non-terminal, fully expanded node.
    #[error("cannot expand a non-terminal, fully expanded node")]
    CannotExpand,

    /// `get_action` was invoked on an already-terminal state.
    #[error("current state is already terminal")]
    TerminalState,
}

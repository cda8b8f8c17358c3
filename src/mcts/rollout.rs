//! Thin delegation seam between `GameTree` and the game model's own rollout
//! policy. Kept as a free function, not a `GameTree` method, so a future
//! learned rollout policy has an obvious place to plug in without touching
//! tree traversal code.

use crate::game::{GameAction, GameState, Player};

/// Uniform-random playout of `state` to termination, scored from
/// `maximizing_player`'s perspective. If `state` is already terminal,
/// the game model returns its existing result without further moves.
pub fn evaluate<A, S>(state: &S, maximizing_player: Player) -> f64
where
    A: GameAction,
    S: GameState<A>,
{
    state.rollout(maximizing_player)
}

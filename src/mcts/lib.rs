//! # Monte Carlo Tree Search (MCTS)
//!
//! A generic MCTS engine for two-player, perfect-information, deterministic,
//! turn-based games with a finite branching factor.
//!
//! MCTS proceeds in four phases, repeated until a search budget runs out:
//! - **Select**: descend the tree choosing the child with maximum UCT at
//!   each fully-expanded node.
//! - **Expand**: materialise one untried action of the selected leaf as a
//!   new child.
//! - **Simulate**: play a uniform-random rollout from the new child to a
//!   terminal state.
//! - **Back-propagate**: walk back to the root, updating visit counts and
//!   scores along the way.
//!
//! The engine is parameterised over a caller-supplied `GameAction` /
//! `GameState` pair (`game`); it does not know about any particular game.
//! Concrete models live under `games` purely as fixtures for tests and demo
//! binaries.

pub mod agent;
pub mod error;
pub mod game;
pub mod games;
pub mod node;
pub mod rng;
pub mod rollout;
pub mod search;
pub mod tree;

//! Concrete game models. These exist to exercise and demonstrate the engine
//! — the engine itself depends only on the `GameAction`/`GameState` traits
//! in `crate::game`.

pub mod connect_four;
pub mod tic_tac_toe;
pub mod ultimate_tic_tac_toe;

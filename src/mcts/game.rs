use std::fmt::Display;

/// Which side is to move. Exactly two identities; the engine never assumes
/// which one moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The other player.
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// Outcome of a game. `NotFinished` is exclusive with the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Player1Won,
    Player2Won,
    Draw,
    NotFinished,
}

/// A legal move in some game. Actions are value types: cheap to copy around,
/// equality-comparable, and carry an empty sentinel used to mark "no prior
/// action yet" at the root of a tree.
pub trait GameAction: Clone + PartialEq + Display {
    /// The sentinel value meaning "no action". Never a legal move.
    fn empty() -> Self;

    /// True for the sentinel produced by `empty()`.
    fn is_empty(&self) -> bool;
}

/// A full game position. Every method here must be free of observable side
/// effects on `&self` unless documented otherwise.
pub trait GameState<A: GameAction>: Clone + Display {
    /// The side to move in this position.
    fn current_player(&self) -> Player;

    /// All legal actions from this position, in a stable order — the order
    /// in which the tree's `untried_actions` are consumed, and the order
    /// `select_best_child` breaks ties by.
    fn legal_actions(&self) -> Vec<A>;

    /// The position reached by playing `action`. Must not mutate `self`.
    fn next_state(&self, action: &A) -> Self;

    /// True iff no further actions are possible from this position.
    fn is_terminal(&self) -> bool;

    /// The current result. `NotFinished` iff `!self.is_terminal()`.
    fn game_result(&self) -> GameResult;

    /// Uniform-random playout to termination, scored from
    /// `maximizing_player`'s perspective: 1.0 win, 0.5 draw, 0.0 loss. If
    /// `self` is already terminal, returns the existing result without
    /// making further moves.
    fn rollout(&self, maximizing_player: Player) -> f64;
}

/// Maps a finished `GameResult` to {0, 0.5, 1} from `maximizing_player`'s
/// perspective. Shared by every concrete game's `rollout` implementation.
pub fn score_for(result: GameResult, maximizing_player: Player) -> f64 {
    match result {
        GameResult::Draw => 0.5,
        GameResult::NotFinished => panic!("score_for called on a not-finished result"),
        GameResult::Player1Won => {
            if maximizing_player == Player::One {
                1.0
            } else {
                0.0
            }
        }
        GameResult::Player2Won => {
            if maximizing_player == Player::Two {
                1.0
            } else {
                0.0
            }
        }
    }
}

use std::fmt;

use crate::game::{score_for, GameAction, GameResult, GameState, Player};
use crate::rng;

fn marker(player: Player) -> char {
    match player {
        Player::One => 'O',
        Player::Two => 'X',
    }
}

/// A move on a 3x3 board. The empty sentinel uses an out-of-range `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToeAction {
    pub row: u8,
    pub col: u8,
    pub player: Player,
}

impl fmt::Display for TicTacToeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@({},{})", marker(self.player), self.row, self.col)
    }
}

impl GameAction for TicTacToeAction {
    fn empty() -> Self {
        TicTacToeAction {
            row: u8::MAX,
            col: u8::MAX,
            player: Player::One,
        }
    }

    fn is_empty(&self) -> bool {
        self.row == u8::MAX && self.col == u8::MAX
    }
}

/// Plain 3x3 Tic-Tac-Toe, the base case both Connect Four and Ultimate
/// Tic-Tac-Toe build on.
#[derive(Debug, Clone)]
pub struct TicTacToeState {
    board: [[char; 3]; 3],
    current_player: Player,
    last_action: TicTacToeAction,
    result: GameResult,
}

impl TicTacToeState {
    pub fn new(starting_player: Player) -> Self {
        TicTacToeState {
            board: [['.'; 3]; 3],
            current_player: starting_player,
            last_action: TicTacToeAction::empty(),
            result: GameResult::NotFinished,
        }
    }

    fn is_full(&self) -> bool {
        self.board.iter().flatten().all(|&cell| cell != '.')
    }

    fn calculate_result(&self) -> GameResult {
        let lines: [[(usize, usize); 3]; 8] = [
            [(0, 0), (0, 1), (0, 2)],
            [(1, 0), (1, 1), (1, 2)],
            [(2, 0), (2, 1), (2, 2)],
            [(0, 0), (1, 0), (2, 0)],
            [(0, 1), (1, 1), (2, 1)],
            [(0, 2), (1, 2), (2, 2)],
            [(0, 0), (1, 1), (2, 2)],
            [(0, 2), (1, 1), (2, 0)],
        ];
        for line in lines {
            let [a, b, c] = line;
            let marker_a = self.board[a.0][a.1];
            if marker_a != '.' && marker_a == self.board[b.0][b.1] && marker_a == self.board[c.0][c.1] {
                return if marker_a == marker(Player::One) {
                    GameResult::Player1Won
                } else {
                    GameResult::Player2Won
                };
            }
        }
        if self.is_full() {
            GameResult::Draw
        } else {
            GameResult::NotFinished
        }
    }
}

impl fmt::Display for TicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.board.iter().rev() {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl GameState<TicTacToeAction> for TicTacToeState {
    fn current_player(&self) -> Player {
        self.current_player
    }

    fn legal_actions(&self) -> Vec<TicTacToeAction> {
        let mut actions = Vec::with_capacity(9);
        for row in 0..3 {
            for col in 0..3 {
                if self.board[row][col] == '.' {
                    actions.push(TicTacToeAction {
                        row: row as u8,
                        col: col as u8,
                        player: self.current_player,
                    });
                }
            }
        }
        actions
    }

    fn next_state(&self, action: &TicTacToeAction) -> Self {
        let mut next = self.clone();
        next.board[action.row as usize][action.col as usize] = marker(action.player);
        next.last_action = *action;
        next.result = next.calculate_result();
        next.current_player = action.player.opponent();
        next
    }

    fn is_terminal(&self) -> bool {
        self.result != GameResult::NotFinished
    }

    fn game_result(&self) -> GameResult {
        self.result
    }

    fn rollout(&self, maximizing_player: Player) -> f64 {
        if self.is_terminal() {
            return score_for(self.result, maximizing_player);
        }
        let mut state = self.clone();
        loop {
            let actions = state.legal_actions();
            let action = *rng::choose(&actions);
            state = state.next_state(&action);
            if state.is_terminal() {
                break;
            }
        }
        score_for(state.result, maximizing_player)
    }
}

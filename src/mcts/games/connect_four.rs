use std::fmt;

use crate::game::{score_for, GameAction, GameResult, GameState, Player};
use crate::rng;

const WIDTH: usize = 7;
const HEIGHT: usize = 6;

fn marker(player: Player) -> char {
    match player {
        Player::One => 'O',
        Player::Two => 'X',
    }
}

/// Drop a disc into `col`. The empty sentinel uses an out-of-range column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectFourAction {
    pub col: u8,
    pub player: Player,
}

impl fmt::Display for ConnectFourAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@col{}", marker(self.player), self.col)
    }
}

impl GameAction for ConnectFourAction {
    fn empty() -> Self {
        ConnectFourAction {
            col: u8::MAX,
            player: Player::One,
        }
    }

    fn is_empty(&self) -> bool {
        self.col == u8::MAX
    }
}

#[derive(Debug, Clone)]
pub struct ConnectFourState {
    board: [[char; WIDTH]; HEIGHT],
    col_heights: [u8; WIDTH],
    current_player: Player,
    last_action: ConnectFourAction,
    result: GameResult,
}

impl ConnectFourState {
    pub fn new(starting_player: Player) -> Self {
        ConnectFourState {
            board: [['.'; WIDTH]; HEIGHT],
            col_heights: [0; WIDTH],
            current_player: starting_player,
            last_action: ConnectFourAction::empty(),
            result: GameResult::NotFinished,
        }
    }

    fn is_full(&self) -> bool {
        self.col_heights.iter().all(|&h| h as usize >= HEIGHT)
    }

    /// Counts consecutive `marker` cells from `(row, col)` along
    /// `(row_step, col_step)` and its reverse, including the origin cell.
    fn count_line(&self, row: usize, col: usize, marker: char, row_step: i32, col_step: i32) -> u32 {
        let mut count = 1;
        count += self.walk(row, col, marker, row_step, col_step);
        count += self.walk(row, col, marker, -row_step, -col_step);
        count
    }

    fn walk(&self, row: usize, col: usize, marker: char, row_step: i32, col_step: i32) -> u32 {
        let mut count = 0;
        let mut r = row as i32 + row_step;
        let mut c = col as i32 + col_step;
        while r >= 0 && r < HEIGHT as i32 && c >= 0 && c < WIDTH as i32 {
            if self.board[r as usize][c as usize] != marker {
                break;
            }
            count += 1;
            r += row_step;
            c += col_step;
        }
        count
    }

    /// Checks for a 4-in-a-row through the piece most recently placed at
    /// `(row, col)`, rather than scanning the whole board.
    fn calculate_result(&self, row: usize, col: usize) -> GameResult {
        if self.last_action.is_empty() {
            return GameResult::NotFinished;
        }
        if self.is_full() {
            return GameResult::Draw;
        }

        let disc = self.board[row][col];
        let directions = [(0, 1), (1, 0), (1, 1), (1, -1)];
        for (row_step, col_step) in directions {
            if self.count_line(row, col, disc, row_step, col_step) >= 4 {
                return if disc == marker(Player::One) {
                    GameResult::Player1Won
                } else {
                    GameResult::Player2Won
                };
            }
        }
        GameResult::NotFinished
    }
}

impl fmt::Display for ConnectFourState {
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

impl GameState<ConnectFourAction> for ConnectFourState {
    fn current_player(&self) -> Player {
        self.current_player
    }

    fn legal_actions(&self) -> Vec<ConnectFourAction> {
        (0..WIDTH)
            .filter(|&col| (self.col_heights[col] as usize) < HEIGHT)
            .map(|col| ConnectFourAction {
                col: col as u8,
                player: self.current_player,
            })
            .collect()
    }

    fn next_state(&self, action: &ConnectFourAction) -> Self {
        let mut next = self.clone();
        let col = action.col as usize;
        let row = next.col_heights[col] as usize;
        next.board[row][col] = marker(action.player);
        next.col_heights[col] += 1;
        next.last_action = *action;
        next.result = next.calculate_result(row, col);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_actions_drop_a_column_once_full() {
        let mut state = ConnectFourState::new(Player::One);
        for _ in 0..HEIGHT {
            state = state.next_state(&ConnectFourAction { col: 0, player: state.current_player });
        }
        assert!(!state.legal_actions().iter().any(|a| a.col == 0));
    }

    #[test]
    fn detects_a_horizontal_win() {
        let mut state = ConnectFourState::new(Player::One);
        // O plays columns 0..3 on row 0, X plays column 0..2 on row 1 in between.
        let plays = [
            (0, Player::One),
            (0, Player::Two),
            (1, Player::One),
            (1, Player::Two),
            (2, Player::One),
            (2, Player::Two),
            (3, Player::One),
        ];
        for (col, player) in plays {
            state = state.next_state(&ConnectFourAction { col, player });
        }
        assert_eq!(state.game_result(), GameResult::Player1Won);
    }

    #[test]
    fn detects_a_vertical_win() {
        let mut state = ConnectFourState::new(Player::One);
        let plays = [
            (0, Player::One),
            (1, Player::Two),
            (0, Player::One),
            (1, Player::Two),
            (0, Player::One),
            (1, Player::Two),
            (0, Player::One),
        ];
        for (col, player) in plays {
            state = state.next_state(&ConnectFourAction { col, player });
        }
        assert_eq!(state.game_result(), GameResult::Player1Won);
    }
}

use std::fmt;

use crate::game::{score_for, GameAction, GameResult, GameState, Player};
use crate::rng;

fn marker(player: Player) -> char {
    match player {
        Player::One => 'O',
        Player::Two => 'X',
    }
}

/// A move: which 3x3 sub-grid (`big_row`, `big_col`) and which cell within
/// it (`small_row`, `small_col`). The empty sentinel uses out-of-range
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UltimateTicTacToeAction {
    pub big_row: u8,
    pub big_col: u8,
    pub small_row: u8,
    pub small_col: u8,
    pub player: Player,
}

impl fmt::Display for UltimateTicTacToeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@grid({},{})cell({},{})",
            marker(self.player),
            self.big_row,
            self.big_col,
            self.small_row,
            self.small_col
        )
    }
}

impl GameAction for UltimateTicTacToeAction {
    fn empty() -> Self {
        UltimateTicTacToeAction {
            big_row: u8::MAX,
            big_col: u8::MAX,
            small_row: u8::MAX,
            small_col: u8::MAX,
            player: Player::One,
        }
    }

    fn is_empty(&self) -> bool {
        self.big_row == u8::MAX
    }
}

/// One playable 3x3 sub-grid, or the synthetic master grid of sub-grid
/// outcomes (where a drawn sub-grid occupies a cell but wins no line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Owned(Player),
    Drawn,
}

#[derive(Debug, Clone, Copy)]
struct Grid {
    cells: [[Cell; 3]; 3],
    result: GameResult,
}

const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

impl Grid {
    fn new() -> Self {
        Grid {
            cells: [[Cell::Empty; 3]; 3],
            result: GameResult::NotFinished,
        }
    }

    fn is_decided(&self) -> bool {
        self.result != GameResult::NotFinished
    }

    fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|&c| c != Cell::Empty)
    }

    fn place(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
        self.result = self.calculate_result();
    }

    fn calculate_result(&self) -> GameResult {
        for line in LINES {
            let [a, b, c] = line;
            if let Cell::Owned(player) = self.cells[a.0][a.1] {
                if self.cells[b.0][b.1] == Cell::Owned(player) && self.cells[c.0][c.1] == Cell::Owned(player) {
                    return match player {
                        Player::One => GameResult::Player1Won,
                        Player::Two => GameResult::Player2Won,
                    };
                }
            }
        }
        if self.is_full() {
            GameResult::Draw
        } else {
            GameResult::NotFinished
        }
    }
}

#[derive(Debug, Clone)]
pub struct UltimateTicTacToeState {
    small_grids: [[Grid; 3]; 3],
    master: Grid,
    current_player: Player,
    last_action: UltimateTicTacToeAction,
}

impl UltimateTicTacToeState {
    pub fn new(starting_player: Player) -> Self {
        UltimateTicTacToeState {
            small_grids: [[Grid::new(); 3]; 3],
            master: Grid::new(),
            current_player: starting_player,
            last_action: UltimateTicTacToeAction::empty(),
        }
    }

    /// Which sub-grids may legally receive the next move: the one indicated
    /// by the last move's cell, unless it is already decided, in which case
    /// any undecided sub-grid is fair game.
    fn eligible_grids(&self) -> Vec<(usize, usize)> {
        if !self.last_action.is_empty() {
            let (row, col) = (self.last_action.small_row as usize, self.last_action.small_col as usize);
            if !self.small_grids[row][col].is_decided() {
                return vec![(row, col)];
            }
        }
        let mut grids = Vec::with_capacity(9);
        for row in 0..3 {
            for col in 0..3 {
                if !self.small_grids[row][col].is_decided() {
                    grids.push((row, col));
                }
            }
        }
        grids
    }
}

impl fmt::Display for UltimateTicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for big_row in (0..3).rev() {
            for small_row in (0..3).rev() {
                for big_col in 0..3 {
                    for small_col in 0..3 {
                        let c = match self.small_grids[big_row][big_col].cells[small_row][small_col] {
                            Cell::Empty => '.',
                            Cell::Owned(p) => marker(p),
                            Cell::Drawn => '~',
                        };
                        write!(f, "{}", c)?;
                    }
                    write!(f, " ")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl GameState<UltimateTicTacToeAction> for UltimateTicTacToeState {
    fn current_player(&self) -> Player {
        self.current_player
    }

    fn legal_actions(&self) -> Vec<UltimateTicTacToeAction> {
        let mut actions = Vec::with_capacity(9);
        for (big_row, big_col) in self.eligible_grids() {
            let grid = &self.small_grids[big_row][big_col];
            for small_row in 0..3 {
                for small_col in 0..3 {
                    if grid.cells[small_row][small_col] == Cell::Empty {
                        actions.push(UltimateTicTacToeAction {
                            big_row: big_row as u8,
                            big_col: big_col as u8,
                            small_row: small_row as u8,
                            small_col: small_col as u8,
                            player: self.current_player,
                        });
                    }
                }
            }
        }
        actions
    }

    fn next_state(&self, action: &UltimateTicTacToeAction) -> Self {
        let mut next = self.clone();
        let (big_row, big_col) = (action.big_row as usize, action.big_col as usize);
        let (small_row, small_col) = (action.small_row as usize, action.small_col as usize);

        let grid = &mut next.small_grids[big_row][big_col];
        let was_decided = grid.is_decided();
        grid.place(small_row, small_col, Cell::Owned(action.player));

        if !was_decided && grid.is_decided() {
            let master_cell = match grid.result {
                GameResult::Player1Won => Cell::Owned(Player::One),
                GameResult::Player2Won => Cell::Owned(Player::Two),
                GameResult::Draw => Cell::Drawn,
                GameResult::NotFinished => unreachable!("grid.is_decided() guards this"),
            };
            next.master.place(big_row, big_col, master_cell);
        }

        next.last_action = *action;
        next.current_player = action.player.opponent();
        next
    }

    fn is_terminal(&self) -> bool {
        self.master.is_decided()
    }

    fn game_result(&self) -> GameResult {
        self.master.result
    }

    fn rollout(&self, maximizing_player: Player) -> f64 {
        if self.is_terminal() {
            return score_for(self.game_result(), maximizing_player);
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
        score_for(state.game_result(), maximizing_player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(state: &UltimateTicTacToeState, big: (u8, u8), small: (u8, u8), player: Player) -> UltimateTicTacToeState {
        state.next_state(&UltimateTicTacToeAction {
            big_row: big.0,
            big_col: big.1,
            small_row: small.0,
            small_col: small.1,
            player,
        })
    }

    #[test]
    fn first_move_is_free_everywhere() {
        let state = UltimateTicTacToeState::new(Player::One);
        assert_eq!(state.legal_actions().len(), 81);
    }

    #[test]
    fn send_rule_restricts_to_the_indicated_sub_grid() {
        let state = UltimateTicTacToeState::new(Player::One);
        let next = play(&state, (1, 1), (0, 2), Player::One);
        // Playing cell (0,2) of sub-grid (1,1) sends the opponent to sub-grid (0,2).
        let actions = next.legal_actions();
        assert!(actions.iter().all(|a| (a.big_row, a.big_col) == (0, 2)));
        assert_eq!(actions.len(), 9);
    }

    #[test]
    fn free_move_when_sent_to_a_decided_grid() {
        // Win sub-grid (2,2) via its diagonal, with the deciding move played
        // in cell (2,2) — so the send rule would point back at (2,2), which
        // is now decided, forcing a free choice among the other 8 grids.
        let mut state = UltimateTicTacToeState::new(Player::One);
        state = play(&state, (2, 2), (0, 0), Player::One);
        state = play(&state, (2, 2), (1, 1), Player::One);
        state = play(&state, (2, 2), (2, 2), Player::One);
        assert_eq!(state.small_grids[2][2].result, GameResult::Player1Won);

        let actions = state.legal_actions();
        assert!(actions.iter().all(|a| (a.big_row, a.big_col) != (2, 2)));
        assert_eq!(actions.len(), 72);
    }

    #[test]
    fn master_grid_win_ends_the_game() {
        // next_state does not itself enforce the send rule (legal_actions
        // does), so sub-grids can be decided directly in whichever order a
        // test needs. Win sub-grids (0,0), (1,1), (2,2) on the diagonal for
        // Player::One, interleaving harmless Player::Two moves in each.
        let mut state = UltimateTicTacToeState::new(Player::One);
        for &(big_row, big_col) in &[(0u8, 0u8), (1, 1), (2, 2)] {
            state = play(&state, (big_row, big_col), (0, 0), Player::One);
            state = play(&state, (big_row, big_col), (0, 1), Player::Two);
            state = play(&state, (big_row, big_col), (1, 1), Player::One);
            state = play(&state, (big_row, big_col), (0, 2), Player::Two);
            state = play(&state, (big_row, big_col), (2, 2), Player::One);
            assert_eq!(
                state.small_grids[big_row as usize][big_col as usize].result,
                GameResult::Player1Won
            );
        }
        assert_eq!(state.game_result(), GameResult::Player1Won);
        assert!(state.is_terminal());
    }
}

#[path = "common.rs"]
mod common;

use clap::Parser;
use mimalloc::MiMalloc;

use mcts::agent::{Agent, MonteCarloTreeSearchAgent, RandomAgent};
use mcts::game::{GameAction, GameState, Player};
use mcts::games::tic_tac_toe::TicTacToeState;
use mcts::rng;
use mcts::search::AgentConfig;

use common::{init_tracing, CliArgs, Opponent, Tally};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() {
    let args = CliArgs::parse();
    init_tracing();
    rng::reseed(args.seed);

    let config = AgentConfig {
        max_iterations: args.max_iterations,
        max_seconds: args.max_seconds,
        debug: args.debug,
    };

    let mut tally = Tally::default();

    for game in 0..args.games {
        tracing::info!(game, "starting game");
        let mut state = TicTacToeState::new(Player::One);
        let mut one = MonteCarloTreeSearchAgent::new(state.clone(), Player::One, config);

        let result = match args.opponent {
            Opponent::Mcts => {
                let mut two = MonteCarloTreeSearchAgent::new(state.clone(), Player::Two, config);
                play_match(&mut state, &mut one, &mut two)
            }
            Opponent::Random => {
                let mut two = RandomAgent::new();
                play_match(&mut state, &mut one, &mut two)
            }
        };

        match result {
            mcts::game::GameResult::Player1Won => tally.player_one_wins += 1,
            mcts::game::GameResult::Player2Won => tally.player_two_wins += 1,
            mcts::game::GameResult::Draw => tally.draws += 1,
            mcts::game::GameResult::NotFinished => unreachable!("play_match always reaches a terminal state"),
        }
    }

    tally.print_summary(args.games);
}

fn play_match(
    state: &mut TicTacToeState,
    one: &mut impl Agent<mcts::games::tic_tac_toe::TicTacToeAction, TicTacToeState>,
    two: &mut impl Agent<mcts::games::tic_tac_toe::TicTacToeAction, TicTacToeState>,
) -> mcts::game::GameResult {
    let mut last_action = mcts::games::tic_tac_toe::TicTacToeAction::empty();
    loop {
        let action = match state.current_player() {
            Player::One => one.get_action(state, &last_action).expect("player one move"),
            Player::Two => two.get_action(state, &last_action).expect("player two move"),
        };
        *state = state.next_state(&action);
        last_action = action;
        if state.is_terminal() {
            return state.game_result();
        }
    }
}

use clap::{Parser, ValueEnum};

/// Shared CLI surface for the match-runner demo binaries. Not part of the
/// engine's public contract — the library itself never parses argv.
#[derive(Parser, Debug)]
pub struct CliArgs {
    /// Seed for the process-wide RNG.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of games to play.
    #[arg(long, default_value_t = 10)]
    pub games: u32,

    /// Hard cap on MCTS iterations per move.
    #[arg(long, default_value_t = 100_000)]
    pub max_iterations: u32,

    /// Soft cap on MCTS wall-clock seconds per move.
    #[arg(long, default_value_t = 1)]
    pub max_seconds: u64,

    /// What Player::Two plays as.
    #[arg(long, value_enum, default_value_t = Opponent::Random)]
    pub opponent: Opponent,

    /// Emit per-move tree stats via tracing.
    #[arg(long)]
    pub debug: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Opponent {
    Mcts,
    Random,
}

pub fn init_tracing() {
    tracing_subscriber::fmt().with_target(false).init();
}

/// Tally of completed games from Player::One's perspective.
#[derive(Debug, Default)]
pub struct Tally {
    pub player_one_wins: u32,
    pub player_two_wins: u32,
    pub draws: u32,
}

impl Tally {
    pub fn print_summary(&self, games: u32) {
        println!(
            "{} games: player one won {} ({:.1}%), player two won {} ({:.1}%), drew {} ({:.1}%)",
            games,
            self.player_one_wins,
            100.0 * self.player_one_wins as f64 / games as f64,
            self.player_two_wins,
            100.0 * self.player_two_wins as f64 / games as f64,
            self.draws,
            100.0 * self.draws as f64 / games as f64,
        );
    }
}

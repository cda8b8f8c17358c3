/// Options recognised at agent construction. Mirrors the `MAX_ITER` /
/// `MAX_SECONDS` / `DEBUG` constants used by the reference drivers.
#[derive(Debug, Clone, Copy)]
pub struct AgentConfig {
    /// Hard cap on iterations per `get_action` call.
    pub max_iterations: u32,

    /// Soft cap on wall-clock seconds per `get_action` call.
    pub max_seconds: u64,

    /// When true, the agent logs legal actions, iteration/timing stats,
    /// and tree stats at `tracing::debug!` level on every move.
    pub debug: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            max_iterations: 100_000,
            max_seconds: 5,
            debug: false,
        }
    }
}

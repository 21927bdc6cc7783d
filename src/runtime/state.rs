//! Step state recorded by the restore half of the action
//!
//! The runner replays values a previous step saved with `save-state` as
//! `STATE_*` environment variables. The save step only reads state; writing
//! it is the runner's job.

/// Primary cache key computed at restore time
pub const CACHE_KEY: &str = "CACHE_KEY";

/// Key the restore step actually matched, if any
pub const CACHE_RESULT: &str = "CACHE_RESULT";

/// Read a state value, empty when nothing was recorded
pub fn get_state(name: &str) -> String {
    std::env::var(format!("STATE_{}", name)).unwrap_or_default()
}

use clap::{Parser, Subcommand};

/// Lager - cache persistence for GitHub Actions workflows
///
/// Lager runs as the post-job step of a cache action and decides whether the
/// restored workspace should be saved back to the cache service.
#[derive(Parser, Debug)]
#[command(name = "lager")]
#[command(author = "Tuist Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cache persistence step for GitHub Actions workflows", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save workspace paths to the cache service (post-job step)
    Save(SaveArgs),

    /// Check the runner environment and cache service configuration
    Doctor(DoctorArgs),
}

#[derive(Parser, Debug)]
pub struct SaveArgs {
    /// Cache service endpoint (provided by the runner)
    #[arg(long, env = "ACTIONS_CACHE_URL")]
    pub cache_url: Option<String>,

    /// Cache service auth token (provided by the runner)
    #[arg(long, env = "ACTIONS_RUNTIME_TOKEN", hide_env_values = true)]
    pub runtime_token: Option<String>,
}

#[derive(Parser, Debug)]
pub struct DoctorArgs {
    /// Show detailed environment information
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

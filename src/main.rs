mod cache;
mod cli;
mod commands;
mod logging;
mod runtime;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging
    logging::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Save(args) => commands::save::run(&args).await,
        Commands::Doctor(args) => commands::doctor::run(args),
    }
}

use anyhow::Result;
use std::env;

use crate::cache::ActionsCacheClient;
use crate::cli::DoctorArgs;
use crate::runtime::{env as runner, state};

pub fn run(args: DoctorArgs) -> Result<()> {
    println!("🔍 Lager Doctor - Runner Environment Check\n");

    let mut all_ok = true;

    // Check 1: are we a step in a workflow run at all
    if env::var("GITHUB_ACTIONS").map(|v| v == "true").unwrap_or(false) {
        println!("✅ Running under GitHub Actions");
        if args.verbose {
            println!("   Version: {}", env!("CARGO_PKG_VERSION"));
        }
    } else {
        println!("❌ Not running under GitHub Actions (GITHUB_ACTIONS not set)");
        all_ok = false;
    }

    // Check 2: server flavor
    let server_url = runner::server_url();
    if runner::is_ghes() {
        println!("❌ GitHub Enterprise Server detected: {}", server_url);
        println!("   The hosted cache service is not available on GHES");
        all_ok = false;
    } else {
        println!("✅ Server supports the cache service: {}", server_url);
    }

    // Check 3: event / ref
    if runner::is_valid_event() {
        println!(
            "✅ Event is tied to a ref: {}",
            env::var("GITHUB_REF").unwrap_or_default()
        );
    } else {
        let event = runner::event_name();
        if event.is_empty() {
            println!("❌ GITHUB_REF not set; caches cannot be scoped to a ref");
        } else {
            println!("❌ Event type {} is not tied to a branch or tag ref", event);
        }
        all_ok = false;
    }

    // Check 4: cache service credentials
    if ActionsCacheClient::is_available() {
        println!("✅ Cache service credentials present");
        if args.verbose {
            println!(
                "   Endpoint: {}",
                env::var("ACTIONS_CACHE_URL").unwrap_or_default()
            );
        }
    } else {
        println!(
            "❌ Cache service credentials missing (ACTIONS_CACHE_URL / ACTIONS_RUNTIME_TOKEN)"
        );
        all_ok = false;
    }

    // Check 5: state recorded by the restore step
    let primary_key = state::get_state(state::CACHE_KEY);
    if primary_key.is_empty() {
        println!("ℹ️  No primary key recorded in state yet");
        println!("   (The restore step records it; the post step cannot save without it)");
    } else {
        println!("✅ Primary key recorded: {}", primary_key);
        if args.verbose {
            let restored_key = state::get_state(state::CACHE_RESULT);
            if restored_key.is_empty() {
                println!("   Restore result: miss");
            } else {
                println!("   Restore result: {}", restored_key);
            }
        }
    }

    // Check 6: workspace
    match env::var("GITHUB_WORKSPACE") {
        Ok(workspace) if !workspace.is_empty() => {
            println!("✅ Workspace: {}", workspace);
        }
        _ => {
            println!("⚠️  GITHUB_WORKSPACE not set; paths resolve against the current directory");
        }
    }

    // Environment dump (token value deliberately excluded)
    if args.verbose {
        println!("\n📋 Environment Variables:");
        let env_vars = [
            "GITHUB_SERVER_URL",
            "GITHUB_EVENT_NAME",
            "GITHUB_REF",
            "GITHUB_WORKSPACE",
            "ACTIONS_CACHE_URL",
        ];

        let mut any_set = false;
        for var in &env_vars {
            if let Ok(value) = env::var(var) {
                println!("   {} = {}", var, value);
                any_set = true;
            }
        }

        if !any_set {
            println!("   (None set - not running inside a workflow step)");
        }
    }

    // Summary
    println!();
    if all_ok {
        println!("✅ All checks passed! The save step can reach the cache service.");
    } else {
        println!("⚠️  Some issues detected. Please fix the items marked with ❌ above.");
        std::process::exit(1);
    }

    Ok(())
}

//! GitHub Actions runner surface
//!
//! Everything a step can read from the runner: the workflow environment,
//! action inputs, state recorded by earlier steps, and the stdout command
//! channel back to the runner.

pub mod command;
pub mod env;
pub mod inputs;
pub mod state;

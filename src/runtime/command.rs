//! Workflow commands and job-log output
//!
//! The runner scans stdout for `::command::` lines, so everything here
//! prints to stdout. Diagnostics from `tracing` stay on stderr and can never
//! parse as commands.

/// Escape command data per the runner's rules
fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn format_command(command: &str, message: &str) -> String {
    format!("::{}::{}", command, escape_data(message))
}

/// Plain job-log line
pub fn info(message: &str) {
    println!("{}", message);
}

/// Warning annotation on the workflow run
pub fn warning(message: &str) {
    println!("{}", format_command("warning", message));
}

//! Workflow environment accessors
//!
//! Absence is a value at this layer: unset variables map to defaults or
//! `false`, and policy lives in the save flow.

use std::path::PathBuf;

/// Server URL the runner reports when none is set explicitly
const DEFAULT_SERVER_URL: &str = "https://github.com";

/// URL of the GitHub instance running the workflow
pub fn server_url() -> String {
    std::env::var("GITHUB_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string())
}

/// Whether the workflow runs on GitHub Enterprise Server
///
/// The hosted cache service only exists on github.com.
pub fn is_ghes() -> bool {
    match reqwest::Url::parse(&server_url()) {
        Ok(url) => url
            .host_str()
            .map(|host| !host.eq_ignore_ascii_case("github.com"))
            .unwrap_or(false),
        Err(_) => false,
    }
}

/// Whether the triggering event is tied to a branch or tag ref
///
/// Caches are scoped to refs; an event without `GITHUB_REF` has nothing to
/// scope a save to.
pub fn is_valid_event() -> bool {
    std::env::var("GITHUB_REF")
        .map(|git_ref| !git_ref.is_empty())
        .unwrap_or(false)
}

/// Name of the event that triggered the workflow
pub fn event_name() -> String {
    std::env::var("GITHUB_EVENT_NAME").unwrap_or_default()
}

/// Directory relative input paths are resolved against
pub fn workspace() -> PathBuf {
    match std::env::var("GITHUB_WORKSPACE") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

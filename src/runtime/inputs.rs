//! Action inputs
//!
//! The runner exposes each input as an `INPUT_*` environment variable. Inputs
//! are re-evaluated before the post step runs, so anything that must survive
//! from restore time belongs in [`super::state`], not here.

/// `path`: newline-separated list of path globs to cache
pub const PATH: &str = "path";

/// `always-save`: save even when the restore step hit the primary key
pub const ALWAYS_SAVE: &str = "always-save";

/// `upload-chunk-size`: chunk size in bytes for the artifact upload
pub const UPLOAD_CHUNK_SIZE: &str = "upload-chunk-size";

/// Environment variable the runner uses for an input name
///
/// Spaces become underscores and the name is uppercased; dashes are kept.
fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Read an input, trimmed; unset or blank inputs are absent
pub fn get_input(name: &str) -> Option<String> {
    let value = std::env::var(input_env_name(name)).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Read a newline-separated list input
pub fn get_input_as_array(name: &str) -> Vec<String> {
    get_input(name)
        .map(|value| {
            value
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Read an integer input; unparseable values count as absent
pub fn get_input_as_int(name: &str) -> Option<i64> {
    get_input(name)?.parse().ok()
}

/// Read a boolean input; only a case-insensitive `true` enables
pub fn get_input_as_bool(name: &str) -> bool {
    get_input(name)
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the cache service seam
///
/// The save flow classifies on these variants: validation problems surface
/// as workflow warnings, reservation conflicts are expected when parallel
/// jobs race on a key, everything else is reported and swallowed.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Input failed the service's precondition checks
    #[error("{0}")]
    Validation(String),

    /// Another job holds the reservation for this key
    #[error("Unable to reserve cache with key {key}, another job may be creating this cache.")]
    Reserve { key: String },

    /// The service answered with a non-success status
    #[error("cache service request failed: {status} - {message}")]
    Service { status: StatusCode, message: String },

    /// Archive construction or temp file I/O failed
    #[error("failed to build cache archive: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure talking to the service
    #[error("cache service request failed: {0}")]
    Http(#[from] reqwest::Error),
}

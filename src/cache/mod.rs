//! Cache service seam
//!
//! The save flow depends on [`CacheService`] only; [`ActionsCacheClient`] is
//! the production implementation talking to the runner's cache service.

pub mod archive;
pub mod client;
pub mod error;
pub mod version;

pub use client::ActionsCacheClient;
pub use error::CacheError;

/// Options forwarded with a save
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Upload chunk size in bytes; the client default applies when unset
    pub upload_chunk_size: Option<u64>,
}

/// Interface to the cache service
#[allow(async_fn_in_trait)]
pub trait CacheService {
    /// Persist `paths` under `key`, returning the service's entry id
    async fn save_cache(
        &self,
        paths: &[String],
        key: &str,
        options: &SaveOptions,
    ) -> Result<i64, CacheError>;
}

//! Client for the GitHub Actions cache service
//!
//! A thin delegation to the service HTTP API: reserve an entry, upload the
//! artifact, commit. The protocol, storage, and eviction all belong to the
//! service; the client never retries or chunks beyond slicing the upload
//! body.

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::archive;
use super::error::CacheError;
use super::version::cache_version;
use super::{CacheService, SaveOptions};
use crate::runtime;

/// Upload chunk size when the action does not override it (32 MiB)
const DEFAULT_UPLOAD_CHUNK_SIZE: u64 = 32 * 1024 * 1024;

/// Longest key the cache service accepts
const MAX_KEY_LENGTH: usize = 512;

pub struct ActionsCacheClient {
    client: Client,
    cache_url: String,
    token: String,
}

#[derive(Serialize)]
struct ReserveCacheRequest<'a> {
    key: &'a str,
    version: &'a str,
}

#[derive(Deserialize)]
struct ReserveCacheResponse {
    #[serde(rename = "cacheId")]
    cache_id: i64,
}

impl ActionsCacheClient {
    pub fn new(cache_url: String, token: String) -> Self {
        debug!("cache service endpoint: {}", cache_url);
        Self {
            client: Client::new(),
            cache_url,
            token,
        }
    }

    /// Build from the variables the runner injects into every job
    pub fn from_env() -> Result<Self> {
        let cache_url = std::env::var("ACTIONS_CACHE_URL")
            .context("ACTIONS_CACHE_URL not found (not running in GitHub Actions?)")?;
        let token =
            std::env::var("ACTIONS_RUNTIME_TOKEN").context("ACTIONS_RUNTIME_TOKEN not found")?;
        Ok(Self::new(cache_url, token))
    }

    /// Whether the runner provided cache service credentials
    pub fn is_available() -> bool {
        std::env::var("ACTIONS_CACHE_URL").is_ok() && std::env::var("ACTIONS_RUNTIME_TOKEN").is_ok()
    }

    async fn reserve(&self, key: &str, version: &str) -> Result<i64, CacheError> {
        let url = format!("{}/_apis/artifactcache/caches", self.cache_url);
        debug!("POST {} (reserving cache for key: {})", url, key);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&ReserveCacheRequest { key, version })
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(CacheError::Reserve {
                key: key.to_string(),
            });
        }
        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(CacheError::Service { status, message });
        }

        let reserved: ReserveCacheResponse = response.json().await?;
        debug!("reserved cache id: {}", reserved.cache_id);
        Ok(reserved.cache_id)
    }

    async fn upload(&self, cache_id: i64, data: Bytes, chunk_size: u64) -> Result<(), CacheError> {
        let url = format!("{}/_apis/artifactcache/caches/{}", self.cache_url, cache_id);
        let total = data.len() as u64;

        for (start, end) in chunk_spans(total, chunk_size) {
            debug!("PATCH {} (bytes {}-{}/{})", url, start, end, total);

            let response = self
                .client
                .patch(&url)
                .bearer_auth(&self.token)
                .header("Content-Type", "application/octet-stream")
                .header("Content-Range", format!("bytes {}-{}/*", start, end))
                .body(data.slice(start as usize..=end as usize))
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let message = response.text().await.unwrap_or_default();
                return Err(CacheError::Service { status, message });
            }
        }

        Ok(())
    }

    async fn commit(&self, cache_id: i64, size: u64) -> Result<(), CacheError> {
        let url = format!("{}/_apis/artifactcache/caches/{}", self.cache_url, cache_id);
        debug!("POST {} (committing {} bytes)", url, size);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "size": size }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(CacheError::Service { status, message });
        }

        Ok(())
    }
}

impl CacheService for ActionsCacheClient {
    async fn save_cache(
        &self,
        paths: &[String],
        key: &str,
        options: &SaveOptions,
    ) -> Result<i64, CacheError> {
        validate_key(key)?;
        if paths.is_empty() {
            return Err(CacheError::Validation(
                "Path Validation Error: At least one directory or file path is required."
                    .to_string(),
            ));
        }

        let workspace = runtime::env::workspace();
        let resolved = archive::resolve_paths(paths, &workspace);
        if resolved.is_empty() {
            return Err(CacheError::Validation(
                "Path Validation Error: Path(s) specified in the action for caching do(es) not exist, hence no cache is being saved."
                    .to_string(),
            ));
        }

        let artifact = archive::create_archive(&resolved, &workspace)?;
        let data = Bytes::from(std::fs::read(artifact.path())?);
        let size = data.len() as u64;
        info!(
            "archive ready: {} bytes from {} resolved path(s)",
            size,
            resolved.len()
        );

        let version = cache_version(paths);
        let cache_id = self.reserve(key, &version).await?;

        let chunk_size = options
            .upload_chunk_size
            .unwrap_or(DEFAULT_UPLOAD_CHUNK_SIZE);
        self.upload(cache_id, data, chunk_size).await?;
        self.commit(cache_id, size).await?;

        debug!("successfully saved cache for key: {}", key);
        Ok(cache_id)
    }
}

fn validate_key(key: &str) -> Result<(), CacheError> {
    if key.chars().count() > MAX_KEY_LENGTH {
        return Err(CacheError::Validation(format!(
            "Key Validation Error: {} cannot be larger than {} characters.",
            key, MAX_KEY_LENGTH
        )));
    }
    if key.contains(',') {
        return Err(CacheError::Validation(format!(
            "Key Validation Error: {} cannot contain commas.",
            key
        )));
    }
    Ok(())
}

/// Inclusive byte ranges covering `total` in `chunk_size` steps
fn chunk_spans(total: u64, chunk_size: u64) -> Vec<(u64, u64)> {
    let chunk_size = chunk_size.max(1);
    let mut spans = Vec::new();
    let mut start = 0;

    while start < total {
        let end = (start + chunk_size).min(total) - 1;
        spans.push((start, end));
        start = end + 1;
    }

    spans
}

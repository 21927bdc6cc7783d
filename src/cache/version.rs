//! Cache version computation
//!
//! The service namespaces entries by (key, version). The version
//! fingerprints the path set and the compression method, so the same key
//! never matches an artifact built from different paths or a different
//! archive format.

use sha2::{Digest, Sha256};

/// Archive compression method, part of the version fingerprint
const COMPRESSION_METHOD: &str = "zstd";

/// Hex-encoded SHA-256 over the path list and compression method
pub fn cache_version(paths: &[String]) -> String {
    let mut components: Vec<&str> = paths.iter().map(String::as_str).collect();
    components.push(COMPRESSION_METHOD);
    hex::encode(Sha256::digest(components.join("|")))
}

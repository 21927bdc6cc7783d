// Library interface for Lager
// This allows integration tests and external code to use Lager's modules

pub mod cache;
pub mod logging;
pub mod runtime;

// Re-export commonly used types
pub use cache::{ActionsCacheClient, CacheError, CacheService, SaveOptions};

//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching short key to URL bindings.
///
/// Bindings are immutable once created, so a cached entry can never go stale;
/// the TTL only bounds memory use. Cache failures must degrade to store
/// lookups rather than fail the request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the original URL for a short key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend fails; callers fall back to the store.
    async fn get_url(&self, short_key: &str) -> CacheResult<Option<String>>;

    /// Stores a binding with the implementation's default TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend fails. Callers log and continue.
    async fn set_url(&self, short_key: &str, original_url: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health endpoint to report cache status.
    async fn health_check(&self) -> bool;
}

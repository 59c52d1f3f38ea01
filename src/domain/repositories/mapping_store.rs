//! Repository trait for short key bindings.

use crate::domain::entities::ShortKey;
use crate::domain::errors::StoreError;
use async_trait::async_trait;

/// Durable store of `(short_key, original_url)` pairs.
///
/// Implementations must be safe to call concurrently from many request tasks.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteMappingStore`] - SQLite implementation
/// - [`crate::infrastructure::persistence::InMemoryMappingStore`] - reference store for tests
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Persists a new binding.
    ///
    /// Must be atomic with respect to `key`: of two concurrent saves with the
    /// same key exactly one succeeds. The binding is written entirely or not
    /// at all.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if `key` is already bound.
    /// Returns [`StoreError::Unavailable`] on any other fault.
    async fn save(&self, key: &ShortKey, url: &str) -> Result<(), StoreError>;

    /// Looks up the original URL bound to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the key is unbound.
    /// Returns [`StoreError::Unavailable`] on infrastructure faults.
    async fn get_url_by_key(&self, key: &ShortKey) -> Result<String, StoreError>;

    /// Looks up the key already bound to `url`.
    ///
    /// If several bindings share the URL, the oldest one wins.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the URL was never shortened.
    /// Returns [`StoreError::Unavailable`] on infrastructure faults.
    async fn get_key_by_url(&self, url: &str) -> Result<ShortKey, StoreError>;

    /// Reports whether `key` is bound. Absence is `Ok(false)`, never `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on infrastructure faults.
    async fn exists(&self, key: &ShortKey) -> Result<bool, StoreError>;

    /// Checks if the storage backend is reachable.
    ///
    /// Used by the health endpoint.
    async fn health_check(&self) -> bool {
        true
    }
}

//! Error taxonomy shared by the store contract and the allocation engine.

use thiserror::Error;

use crate::domain::entities::ShortKey;

/// Errors reported by a [`crate::domain::repositories::MappingStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The key is already bound. Only ever seen by the allocation engine,
    /// which treats it as a collision and retries.
    #[error("short key already exists: {0}")]
    DuplicateKey(ShortKey),

    #[error("mapping not found")]
    NotFound,

    /// Any infrastructure fault (connection lost, I/O, pool exhausted...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by [`crate::application::services::AllocationService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Caller contract violation, e.g. an empty URL.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("short key not found: {0}")]
    NotFound(String),

    /// Every candidate in the retry budget collided. Retriable by the caller.
    #[error("no free short key after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl From<StoreError> for AllocationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => Self::StorageUnavailable(reason),
            // NotFound and DuplicateKey are handled at the call site; reaching
            // here means the store broke its contract.
            other => Self::StorageUnavailable(other.to_string()),
        }
    }
}

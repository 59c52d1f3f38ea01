//! Short key allocation and resolution.
//!
//! [`AllocationService`] turns a long URL into a short key exactly once:
//! it returns the existing key when the URL was shortened before, and
//! otherwise draws random candidates until one is free, bounded by a retry
//! budget. The collision loop is an explicit state machine so attempts,
//! collisions and exhaustion are observable.

use std::future::Future;
use std::sync::Arc;
use tokio::time::{Instant, timeout_at};
use tracing::{error, info, warn};

use crate::application::services::url_lock::UrlLocks;
use crate::domain::entities::ShortKey;
use crate::domain::errors::{AllocationError, StoreError};
use crate::domain::repositories::MappingStore;
use crate::utils::key_generator::KeyGenerator;

/// Candidate draws allowed per shorten call unless configured otherwise.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Outcome of a successful shorten call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub key: ShortKey,
    /// `false` when the URL was already mapped and the existing key is returned.
    pub created: bool,
    /// Candidates drawn. Zero for an idempotent hit.
    pub attempts: u32,
    /// Candidates rejected because the key was taken.
    pub collisions: u32,
}

/// States of one shorten call.
///
/// ```text
/// LookupExisting ──found──▶ Done(existing)
///       │ not found
///       ▼
///   Generate ──budget spent──▶ Exhausted
///       ▼
///     Check ──taken──▶ Generate
///       │ free
///       ▼
///     Save ──duplicate key──▶ Generate
///       │ ok
///       ▼
///   Done(new)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
enum AllocationState {
    LookupExisting,
    Generate,
    Check(ShortKey),
    Save(ShortKey),
    Done(Allocation),
    Exhausted,
}

impl AllocationState {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Exhausted)
    }
}

/// Orchestrates idempotent lookup, candidate generation, collision checks and
/// persistence against a [`MappingStore`].
///
/// Same-URL calls are serialised by a striped lock held for the whole call,
/// so concurrent shortens of one new URL produce a single binding. The lock
/// is in-process: several service instances sharing one database do not
/// exclude each other.
pub struct AllocationService {
    store: Arc<dyn MappingStore>,
    generator: Arc<dyn KeyGenerator>,
    locks: UrlLocks,
    max_attempts: u32,
}

impl AllocationService {
    /// Creates a service with [`DEFAULT_MAX_ATTEMPTS`] and the default lock table.
    pub fn new(store: Arc<dyn MappingStore>, generator: Arc<dyn KeyGenerator>) -> Self {
        Self {
            store,
            generator,
            locks: UrlLocks::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets the retry budget (at least one draw).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets the number of per-URL lock stripes.
    pub fn with_lock_stripes(mut self, stripes: usize) -> Self {
        self.locks = UrlLocks::new(stripes);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Shortens `url` without a deadline.
    ///
    /// # Errors
    ///
    /// See [`Self::shorten_until`].
    pub async fn shorten(&self, url: &str) -> Result<Allocation, AllocationError> {
        self.allocate(url, None).await
    }

    /// Shortens `url`, giving up once `deadline` passes.
    ///
    /// A save that has already been issued is allowed to complete; its key is
    /// returned even if the deadline elapsed meanwhile.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::InvalidInput`] if `url` is empty, whitespace, or holds
    ///   control characters
    /// - [`AllocationError::AllocationExhausted`] if every candidate collided
    /// - [`AllocationError::StorageUnavailable`] on any store fault
    /// - [`AllocationError::DeadlineExceeded`] if `deadline` passes first
    pub async fn shorten_until(
        &self,
        url: &str,
        deadline: Instant,
    ) -> Result<Allocation, AllocationError> {
        self.allocate(url, Some(deadline)).await
    }

    /// Resolves a short key to its original URL.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::NotFound`] for unbound keys and
    /// [`AllocationError::StorageUnavailable`] on store faults.
    pub async fn resolve(&self, key: &ShortKey) -> Result<String, AllocationError> {
        self.lookup(key, None).await
    }

    /// Like [`Self::resolve`], bounded by `deadline`.
    ///
    /// # Errors
    ///
    /// Additionally returns [`AllocationError::DeadlineExceeded`].
    pub async fn resolve_until(
        &self,
        key: &ShortKey,
        deadline: Instant,
    ) -> Result<String, AllocationError> {
        self.lookup(key, Some(deadline)).await
    }

    /// Checks if the underlying store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.store.health_check().await
    }

    async fn allocate(
        &self,
        url: &str,
        deadline: Option<Instant>,
    ) -> Result<Allocation, AllocationError> {
        if url.trim().is_empty() {
            return Err(AllocationError::InvalidInput(
                "URL cannot be empty".to_string(),
            ));
        }
        // Must survive as a Location header value.
        if url.chars().any(char::is_control) {
            return Err(AllocationError::InvalidInput(
                "URL cannot contain control characters".to_string(),
            ));
        }

        let _guard = bounded(deadline, self.locks.lock(url)).await?;

        let mut attempts = 0;
        let mut collisions = 0;
        let mut state = AllocationState::LookupExisting;

        loop {
            if !state.is_terminal() {
                check_deadline(deadline)?;
            }

            state = match state {
                AllocationState::LookupExisting => {
                    match bounded(deadline, self.store.get_key_by_url(url)).await? {
                        Ok(key) => AllocationState::Done(Allocation {
                            key,
                            created: false,
                            attempts: 0,
                            collisions: 0,
                        }),
                        Err(StoreError::NotFound) => AllocationState::Generate,
                        Err(e) => return Err(storage_fault("lookup", e)),
                    }
                }
                AllocationState::Generate if attempts >= self.max_attempts => {
                    AllocationState::Exhausted
                }
                AllocationState::Generate => {
                    attempts += 1;
                    AllocationState::Check(self.generator.generate())
                }
                AllocationState::Check(candidate) => {
                    match bounded(deadline, self.store.exists(&candidate)).await? {
                        Ok(true) => {
                            collisions += 1;
                            record_collision(&candidate, attempts);
                            AllocationState::Generate
                        }
                        Ok(false) => AllocationState::Save(candidate),
                        Err(e) => return Err(storage_fault("exists", e)),
                    }
                }
                AllocationState::Save(candidate) => {
                    match self.store.save(&candidate, url).await {
                        Ok(()) => AllocationState::Done(Allocation {
                            key: candidate,
                            created: true,
                            attempts,
                            collisions,
                        }),
                        Err(StoreError::DuplicateKey(_)) => {
                            // Another writer took the key between exists and save.
                            collisions += 1;
                            record_collision(&candidate, attempts);
                            AllocationState::Generate
                        }
                        Err(e) => return Err(storage_fault("save", e)),
                    }
                }
                AllocationState::Done(allocation) => {
                    if allocation.created {
                        metrics::counter!("allocation_created_total").increment(1);
                        info!(
                            key = %allocation.key,
                            attempts = allocation.attempts,
                            "Unique key generated and saved"
                        );
                    } else {
                        metrics::counter!("allocation_reused_total").increment(1);
                        info!(key = %allocation.key, "URL already shortened, returning existing key");
                    }
                    return Ok(allocation);
                }
                AllocationState::Exhausted => {
                    metrics::counter!("allocation_exhausted_total").increment(1);
                    error!(
                        attempts,
                        collisions, "Failed to allocate a unique key within the retry budget"
                    );
                    return Err(AllocationError::AllocationExhausted { attempts });
                }
            };
        }
    }

    async fn lookup(
        &self,
        key: &ShortKey,
        deadline: Option<Instant>,
    ) -> Result<String, AllocationError> {
        check_deadline(deadline)?;

        match bounded(deadline, self.store.get_url_by_key(key)).await? {
            Ok(url) => Ok(url),
            Err(StoreError::NotFound) => Err(AllocationError::NotFound(key.to_string())),
            Err(e) => Err(storage_fault("resolve", e)),
        }
    }
}

/// Runs `fut`, failing with [`AllocationError::DeadlineExceeded`] if it does
/// not finish before `deadline`.
async fn bounded<F: Future>(
    deadline: Option<Instant>,
    fut: F,
) -> Result<F::Output, AllocationError> {
    match deadline {
        Some(deadline) => timeout_at(deadline, fut)
            .await
            .map_err(|_| AllocationError::DeadlineExceeded),
        None => Ok(fut.await),
    }
}

fn check_deadline(deadline: Option<Instant>) -> Result<(), AllocationError> {
    match deadline {
        Some(deadline) if Instant::now() >= deadline => Err(AllocationError::DeadlineExceeded),
        _ => Ok(()),
    }
}

fn record_collision(candidate: &ShortKey, attempt: u32) {
    metrics::counter!("allocation_collisions_total").increment(1);
    warn!(key = %candidate, attempt, "Key collision detected, generating new key");
}

fn storage_fault(step: &'static str, err: StoreError) -> AllocationError {
    error!(step, error = %err, "Mapping store failure");
    err.into()
}

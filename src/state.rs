//! Shared application state injected into handlers.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::application::services::AllocationService;
use crate::infrastructure::cache::CacheService;

/// Default time budget for a single request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

/// State shared by every request handler.
///
/// Cheap to clone: all heavy members sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub allocation_service: Arc<AllocationService>,
    pub cache: Arc<dyn CacheService>,
    /// Public prefix for generated short URLs, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Deadline applied to each shorten and resolve call.
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        allocation_service: Arc<AllocationService>,
        cache: Arc<dyn CacheService>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            allocation_service,
            cache,
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Deadline for a request starting now.
    pub fn deadline(&self) -> Instant {
        Instant::now() + self.request_timeout
    }
}

//! Business logic services for the application layer.

pub mod allocation_service;
pub mod url_lock;

pub use allocation_service::{Allocation, AllocationService, DEFAULT_MAX_ATTEMPTS};
pub use url_lock::UrlLocks;

//! Application layer services implementing business logic.
//!
//! Services consume domain traits and give HTTP handlers and the admin CLI a
//! single entry point for shortening and resolving.
//!
//! # Available Services
//!
//! - [`services::allocation_service::AllocationService`] - Idempotent key allocation and resolution

pub mod services;

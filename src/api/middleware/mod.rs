//! HTTP middleware for request processing.
//!
//! Provides request-id propagation and request/response tracing.

pub mod tracing;

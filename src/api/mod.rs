//! HTTP API layer.
//!
//! Translates HTTP requests into allocation service calls and formats the
//! results according to the API contract.
//!
//! # Modules
//!
//! - [`dto`] - Request/response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request id and tracing middleware

pub mod dto;
pub mod handlers;
pub mod middleware;

//! Utility functions for key generation and database error handling.
//!
//! - [`key_generator`] - Random short key generation
//! - [`db_error`] - Classification of SQLx errors

pub mod db_error;
pub mod key_generator;

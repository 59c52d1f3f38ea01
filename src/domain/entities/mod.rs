//! Core domain entities.
//!
//! - [`ShortKey`] - A validated 7-symbol public identifier
//! - [`UrlMapping`] - A persisted `(short_key, original_url)` binding

pub mod short_key;
pub mod url_mapping;

pub use short_key::{InvalidShortKey, KEY_ALPHABET, KEY_LENGTH, ShortKey};
pub use url_mapping::UrlMapping;

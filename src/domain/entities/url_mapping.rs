//! Persisted short key to URL binding.

use super::ShortKey;

/// A row of the mapping table.
///
/// Created once on first successful shortening of `original_url`, never
/// mutated or deleted afterwards. `id` is assigned by the store and only
/// orders rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub id: i64,
    pub short_key: ShortKey,
    pub original_url: String,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(id: i64, short_key: ShortKey, original_url: String) -> Self {
        Self {
            id,
            short_key,
            original_url,
        }
    }
}

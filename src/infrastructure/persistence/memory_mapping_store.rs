//! In-memory implementation of the mapping store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{ShortKey, UrlMapping};
use crate::domain::errors::StoreError;
use crate::domain::repositories::MappingStore;

/// Reference [`MappingStore`] kept entirely in process memory.
///
/// Key uniqueness is enforced through `DashMap`'s entry API, which holds the
/// shard lock between the occupancy check and the insert, so concurrent saves
/// of one key cannot both succeed. The URL index is non-unique: the first
/// binding recorded for a URL is the one returned by lookups.
#[derive(Debug, Default)]
pub struct InMemoryMappingStore {
    by_key: DashMap<String, UrlMapping>,
    by_url: DashMap<String, ShortKey>,
    last_id: AtomicI64,
}

impl InMemoryMappingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored bindings.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Snapshot of every binding, ordered by id.
    pub fn mappings(&self) -> Vec<UrlMapping> {
        let mut rows: Vec<UrlMapping> = self.by_key.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(|m| m.id);
        rows
    }
}

#[async_trait]
impl MappingStore for InMemoryMappingStore {
    async fn save(&self, key: &ShortKey, url: &str) -> Result<(), StoreError> {
        match self.by_key.entry(key.as_str().to_owned()) {
            Entry::Occupied(_) => return Err(StoreError::DuplicateKey(key.clone())),
            Entry::Vacant(slot) => {
                let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
                slot.insert(UrlMapping::new(id, key.clone(), url.to_owned()));
            }
        }

        self.by_url
            .entry(url.to_owned())
            .or_insert_with(|| key.clone());

        Ok(())
    }

    async fn get_url_by_key(&self, key: &ShortKey) -> Result<String, StoreError> {
        self.by_key
            .get(key.as_str())
            .map(|m| m.original_url.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn get_key_by_url(&self, url: &str) -> Result<ShortKey, StoreError> {
        self.by_url
            .get(url)
            .map(|k| k.value().clone())
            .ok_or(StoreError::NotFound)
    }

    async fn exists(&self, key: &ShortKey) -> Result<bool, StoreError> {
        Ok(self.by_key.contains_key(key.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn key(s: &str) -> ShortKey {
        ShortKey::new_unchecked(s)
    }

    #[tokio::test]
    async fn save_and_get() {
        let store = InMemoryMappingStore::new();

        store.save(&key("abc1234"), "https://example.com").await.unwrap();

        assert_eq!(
            store.get_url_by_key(&key("abc1234")).await.unwrap(),
            "https://example.com"
        );
        assert_eq!(
            store.get_key_by_url("https://example.com").await.unwrap(),
            key("abc1234")
        );
    }

    #[tokio::test]
    async fn lookups_on_empty_store_are_not_found() {
        let store = InMemoryMappingStore::new();

        assert_eq!(
            store.get_url_by_key(&key("nope123")).await,
            Err(StoreError::NotFound)
        );
        assert_eq!(
            store.get_key_by_url("https://missing.example").await,
            Err(StoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn exists_reports_absence_as_false() {
        let store = InMemoryMappingStore::new();
        assert!(!store.exists(&key("abc1234")).await.unwrap());

        store.save(&key("abc1234"), "https://example.com").await.unwrap();
        assert!(store.exists(&key("abc1234")).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_key_is_rejected_without_overwrite() {
        let store = InMemoryMappingStore::new();

        store.save(&key("abc1234"), "https://first.com").await.unwrap();
        let err = store
            .save(&key("abc1234"), "https://second.com")
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::DuplicateKey(key("abc1234")));
        assert_eq!(
            store.get_url_by_key(&key("abc1234")).await.unwrap(),
            "https://first.com"
        );
        assert_eq!(
            store.get_key_by_url("https://second.com").await,
            Err(StoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn first_binding_for_a_url_wins_lookup() {
        let store = InMemoryMappingStore::new();

        store.save(&key("first12"), "https://same.com").await.unwrap();
        store.save(&key("second1"), "https://same.com").await.unwrap();

        assert_eq!(
            store.get_key_by_url("https://same.com").await.unwrap(),
            key("first12")
        );
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn ids_increase_monotonically() {
        let store = InMemoryMappingStore::new();

        store.save(&key("aaaaaaa"), "https://a.com").await.unwrap();
        store.save(&key("bbbbbbb"), "https://b.com").await.unwrap();

        let rows = store.mappings();
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[1].id, 2);
        assert_eq!(rows[1].short_key, key("bbbbbbb"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_of_one_key_admit_exactly_one() {
        let store = Arc::new(InMemoryMappingStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .save(&key("racekey"), &format!("https://example.com/{i}"))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(e) => assert!(matches!(e, StoreError::DuplicateKey(_))),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.len(), 1);
    }
}

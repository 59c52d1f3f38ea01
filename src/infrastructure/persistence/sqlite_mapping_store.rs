//! SQLite implementation of the mapping store.

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{ShortKey, UrlMapping};
use crate::domain::errors::StoreError;
use crate::domain::repositories::MappingStore;
use crate::utils::db_error::is_unique_violation_on_key;

/// SQLite repository for short key bindings.
///
/// Key uniqueness is delegated to the `urls_short_key_key` constraint, so an
/// insert racing another insert of the same key fails with
/// [`StoreError::DuplicateKey`] instead of overwriting it.
pub struct SqliteMappingStore {
    pool: Arc<SqlitePool>,
}

impl SqliteMappingStore {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Counts stored bindings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on database errors.
    pub async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(unavailable)
    }

    /// Lists the most recent bindings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on database errors.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<UrlMapping>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, String, String)>(
            r#"
            SELECT id, short_key, original_url
            FROM urls
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(unavailable)?;

        Ok(rows
            .into_iter()
            .map(|(id, key, url)| UrlMapping::new(id, ShortKey::new_unchecked(key), url))
            .collect())
    }
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl MappingStore for SqliteMappingStore {
    async fn save(&self, key: &ShortKey, url: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO urls (short_key, original_url) VALUES (?, ?)")
            .bind(key.as_str())
            .bind(url)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| {
                if is_unique_violation_on_key(&e) {
                    StoreError::DuplicateKey(key.clone())
                } else {
                    unavailable(e)
                }
            })?;

        Ok(())
    }

    async fn get_url_by_key(&self, key: &ShortKey) -> Result<String, StoreError> {
        sqlx::query_scalar::<_, String>("SELECT original_url FROM urls WHERE short_key = ?")
            .bind(key.as_str())
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(unavailable)?
            .ok_or(StoreError::NotFound)
    }

    async fn get_key_by_url(&self, url: &str) -> Result<ShortKey, StoreError> {
        let key = sqlx::query_scalar::<_, String>(
            r#"
            SELECT short_key
            FROM urls
            WHERE original_url = ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(unavailable)?
        .ok_or(StoreError::NotFound)?;

        Ok(ShortKey::new_unchecked(key))
    }

    async fn exists(&self, key: &ShortKey) -> Result<bool, StoreError> {
        let found: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM urls WHERE short_key = ?)")
                .bind(key.as_str())
                .fetch_one(self.pool.as_ref())
                .await
                .map_err(unavailable)?;

        Ok(found != 0)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}

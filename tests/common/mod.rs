#![allow(dead_code)]

use axum_test::TestServer;
use sqlx::SqlitePool;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use urlkey::application::services::AllocationService;
use urlkey::domain::entities::ShortKey;
use urlkey::infrastructure::cache::NullCache;
use urlkey::infrastructure::persistence::{InMemoryMappingStore, SqliteMappingStore};
use urlkey::routes::router;
use urlkey::state::AppState;
use urlkey::utils::key_generator::{KeyGenerator, RandomKeyGenerator};

pub const BASE_URL: &str = "http://sho.rt";

/// Hands out a fixed sequence of keys, then falls back to random ones.
pub struct ScriptedGenerator {
    keys: Mutex<VecDeque<String>>,
}

impl ScriptedGenerator {
    pub fn new(keys: &[&str]) -> Self {
        Self {
            keys: Mutex::new(keys.iter().map(|k| k.to_string()).collect()),
        }
    }
}

impl KeyGenerator for ScriptedGenerator {
    fn generate(&self) -> ShortKey {
        match self.keys.lock().unwrap().pop_front() {
            Some(key) => ShortKey::new_unchecked(key),
            None => RandomKeyGenerator.generate(),
        }
    }
}

pub async fn create_test_mapping(pool: &SqlitePool, key: &str, url: &str) {
    sqlx::query("INSERT INTO urls (short_key, original_url) VALUES (?, ?)")
        .bind(key)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count_rows_for_url(pool: &SqlitePool, url: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE original_url = ?")
        .bind(url)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn sqlite_service(pool: SqlitePool) -> AllocationService {
    sqlite_service_from(Arc::new(SqliteMappingStore::new(Arc::new(pool))))
}

pub fn sqlite_service_from(store: Arc<SqliteMappingStore>) -> AllocationService {
    AllocationService::new(store, Arc::new(RandomKeyGenerator))
}

pub fn create_test_state(pool: SqlitePool) -> AppState {
    AppState::new(Arc::new(sqlite_service(pool)), Arc::new(NullCache), BASE_URL)
}

pub fn create_memory_state(
    store: Arc<InMemoryMappingStore>,
    generator: Arc<dyn KeyGenerator>,
    max_attempts: u32,
) -> AppState {
    let service = AllocationService::new(store, generator).with_max_attempts(max_attempts);
    AppState::new(Arc::new(service), Arc::new(NullCache), BASE_URL)
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

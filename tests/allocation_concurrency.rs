mod common;

use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;
use urlkey::application::services::AllocationService;
use urlkey::domain::entities::ShortKey;
use urlkey::domain::repositories::MappingStore;
use urlkey::infrastructure::persistence::SqliteMappingStore;

#[sqlx::test]
async fn test_concurrent_distinct_urls_get_unique_keys(pool: SqlitePool) {
    let service = Arc::new(common::sqlite_service(pool.clone()));

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .shorten(&format!("https://example.com/{}", i))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut keys = HashSet::new();
    for handle in handles {
        let allocation = handle.await.unwrap();
        assert!(allocation.created);
        keys.insert(allocation.key);
    }
    assert_eq!(keys.len(), 50);

    let distinct: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT short_key) FROM urls")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(distinct, 50);
}

#[sqlx::test]
async fn test_concurrent_same_url_yields_one_row(pool: SqlitePool) {
    let service = Arc::new(common::sqlite_service(pool.clone()));
    let url = "https://example.com/popular";

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.shorten(url).await.unwrap() })
        })
        .collect();

    let mut keys = HashSet::new();
    let mut created = 0;
    for handle in handles {
        let allocation = handle.await.unwrap();
        if allocation.created {
            created += 1;
        }
        keys.insert(allocation.key);
    }

    assert_eq!(keys.len(), 1);
    assert_eq!(created, 1);
    assert_eq!(common::count_rows_for_url(&pool, url).await, 1);
}

#[sqlx::test]
async fn test_collision_against_sqlite_is_retried(pool: SqlitePool) {
    common::create_test_mapping(&pool, "Taken01", "https://example.com/taken").await;

    let store = Arc::new(SqliteMappingStore::new(Arc::new(pool.clone())));
    let generator = Arc::new(common::ScriptedGenerator::new(&["Taken01", "Fresh01"]));
    let service = AllocationService::new(store.clone(), generator);

    let allocation = service.shorten("https://example.com/new").await.unwrap();

    assert_eq!(allocation.key, ShortKey::new_unchecked("Fresh01"));
    assert_eq!(allocation.collisions, 1);
    assert_eq!(
        store.get_url_by_key(&allocation.key).await.unwrap(),
        "https://example.com/new"
    );
    assert_eq!(
        store
            .get_url_by_key(&ShortKey::new_unchecked("Taken01"))
            .await
            .unwrap(),
        "https://example.com/taken"
    );
}

#[sqlx::test]
async fn test_sequential_shortens_round_trip(pool: SqlitePool) {
    let store = Arc::new(SqliteMappingStore::new(Arc::new(pool)));
    let service = common::sqlite_service_from(store.clone());

    for i in 0..20 {
        let url = format!("https://example.com/seq/{}", i);
        let allocation = service.shorten(&url).await.unwrap();

        assert_eq!(store.get_url_by_key(&allocation.key).await.unwrap(), url);
        assert_eq!(service.resolve(&allocation.key).await.unwrap(), url);
    }

    assert_eq!(store.count().await.unwrap(), 20);
}

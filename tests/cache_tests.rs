/// Storage tests for the expiring key-value store, run against an in-memory
/// SQLite database
use serde_json::json;
use skip_trace_api::cache_storage::{CacheNamespace, CacheStorage};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// One connection only: every pooled connection to `sqlite::memory:` would
/// otherwise see its own empty database.
async fn test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite")
}

async fn test_storage() -> (CacheStorage, SqlitePool) {
    let pool = test_pool().await;
    let storage = CacheStorage::new(pool.clone());
    storage.migrate().await.expect("migrate");
    (storage, pool)
}

#[tokio::test]
async fn test_set_then_get_returns_value() {
    let (storage, _pool) = test_storage().await;
    let value = json!({"match": true, "credits": 1});

    storage
        .set(CacheNamespace::SkipTrace, "key-1", &value, 3600)
        .await
        .unwrap();

    let fetched = storage.get(CacheNamespace::SkipTrace, "key-1").await.unwrap();
    assert_eq!(fetched, Some(value));
}

#[tokio::test]
async fn test_missing_key_is_absent() {
    let (storage, _pool) = test_storage().await;
    let fetched = storage
        .get(CacheNamespace::SkipTrace, "never-written")
        .await
        .unwrap();
    assert_eq!(fetched, None);
}

#[tokio::test]
async fn test_zero_ttl_is_already_expired() {
    let (storage, _pool) = test_storage().await;

    storage
        .set(CacheNamespace::SkipTrace, "key-1", &json!({"a": 1}), 0)
        .await
        .unwrap();

    let fetched = storage.get(CacheNamespace::SkipTrace, "key-1").await.unwrap();
    assert_eq!(fetched, None);
}

#[tokio::test]
async fn test_negative_ttl_is_already_expired() {
    let (storage, _pool) = test_storage().await;

    storage
        .set(CacheNamespace::SkipTrace, "key-1", &json!({"a": 1}), -60)
        .await
        .unwrap();

    let fetched = storage.get(CacheNamespace::SkipTrace, "key-1").await.unwrap();
    assert_eq!(fetched, None);
}

#[tokio::test]
async fn test_expired_key_stays_absent_until_overwritten() {
    let (storage, _pool) = test_storage().await;

    storage
        .set(CacheNamespace::SkipTrace, "key-1", &json!({"v": 1}), 0)
        .await
        .unwrap();

    // Repeated reads consistently report absence; the stale row is not
    // proactively deleted.
    for _ in 0..3 {
        let fetched = storage.get(CacheNamespace::SkipTrace, "key-1").await.unwrap();
        assert_eq!(fetched, None);
    }

    // The next successful write overwrites the stale row.
    storage
        .set(CacheNamespace::SkipTrace, "key-1", &json!({"v": 2}), 3600)
        .await
        .unwrap();
    let fetched = storage.get(CacheNamespace::SkipTrace, "key-1").await.unwrap();
    assert_eq!(fetched, Some(json!({"v": 2})));
}

#[tokio::test]
async fn test_overwrite_replaces_not_merges() {
    let (storage, _pool) = test_storage().await;

    storage
        .set(
            CacheNamespace::SkipTrace,
            "key-1",
            &json!({"v": 1, "only_in_first": true}),
            3600,
        )
        .await
        .unwrap();
    storage
        .set(CacheNamespace::SkipTrace, "key-1", &json!({"v": 2}), 3600)
        .await
        .unwrap();

    let fetched = storage.get(CacheNamespace::SkipTrace, "key-1").await.unwrap();
    assert_eq!(fetched, Some(json!({"v": 2})));
}

#[tokio::test]
async fn test_namespaces_never_collide() {
    let (storage, _pool) = test_storage().await;

    storage
        .set(CacheNamespace::SkipTrace, "shared-key", &json!("trace"), 3600)
        .await
        .unwrap();
    storage
        .set(
            CacheNamespace::PropertyDetail,
            "shared-key",
            &json!("detail"),
            3600,
        )
        .await
        .unwrap();

    assert_eq!(
        storage
            .get(CacheNamespace::SkipTrace, "shared-key")
            .await
            .unwrap(),
        Some(json!("trace"))
    );
    assert_eq!(
        storage
            .get(CacheNamespace::PropertyDetail, "shared-key")
            .await
            .unwrap(),
        Some(json!("detail"))
    );

    // Overwriting one namespace leaves the other untouched.
    storage
        .set(
            CacheNamespace::PropertyDetail,
            "shared-key",
            &json!("detail-2"),
            3600,
        )
        .await
        .unwrap();
    assert_eq!(
        storage
            .get(CacheNamespace::SkipTrace, "shared-key")
            .await
            .unwrap(),
        Some(json!("trace"))
    );
}

#[tokio::test]
async fn test_corrupted_value_reads_as_absent() {
    let (storage, pool) = test_storage().await;

    storage
        .set(CacheNamespace::SkipTrace, "key-1", &json!({"v": 1}), 3600)
        .await
        .unwrap();

    // Corrupt the stored row directly.
    sqlx::query("UPDATE cache SET value = 'not json {' WHERE key = ?1")
        .bind("key-1")
        .execute(&pool)
        .await
        .unwrap();

    let fetched = storage.get(CacheNamespace::SkipTrace, "key-1").await.unwrap();
    assert_eq!(fetched, None);

    // A fresh write recovers the key.
    storage
        .set(CacheNamespace::SkipTrace, "key-1", &json!({"v": 2}), 3600)
        .await
        .unwrap();
    assert_eq!(
        storage.get(CacheNamespace::SkipTrace, "key-1").await.unwrap(),
        Some(json!({"v": 2}))
    );
}

#[tokio::test]
async fn test_tampered_value_fails_integrity_check() {
    let (storage, pool) = test_storage().await;

    storage
        .set(CacheNamespace::SkipTrace, "key-1", &json!({"owner": "alice"}), 3600)
        .await
        .unwrap();

    // Valid JSON envelope, but the payload no longer matches its checksum.
    let row: (String,) = sqlx::query_as("SELECT value FROM cache WHERE key = ?1")
        .bind("key-1")
        .fetch_one(&pool)
        .await
        .unwrap();
    let tampered = row.0.replace("alice", "mallory");
    sqlx::query("UPDATE cache SET value = ?1 WHERE key = ?2")
        .bind(tampered)
        .bind("key-1")
        .execute(&pool)
        .await
        .unwrap();

    let fetched = storage.get(CacheNamespace::SkipTrace, "key-1").await.unwrap();
    assert_eq!(fetched, None);
}

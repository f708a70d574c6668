use crate::errors::AppError;
use crate::integrity::SealedValue;
use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;

/// The two physically distinct keyspaces of the cache.
///
/// Skip-trace entries are keyed by query fingerprint; property-detail entries
/// by the provider's opaque property id. Equal key strings in the two
/// namespaces never collide because each namespace owns its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheNamespace {
    SkipTrace,
    PropertyDetail,
}

impl CacheNamespace {
    fn table(self) -> &'static str {
        match self {
            CacheNamespace::SkipTrace => "cache",
            CacheNamespace::PropertyDetail => "property_detail_cache",
        }
    }

    fn key_column(self) -> &'static str {
        match self {
            CacheNamespace::SkipTrace => "key",
            CacheNamespace::PropertyDetail => "property_id",
        }
    }
}

/// Persistent expiring key-value store for cached JSON payloads.
///
/// Entries carry an absolute expiry; a row whose expiry has passed is reported
/// as absent but left in place until the next successful write overwrites it.
/// Writes replace the whole entry in a single statement, so a concurrent
/// reader never observes a partially written value. Corrupted rows read back
/// as absent.
#[derive(Clone)]
pub struct CacheStorage {
    pool: SqlitePool,
}

impl CacheStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the cache tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS property_detail_cache (
                property_id TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persists `value` under `key`, replacing any prior entry.
    ///
    /// The expiry is computed as now + `ttl_seconds` at call time; a zero or
    /// negative TTL produces an entry that is already expired.
    pub async fn set(
        &self,
        namespace: CacheNamespace,
        key: &str,
        value: &Value,
        ttl_seconds: i64,
    ) -> Result<(), AppError> {
        let expires_at = Utc::now().timestamp() + ttl_seconds;
        let sealed = SealedValue::seal(value);

        let statement = format!(
            "REPLACE INTO {} ({}, value, expires_at) VALUES (?1, ?2, ?3)",
            namespace.table(),
            namespace.key_column()
        );

        sqlx::query(&statement)
            .bind(key)
            .bind(sealed)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Cached entry in {} (key: {}, expires_at: {})",
            namespace.table(),
            key,
            expires_at
        );

        Ok(())
    }

    /// Returns the stored value if the current time is strictly before its
    /// expiry; otherwise behaves as if absent.
    ///
    /// A row that fails deserialization or its integrity check is logged and
    /// reported as absent — never surfaced to the caller as an error.
    pub async fn get(
        &self,
        namespace: CacheNamespace,
        key: &str,
    ) -> Result<Option<Value>, AppError> {
        let statement = format!(
            "SELECT value, expires_at FROM {} WHERE {} = ?1",
            namespace.table(),
            namespace.key_column()
        );

        let row = sqlx::query_as::<_, (String, i64)>(&statement)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let (stored, expires_at) = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        if Utc::now().timestamp() >= expires_at {
            tracing::debug!(
                "Cache entry expired in {} (key: {})",
                namespace.table(),
                key
            );
            return Ok(None);
        }

        match SealedValue::open(&stored) {
            Some(value) => Ok(Some(value)),
            None => {
                tracing::warn!(
                    "Discarding corrupted cache entry in {} (key: {})",
                    namespace.table(),
                    key
                );
                Ok(None)
            }
        }
    }
}

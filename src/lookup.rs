/// Shared lookup workflow for the HTTP handlers.
///
/// The service owns the upstream client and the cache store and orchestrates
/// the full path for a query:
/// 1. Validate and canonicalize the query
/// 2. Derive the cache fingerprint
/// 3. Return the cached record on a hit
/// 4. On a miss, call the provider, normalize + score, cache, return
use crate::cache_storage::{CacheNamespace, CacheStorage};
use crate::confidence;
use crate::errors::AppError;
use crate::fingerprint::derive_fingerprint;
use crate::gateway_client::SkipTraceClient;
use crate::models::{NormalizedIdentity, SkipTraceQuery};
use crate::normalizer::normalize;
use serde_json::Value;

#[derive(Clone)]
pub struct SkipTraceService {
    client: SkipTraceClient,
    storage: CacheStorage,
    /// TTL applied to skip-trace results.
    result_ttl_seconds: i64,
    /// TTL applied to property-detail payloads.
    detail_ttl_seconds: i64,
}

impl SkipTraceService {
    pub fn new(
        client: SkipTraceClient,
        storage: CacheStorage,
        result_ttl_seconds: i64,
        detail_ttl_seconds: i64,
    ) -> Self {
        Self {
            client,
            storage,
            result_ttl_seconds,
            detail_ttl_seconds,
        }
    }

    /// Resolves a query to a normalized identity record.
    ///
    /// Two calls with the same query within the TTL window reach the provider
    /// exactly once: the normalized+scored record is cached under the query
    /// fingerprint and served directly on hits, with no re-normalization. An
    /// upstream failure is propagated without writing to the cache, so the
    /// next attempt starts from scratch.
    pub async fn lookup(&self, query: &SkipTraceQuery) -> Result<NormalizedIdentity, AppError> {
        let query = query.normalized()?;
        let key = derive_fingerprint(&query);

        if let Some(cached) = self.storage.get(CacheNamespace::SkipTrace, &key).await? {
            match serde_json::from_value::<NormalizedIdentity>(cached) {
                Ok(record) => {
                    tracing::info!("Skip trace cache hit (key: {})", key);
                    return Ok(record);
                }
                Err(e) => {
                    // Shape drift between releases reads as a miss.
                    tracing::warn!(
                        "Cached skip trace record no longer deserializes, refetching (key: {}): {}",
                        key,
                        e
                    );
                }
            }
        }

        tracing::info!("Skip trace cache miss, calling provider (key: {})", key);
        let raw = self.client.skip_trace(&query).await?;

        let mut record = normalize(&raw);
        record.match_confidence = confidence::score(&record.identity);

        let value = serde_json::to_value(&record)
            .map_err(|e| AppError::Internal(format!("Failed to serialize record: {}", e)))?;
        self.storage
            .set(CacheNamespace::SkipTrace, &key, &value, self.result_ttl_seconds)
            .await?;

        Ok(record)
    }

    /// Read-through lookup of a property-detail payload by provider id.
    ///
    /// Uses the `property_detail` namespace with the longer default TTL; the
    /// payload is cached and returned as-is.
    pub async fn property_detail(&self, property_id: &str) -> Result<Value, AppError> {
        if let Some(cached) = self
            .storage
            .get(CacheNamespace::PropertyDetail, property_id)
            .await?
        {
            tracing::info!("Property detail cache hit (id: {})", property_id);
            return Ok(cached);
        }

        tracing::info!("Property detail cache miss (id: {})", property_id);
        let detail = self.client.property_detail(property_id).await?;

        self.storage
            .set(
                CacheNamespace::PropertyDetail,
                property_id,
                &detail,
                self.detail_ttl_seconds,
            )
            .await?;

        Ok(detail)
    }
}

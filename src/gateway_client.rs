use crate::errors::{AppError, UpstreamError};
use crate::models::SkipTraceQuery;
use serde_json::{json, Value};
use std::time::Duration;

/// Client for the upstream skip-trace provider (RealEstateAPI).
///
/// This is the only component that touches the provider network API. Failures
/// are reported uniformly as [`UpstreamError`]; the client performs no retries
/// and every call is bounded by the configured timeout.
#[derive(Clone)]
pub struct SkipTraceClient {
    client: reqwest::Client,
    skip_trace_url: String,
    property_detail_url: String,
    api_key: String,
    user_id: Option<String>,
}

impl SkipTraceClient {
    /// Creates a new `SkipTraceClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the provider API.
    /// * `api_key` - API key sent as `x-api-key`.
    /// * `user_id` - Optional user identifier sent as `x-user-id` for tracking.
    /// * `timeout` - Upper bound on a single round trip.
    pub fn new(
        base_url: &str,
        api_key: String,
        user_id: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::Internal(format!("Failed to create skip-trace client: {}", e))
            })?;

        let base = base_url.trim_end_matches('/');

        Ok(Self {
            client,
            skip_trace_url: format!("{}/v1/SkipTrace", base),
            property_detail_url: format!("{}/v2/PropertyDetail", base),
            api_key,
            user_id,
        })
    }

    /// Performs a skip-trace lookup for an already-normalized query.
    ///
    /// Returns the provider's raw JSON payload. The request body carries only
    /// the facts that are present; the match-requirement flags are forwarded
    /// as a `match_requirements` object with an `"and"` operator when both
    /// flags are set and `"or"` otherwise.
    pub async fn skip_trace(&self, query: &SkipTraceQuery) -> Result<Value, AppError> {
        let mut payload = serde_json::Map::new();

        if let Some(ref email) = query.email {
            payload.insert("email".to_string(), json!(email));
        }
        if let Some(ref phone) = query.phone {
            payload.insert("phone".to_string(), json!(phone));
        }
        if let Some(ref first_name) = query.first_name {
            payload.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(ref last_name) = query.last_name {
            payload.insert("last_name".to_string(), json!(last_name));
        }
        if let Some(ref address) = query.address {
            payload.insert("address".to_string(), json!(address));
        }
        if let Some(ref unit) = query.unit {
            payload.insert("unit".to_string(), json!(unit));
        }
        if let Some(ref city) = query.city {
            payload.insert("city".to_string(), json!(city));
        }
        if let Some(ref state) = query.state {
            payload.insert("state".to_string(), json!(state));
        }
        if let Some(ref zip) = query.zip {
            payload.insert("zip".to_string(), json!(zip));
        }

        let operator = if query.require_phone && query.require_email {
            "and"
        } else {
            "or"
        };
        payload.insert(
            "match_requirements".to_string(),
            json!({
                "phones": query.require_phone,
                "emails": query.require_email,
                "operator": operator,
            }),
        );

        tracing::info!("Calling skip-trace provider: {}", self.skip_trace_url);

        let mut request = self
            .client
            .post(&self.skip_trace_url)
            .header("x-api-key", &self.api_key)
            .json(&Value::Object(payload));

        if let Some(ref user_id) = self.user_id {
            request = request.header("x-user-id", user_id);
        }

        let response = request.send().await.map_err(|e| {
            AppError::Upstream(UpstreamError::transport(format!(
                "Skip trace request failed: {}",
                e
            )))
        })?;

        self.read_json(response, "Skip trace").await
    }

    /// Fetches detail for a single property by its provider id.
    pub async fn property_detail(&self, property_id: &str) -> Result<Value, AppError> {
        tracing::info!(
            "Fetching property detail {} from provider",
            property_id
        );

        let mut request = self
            .client
            .post(&self.property_detail_url)
            .header("x-api-key", &self.api_key)
            .json(&json!({ "id": property_id }));

        if let Some(ref user_id) = self.user_id {
            request = request.header("x-user-id", user_id);
        }

        let response = request.send().await.map_err(|e| {
            AppError::Upstream(UpstreamError::transport(format!(
                "Property detail request failed: {}",
                e
            )))
        })?;

        self.read_json(response, "Property detail").await
    }

    /// Turns a provider response into a JSON payload, mapping non-2xx statuses
    /// and unparseable bodies into `UpstreamError`.
    async fn read_json(&self, response: reqwest::Response, what: &str) -> Result<Value, AppError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Surface the provider's own message when the body is JSON.
            let detail = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| status.to_string());

            tracing::error!("{} returned {}: {}", what, status, detail);

            return Err(AppError::Upstream(UpstreamError {
                message: format!("{} request failed: {}", what, detail),
                status_code: Some(status.as_u16()),
                body: Some(body),
            }));
        }

        response.json().await.map_err(|e| {
            AppError::Upstream(UpstreamError {
                message: format!("Failed to parse {} response: {}", what, e),
                status_code: Some(status.as_u16()),
                body: None,
            })
        })
    }
}

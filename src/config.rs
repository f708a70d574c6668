use serde::Deserialize;

/// Default TTL for skip-trace results: 1 day.
pub const SKIP_TRACE_TTL_SECONDS: i64 = 86_400;

/// Default TTL for other cached payloads (property detail lookups): 7 days.
pub const DEFAULT_CACHE_TTL_SECONDS: i64 = 604_800;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub reapi_base_url: String,
    pub reapi_api_key: String,
    pub reapi_user_id: Option<String>,
    /// Upper bound on a single upstream round trip, in seconds.
    pub request_timeout_seconds: u64,
    /// TTL applied to skip-trace results.
    pub skip_trace_ttl_seconds: i64,
    /// TTL applied to auxiliary cached payloads (property detail).
    pub cache_ttl_seconds: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://cache.db?mode=rwc".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            reapi_base_url: std::env::var("REAPI_BASE_URL")
                .unwrap_or_else(|_| "https://api.realestateapi.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            reapi_api_key: std::env::var("REAPI_API_KEY")
                .map_err(|_| anyhow::anyhow!("REAPI_API_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("REAPI_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            reapi_user_id: std::env::var("REAPI_USER_ID")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REQUEST_TIMEOUT_SECONDS must be a number"))?,
            skip_trace_ttl_seconds: std::env::var("SKIP_TRACE_TTL_SECONDS")
                .unwrap_or_else(|_| SKIP_TRACE_TTL_SECONDS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SKIP_TRACE_TTL_SECONDS must be a number"))?,
            cache_ttl_seconds: std::env::var("CACHE_TTL_SECONDS")
                .unwrap_or_else(|_| DEFAULT_CACHE_TTL_SECONDS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("CACHE_TTL_SECONDS must be a number"))?,
        };

        if !config.reapi_base_url.starts_with("http://")
            && !config.reapi_base_url.starts_with("https://")
        {
            anyhow::bail!("REAPI_BASE_URL must start with http:// or https://");
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("REAPI base URL: {}", config.reapi_base_url);
        tracing::debug!("Database URL: {}", config.database_url);
        tracing::debug!("Server port: {}", config.port);
        tracing::debug!(
            "TTLs: skip_trace={}s, default={}s",
            config.skip_trace_ttl_seconds,
            config.cache_ttl_seconds
        );

        Ok(config)
    }
}

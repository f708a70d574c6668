use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Caller-fixable input problems. Reported before any cache lookup or
/// upstream call is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No identifying fact (name, email, phone, or address component) was supplied.
    MissingIdentifier,
    /// Phone did not normalize to exactly 10 digits.
    InvalidPhone,
    /// ZIP did not normalize to 5 or 9 digits.
    InvalidZip,
    /// State was not a 2-letter code.
    InvalidState,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::MissingIdentifier => write!(
                f,
                "At least one identifier (email, phone, name, or address) is required"
            ),
            QueryError::InvalidPhone => write!(f, "Phone number must be 10 digits"),
            QueryError::InvalidZip => write!(f, "ZIP code must be 5 or 9 digits"),
            QueryError::InvalidState => write!(f, "State must be a 2-letter code"),
        }
    }
}

/// Failure reported by (or while reaching) the upstream skip-trace provider.
///
/// Carries the upstream status code and response body when a response was
/// received at all. These failures are never retried and never cached.
#[derive(Debug, Clone)]
pub struct UpstreamError {
    /// Human-readable description of the failure.
    pub message: String,
    /// HTTP status returned by the provider, if a response arrived.
    pub status_code: Option<u16>,
    /// Raw response body, if one was received.
    pub body: Option<String>,
}

impl UpstreamError {
    /// Transport-level failure (connect error, timeout) with no response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            body: None,
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "{} (status {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Invalid query input, rejected before any external work.
    Query(QueryError),
    /// Upstream provider failure (transport, non-2xx, or malformed body).
    Upstream(UpstreamError),
    /// Database-related errors.
    Database(sqlx::Error),
    /// Internal server error.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Query(e) => write!(f, "Bad request: {}", e),
            AppError::Upstream(e) => write!(f, "Upstream error: {}", e),
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Query errors map to 400 with the validation message; upstream failures
    /// map to 502 and surface the provider's message when one was received.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Query(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Upstream(e) => {
                tracing::error!("Upstream error: {}", e);
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::Query(err)
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        AppError::Upstream(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an upstream failure, keeping the
    /// status code when the error came from a received response.
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(UpstreamError {
            message: err.to_string(),
            status_code: err.status().map(|s| s.as_u16()),
            body: None,
        })
    }
}

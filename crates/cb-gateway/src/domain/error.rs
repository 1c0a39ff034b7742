//! API Gateway error types.
//!
//! Every failure a client can see is an [`ApiError`]: a kind that fixes the
//! HTTP status plus the message sent back as `{"error": "..."}`.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shared_types::{ErrorBody, MissingFields};
use std::fmt;

/// Message returned for every storage failure; details stay in the logs.
pub const DB_ERROR_MESSAGE: &str = "DB error";

/// Error classification, one per HTTP status the gateway emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or malformed input
    Validation,
    /// Bad credentials or missing/invalid token
    Unauthorized,
    /// Unknown route
    NotFound,
    /// Body over the configured size limit
    PayloadTooLarge,
    /// Per-IP quota exhausted
    RateLimited,
    /// Request exceeded the gateway timeout
    Timeout,
    /// Storage or provider failure
    Internal,
}

impl ErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API Gateway error
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error classification
    pub kind: ErrorKind,
    /// Error message
    pub message: String,
    /// Seconds until a rate-limited client may retry
    pub retry_after_secs: Option<u64>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after_secs: None,
        }
    }

    /// Invalid request - missing fields or a body that is not JSON
    pub fn validation(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, details)
    }

    /// Unauthorized - missing or invalid auth
    pub fn unauthorized(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, details)
    }

    /// No route for this method and path
    pub fn not_found(path: &str) -> Self {
        Self::new(ErrorKind::NotFound, format!("Not found: {}", path))
    }

    /// Request body over the limit
    pub fn payload_too_large(limit: usize) -> Self {
        Self::new(
            ErrorKind::PayloadTooLarge,
            format!("Request body exceeds {} bytes", limit),
        )
    }

    /// Rate limited
    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self {
            retry_after_secs: Some(retry_after_secs.max(1)),
            ..Self::new(ErrorKind::RateLimited, "Rate limit exceeded")
        }
    }

    /// Request timeout
    pub fn timeout(limit_secs: u64) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("Request exceeded {}s timeout", limit_secs),
        )
    }

    /// Internal error
    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, details)
    }

    /// Storage failure, reported with the generic message
    pub fn database() -> Self {
        Self::internal(DB_ERROR_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status().as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ApiError", 1)?;
        state.serialize_field("error", &self.message)?;
        state.end()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retry_after = self.retry_after_secs;
        let mut response = (status, Json(ErrorBody { error: self.message })).into_response();

        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<MissingFields> for ApiError {
    fn from(e: MissingFields) -> Self {
        ApiError::validation(e.to_string())
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway-level errors (startup and serving, never sent to clients)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Certificate or key could not be loaded
    #[error("TLS error: {0}")]
    Tls(String),

    /// Store could not be reached at startup
    #[error("store connection error: {0}")]
    Store(String),

    /// Server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(String),
}

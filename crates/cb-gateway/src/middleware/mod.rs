//! Middleware stack for the API Gateway.
//!
//! Layer order (outermost first):
//! Cors → Tracing → Timeout → Validation → RateLimit → Auth → Handler

pub mod auth;
pub mod cors;
pub mod rate_limit;
pub mod timeout;
pub mod tracing;
pub mod validation;

pub use auth::{bearer_token, AuthLayer};
pub use cors::create_cors_layer;
pub use rate_limit::{
    cleanup_task, extract_client_ip, is_trusted_proxy, RateLimitLayer, RateLimitState,
};
pub use timeout::TimeoutLayer;
pub use self::tracing::TracingLayer;
pub use validation::ValidationLayer;

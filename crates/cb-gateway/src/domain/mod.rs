//! Domain types for the API Gateway.
//!
//! Configuration, error handling, the route registry and session tokens.

pub mod config;
pub mod error;
pub mod routes;
pub mod token;

// Re-exports for convenience
pub use config::{GatewayConfig, LimitsConfig, TimeoutConfig};
pub use error::{ApiError, ApiResult, ErrorKind, GatewayError};
pub use routes::{get_route_info, get_route_tier, is_write_route, RouteInfo, RouteTier};
pub use token::{TokenClaims, TokenError, TokenIssuer};

// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! Callboard API Gateway - the HTTP face of the call-center dashboard.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     API GATEWAY (cb-gateway)                 │
//! ├──────────────────────────────────────────────────────────────┤
//! │   HTTP / HTTPS  :3001                                        │
//! │         │                                                    │
//! │  ┌──────┴───────────────────────────────────────────────┐    │
//! │  │                  Middleware Stack                    │    │
//! │  │  Cors → Tracing → Timeout → Validation → RateLimit   │    │
//! │  │                                   → Auth (token)     │    │
//! │  └──────┬───────────────────────────────────────────────┘    │
//! │         │                                                    │
//! │  ┌──────┴──────┐   /login  /calls  /history                  │
//! │  │  Handlers   │   /call.php  /callback.php                  │
//! │  └──┬───────┬──┘   /api/ping  /health                        │
//! └─────┼───────┼────────────────────────────────────────────────┘
//!       │       │
//!       ▼       ▼
//!  UserStore   CallStore            TelephonyProvider
//!  (MySQL / in-memory)              (logging stub)
//! ```
//!
//! # Route Tiers
//!
//! - **Public**: `/login`, `/api/ping`, `/health`
//! - **Protected**: `/calls`, `/history`, `/call.php`, `/callback.php`;
//!   bearer token required only when `auth.require_token` is set
//!
//! # Usage
//!
//! ```ignore
//! use cb_gateway::{CallboardGateway, GatewayConfig, GatewayServices};
//!
//! let config = GatewayConfig::from_env()?;
//! let gateway = CallboardGateway::new(config, services)?;
//! gateway.start(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! ```
//!
//! # Security
//!
//! - HMAC-SHA256 signed, expiring session tokens checked in constant time
//! - Per-IP rate limiting with token bucket algorithm (login on a tighter quota)
//! - Request size limits and a per-request timeout
//! - Storage failures logged server-side, reported to clients as `DB error`

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod router;
pub mod service;

// Re-exports for public API
pub use adapters::{InMemoryStore, LoggingTelephony, MySqlStore, RecordingTelephony};
pub use domain::config::{GatewayConfig, LimitsConfig, TimeoutConfig};
pub use domain::error::{ApiError, ApiResult, ErrorKind, GatewayError};
pub use domain::routes::{get_route_info, RouteInfo, RouteTier, ROUTES};
pub use domain::token::{TokenClaims, TokenError, TokenIssuer};
pub use ports::{CallStore, StoreError, TelephonyProvider, TimeSource, UserStore};
pub use router::AppState;
pub use service::{CallboardGateway, GatewayServices};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

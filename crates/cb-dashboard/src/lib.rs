//! # Callboard Dashboard Client
//!
//! Everything the dashboard front-ends need short of drawing pixels.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `client` | `GatewayClient`: login, listings, request probe |
//! | `session` | `Session`: user + bearer token, consumed by logout |
//! | `feed` | `CallFeed` port with `MockFeed` and `GatewayFeed` |
//! | `board` | `ActiveCallBoard` and its one-second ticker |
//! | `filter` | Pure history filters and stats |
//! | `requests` | Probe presets and the bounded request log |
//! | `guide` | Static API guide catalog |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cb_dashboard::{ClientConfig, GatewayClient, GatewayFeed, DEFAULT_BASE_URL};
//!
//! let client = GatewayClient::new(&ClientConfig::from_env(DEFAULT_BASE_URL))?;
//! let session = client.login("admin", "secret").await?;
//! let feed = GatewayFeed::from_session(&session);
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod board;
pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod filter;
pub mod format;
pub mod guide;
pub mod requests;
pub mod session;

pub use board::{ActiveCallBoard, BoardStats, TickerHandle, TICK_INTERVAL};
pub use client::GatewayClient;
pub use config::{resolve_base_url, ClientConfig, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use feed::{CallFeed, GatewayFeed, MockFeed};
pub use filter::{companies, CompanyFilter, DateFilter, HistoryFilter, HistoryStats, StatusFilter};
pub use format::format_duration;
pub use guide::{ApiExample, ApiGuide, API_EXAMPLES};
pub use requests::{
    ProbeClass, ProbeEntry, ProbeMethod, ProbeOutcome, ProbePreset, ProbeRequest, RequestLog,
    MAX_LOG_ENTRIES,
};
pub use session::Session;

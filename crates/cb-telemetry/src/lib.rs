//! # Callboard Telemetry
//!
//! Logging setup shared by the gateway runtime and the terminal dashboard.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cb_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::for_component("gateway");
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CALLBOARD_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `CALLBOARD_JSON_LOGS` | `false` | JSON log lines (default `true` in containers) |
//! | `CALLBOARD_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `CALLBOARD_LOG_FILE` | unset | Append logs to a file instead |

#![warn(clippy::all)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Failed to open log file: {0}")]
    LogFile(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

//! Telemetry configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Logging configuration for a Callboard process.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive such as `cb_gateway=debug,sqlx=warn`
    pub log_level: String,

    /// Whether to write logs to stdout
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Append logs to this file instead of stdout (used by the TUI, which
    /// owns the terminal)
    pub log_file: Option<PathBuf>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "callboard".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            log_file: None,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CALLBOARD_SERVICE_NAME`: Service name (default: callboard)
    /// - `CALLBOARD_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `CALLBOARD_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `CALLBOARD_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `CALLBOARD_LOG_FILE`: Write logs to a file
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("CALLBOARD_SERVICE_NAME")
                .unwrap_or_else(|_| "callboard".to_string()),

            log_level: env::var("CALLBOARD_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("CALLBOARD_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("CALLBOARD_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            log_file: env::var("CALLBOARD_LOG_FILE").ok().map(PathBuf::from),
        }
    }

    /// Configuration for a named component, e.g. `gateway` or `tui`.
    pub fn for_component(component: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = format!("{}-{}", config.service_name, component);
        config
    }
}

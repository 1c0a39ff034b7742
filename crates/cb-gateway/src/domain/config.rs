//! Gateway configuration with validation.
//!
//! Every section has a `Default`; `GatewayConfig::from_env` overlays the
//! process environment on top of the defaults.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Hard upper bound on rows returned by the listing endpoints.
pub const MAX_LISTING_ROWS: u32 = 100;

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// MySQL connection settings
    pub database: DatabaseConfig,
    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
    /// Request validation limits
    pub limits: LimitsConfig,
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Session token configuration
    pub auth: AuthConfig,
    /// TLS configuration (optional; enables HTTPS)
    pub tls: Option<TlsConfig>,
}

impl GatewayConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unset keys keep their defaults; malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.http.host = parse_value("HOST", &host)?;
        }
        if let Some(port) = lookup("PORT") {
            config.http.port = parse_value("PORT", &port)?;
        }

        if let Some(host) = lookup("DB_HOST") {
            config.database.host = host;
        }
        if let Some(port) = lookup("DB_PORT") {
            config.database.port = parse_value("DB_PORT", &port)?;
        }
        if let Some(user) = lookup("DB_USER") {
            config.database.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            config.database.password = password;
        }
        if let Some(database) = lookup("DB_DATABASE") {
            config.database.database = database;
        }

        config.tls = match (lookup("TLS_KEY_PATH"), lookup("TLS_CERT_PATH")) {
            (Some(key), Some(cert)) => Some(TlsConfig {
                key_path: PathBuf::from(key),
                cert_path: PathBuf::from(cert),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        match lookup("AUTH_SECRET") {
            Some(secret) => config.auth.secret = secret,
            None => {
                warn!("AUTH_SECRET not set; using a random per-process secret, tokens will not survive a restart");
                config.auth.secret = generate_secret();
            }
        }
        if let Some(issuer) = lookup("AUTH_ISSUER") {
            config.auth.issuer = issuer;
        }
        if let Some(ttl) = lookup("AUTH_TOKEN_TTL_SECS") {
            config.auth.token_ttl = Duration::from_secs(parse_value("AUTH_TOKEN_TTL_SECS", &ttl)?);
        }
        if let Some(flag) = lookup("AUTH_REQUIRE_TOKEN") {
            config.auth.require_token = parse_flag("AUTH_REQUIRE_TOKEN", &flag)?;
        }

        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            config.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(flag) = lookup("RATE_LIMIT_ENABLED") {
            config.rate_limit.enabled = parse_flag("RATE_LIMIT_ENABLED", &flag)?;
        }
        if let Some(proxies) = lookup("TRUSTED_PROXIES") {
            config.rate_limit.trusted_proxies = proxies
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| parse_value("TRUSTED_PROXIES", p))
                .collect::<Result<_, _>>()?;
        }
        if let Some(rows) = lookup("CALLBOARD_MAX_ROWS") {
            config.limits.max_rows = parse_value("CALLBOARD_MAX_ROWS", &rows)?;
        }
        if let Some(secs) = lookup("REQUEST_TIMEOUT_SECS") {
            config.timeouts.default =
                Duration::from_secs(parse_value("REQUEST_TIMEOUT_SECS", &secs)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate rate limits
        if self.rate_limit.requests_per_second == 0 || self.rate_limit.writes_per_second == 0 {
            return Err(ConfigError::InvalidRateLimit(
                "per-second quotas cannot be 0".into(),
            ));
        }
        if self.rate_limit.burst_size == 0 {
            return Err(ConfigError::InvalidRateLimit("burst_size cannot be 0".into()));
        }

        // Validate limits
        if self.limits.max_request_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_request_size cannot be 0".into(),
            ));
        }
        if self.limits.max_rows == 0 {
            return Err(ConfigError::InvalidLimit("max_rows cannot be 0".into()));
        }

        // Validate timeouts
        if self.timeouts.default.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "default timeout cannot be 0".into(),
            ));
        }

        if self.auth.secret.is_empty() {
            return Err(ConfigError::Invalid("auth secret cannot be empty".into()));
        }
        if self.auth.token_ttl.is_zero() {
            return Err(ConfigError::InvalidTimeout("token ttl cannot be 0".into()));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }

    /// Rows returned by the listing endpoints, never more than 100.
    pub fn row_limit(&self) -> u32 {
        self.limits.max_rows.min(MAX_LISTING_ROWS)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 3001)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3001,
        }
    }
}

/// MySQL connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub database: String,
    /// Pool size
    pub max_connections: u32,
    /// How long a request waits for a pooled connection
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "callboard".to_string(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(3),
        }
    }
}

/// Per-IP token bucket rate limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests per second per IP (reads)
    pub requests_per_second: u32,
    /// Write requests per second per IP (login)
    pub writes_per_second: u32,
    /// Burst allowance (token bucket)
    pub burst_size: u32,
    /// Enable rate limiting
    pub enabled: bool,
    /// IPs exempt from rate limiting
    pub whitelist: Vec<IpAddr>,
    /// Reverse proxies whose `X-Forwarded-For` / `X-Real-IP` are believed;
    /// every other peer is limited by its socket address
    pub trusted_proxies: Vec<IpAddr>,
    /// How often idle buckets are evicted
    #[serde(with = "humantime_serde")]
    pub cleanup_interval: Duration,
    /// Buckets untouched for longer than this are evicted
    #[serde(with = "humantime_serde")]
    pub max_idle: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 50,
            writes_per_second: 5,
            burst_size: 100,
            enabled: true,
            whitelist: Vec::new(),
            trusted_proxies: Vec::new(),
            cleanup_interval: Duration::from_secs(60),
            max_idle: Duration::from_secs(300),
        }
    }
}

/// Request limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 64 KiB)
    pub max_request_size: usize,
    /// Rows returned by `/calls` and `/history`; clamped to 100
    pub max_rows: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 64 * 1024,
            max_rows: MAX_LISTING_ROWS,
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Timeout applied to every request
    #[serde(with = "humantime_serde")]
    pub default: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default: Duration::from_secs(30),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
            max_age: 86400, // 24 hours
        }
    }
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret used to sign session tokens
    #[serde(skip_serializing)]
    pub secret: String,
    /// `iss` claim written into and required from every token
    pub issuer: String,
    /// Token lifetime
    #[serde(with = "humantime_serde")]
    pub token_ttl: Duration,
    /// Require a bearer token on the call and history routes
    pub require_token: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: generate_secret(),
            issuer: "callboard".to_string(),
            token_ttl: Duration::from_secs(8 * 60 * 60),
            require_token: false,
        }
    }
}

/// TLS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Path to PEM certificate chain
    pub cert_path: PathBuf,
    /// Path to PEM private key
    pub key_path: PathBuf,
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Only one of the two TLS paths was set
    #[error("TLS_KEY_PATH and TLS_CERT_PATH must be set together")]
    IncompleteTls,
    /// Invalid rate limiting configuration
    #[error("invalid rate limit: {0}")]
    InvalidRateLimit(String),
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// An environment value failed to parse
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// 32 random bytes, hex encoded.
fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// Duration as `"30s"`, `"500ms"` or `"5m"`.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(|_| "invalid minutes")
        } else {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}

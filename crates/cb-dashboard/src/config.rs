//! Client configuration and API base URL resolution.

use std::time::Duration;

/// Port the gateway listens on behind the reverse proxy; stripped from
/// configured base URLs.
const PROXIED_PORT: &str = ":3001";

/// Base URL used by terminal clients when no override is set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Dashboard client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for every endpoint path; empty means same-origin
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(2),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load from the process environment.
    ///
    /// - `CALLBOARD_API_BASE_URL`: base URL override
    /// - `CALLBOARD_SERVED_OVER_HTTPS`: treat the dashboard as HTTPS-served
    pub fn from_env(fallback: &str) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), fallback)
    }

    /// Load from an arbitrary key lookup. `fallback` is used when the
    /// resolved base URL is empty.
    pub fn from_lookup<F>(lookup: F, fallback: &str) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let https = lookup("CALLBOARD_SERVED_OVER_HTTPS")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);
        let raw = lookup("CALLBOARD_API_BASE_URL");
        let resolved = resolve_base_url(raw.as_deref(), https);

        Self {
            base_url: if resolved.is_empty() {
                fallback.trim_end_matches('/').to_string()
            } else {
                resolved
            },
            ..Self::default()
        }
    }
}

/// Resolve the API base URL from an optional override.
///
/// Any `:3001` port segment is removed and `http://` becomes `https://`
/// when the dashboard itself is served over HTTPS. An absent or empty
/// override resolves to the empty string (same-origin).
pub fn resolve_base_url(raw: Option<&str>, served_over_https: bool) -> String {
    let mut url = raw.unwrap_or_default().trim().replacen(PROXIED_PORT, "", 1);
    if served_over_https {
        if let Some(rest) = url.strip_prefix("http://") {
            url = format!("https://{}", rest);
        }
    }
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_strips_gateway_port() {
        assert_eq!(
            resolve_base_url(Some("http://api.example.com:3001"), false),
            "http://api.example.com"
        );
    }

    #[test]
    fn test_upgrades_scheme_under_https() {
        assert_eq!(
            resolve_base_url(Some("http://api.example.com:3001"), true),
            "https://api.example.com"
        );
        assert_eq!(
            resolve_base_url(Some("https://api.example.com"), true),
            "https://api.example.com"
        );
    }

    #[test]
    fn test_empty_override_is_same_origin() {
        assert_eq!(resolve_base_url(None, true), "");
        assert_eq!(resolve_base_url(Some(""), false), "");
    }

    #[test]
    fn test_other_ports_untouched() {
        assert_eq!(
            resolve_base_url(Some("http://localhost:8080/"), false),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_from_lookup_uses_fallback() {
        let config = ClientConfig::from_lookup(|_| None, DEFAULT_BASE_URL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_from_lookup_override() {
        let vars: HashMap<&str, &str> = [
            ("CALLBOARD_API_BASE_URL", "http://calls.internal:3001"),
            ("CALLBOARD_SERVED_OVER_HTTPS", "true"),
        ]
        .into_iter()
        .collect();
        let config =
            ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()), DEFAULT_BASE_URL);
        assert_eq!(config.base_url, "https://calls.internal");
    }
}

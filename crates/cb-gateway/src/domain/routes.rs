//! Route registry.
//!
//! Public: reachable without a token (login, ping, health).
//! Protected: require a bearer token when `auth.require_token` is on.
//!
//! Write routes draw from the smaller per-IP write quota.

/// Route access tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteTier {
    /// No token ever required
    Public,
    /// Token required when token guarding is enabled
    Protected,
}

impl RouteTier {
    /// Check if tier requires a token under the given policy
    pub fn requires_token(&self, require_token: bool) -> bool {
        require_token && matches!(self, RouteTier::Protected)
    }
}

/// Route metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteInfo {
    /// HTTP method
    pub method: &'static str,
    /// Request path
    pub path: &'static str,
    /// Access tier
    pub tier: RouteTier,
    /// Counts against the write quota
    pub is_write: bool,
    /// Brief description
    pub description: &'static str,
}

impl RouteInfo {
    const fn new(
        method: &'static str,
        path: &'static str,
        tier: RouteTier,
        is_write: bool,
        description: &'static str,
    ) -> Self {
        Self {
            method,
            path,
            tier,
            is_write,
            description,
        }
    }
}

pub const LOGIN: &str = "/login";
pub const CALLS: &str = "/calls";
pub const HISTORY: &str = "/history";
pub const VERIFICATION_CALL: &str = "/call.php";
pub const CALLBACK: &str = "/callback.php";
pub const PING: &str = "/api/ping";
pub const HEALTH: &str = "/health";

/// Every route the gateway serves.
pub const ROUTES: &[RouteInfo] = &[
    RouteInfo::new("POST", LOGIN, RouteTier::Public, true, "Authenticate and receive a session token"),
    RouteInfo::new("GET", CALLS, RouteTier::Protected, false, "List up to 100 call log rows"),
    RouteInfo::new("GET", HISTORY, RouteTier::Protected, false, "List up to 100 recordings"),
    RouteInfo::new("POST", VERIFICATION_CALL, RouteTier::Protected, false, "Initiate a verification call"),
    RouteInfo::new("POST", CALLBACK, RouteTier::Protected, false, "Initiate a two-leg callback call"),
    RouteInfo::new("GET", PING, RouteTier::Public, false, "Liveness ping"),
    RouteInfo::new("GET", HEALTH, RouteTier::Public, false, "Health and version"),
];

/// Look up a route by path
pub fn get_route_info(path: &str) -> Option<&'static RouteInfo> {
    ROUTES.iter().find(|r| r.path == path)
}

/// Tier for a path; unknown paths are public so they fall through to 404
pub fn get_route_tier(path: &str) -> RouteTier {
    get_route_info(path).map(|r| r.tier).unwrap_or(RouteTier::Public)
}

/// Whether a path draws from the write quota
pub fn is_write_route(path: &str) -> bool {
    get_route_info(path).map(|r| r.is_write).unwrap_or(false)
}

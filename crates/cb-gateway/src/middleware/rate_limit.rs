//! Rate limiting middleware using the token bucket algorithm.
//!
//! Each client address gets a read bucket and a tighter login bucket; the
//! route registry decides which one a request draws from.
//!
//! The client address is the socket peer. Forwarded headers are honoured
//! only when that peer is a configured trusted proxy.

use crate::domain::config::RateLimitConfig;
use crate::domain::error::ApiError;
use crate::domain::routes::is_write_route;
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::{Layer, Service};
use tracing::{debug, warn};

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Which quota a request draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketKind {
    /// Listings, call initiation, ping, health
    Read,
    /// `POST /login`: the credential-guessing surface
    Login,
}

impl BucketKind {
    pub fn for_path(path: &str) -> Self {
        if is_write_route(path) {
            BucketKind::Login
        } else {
            BucketKind::Read
        }
    }
}

/// Both quotas of one client address.
struct ClientBuckets {
    read: DirectLimiter,
    login: DirectLimiter,
    last_seen: Instant,
}

impl ClientBuckets {
    fn new(config: &RateLimitConfig) -> Self {
        let read_rate = nonzero(config.requests_per_second, 50);
        let login_rate = nonzero(config.writes_per_second, 5);
        Self {
            read: RateLimiter::direct(
                Quota::per_second(read_rate).allow_burst(nonzero(config.burst_size, 100)),
            ),
            // Login never bursts past its own per-second rate
            login: RateLimiter::direct(Quota::per_second(login_rate)),
            last_seen: Instant::now(),
        }
    }

    fn take(&mut self, kind: BucketKind) -> Result<(), Duration> {
        self.last_seen = Instant::now();
        let limiter = match kind {
            BucketKind::Read => &self.read,
            BucketKind::Login => &self.login,
        };
        limiter
            .check()
            .map_err(|denied| denied.wait_time_from(DefaultClock::default().now()))
    }
}

fn nonzero(value: u32, fallback: u32) -> NonZeroU32 {
    NonZeroU32::new(value)
        .or_else(|| NonZeroU32::new(fallback))
        .unwrap_or(NonZeroU32::MIN)
}

/// Per-address buckets shared by every connection.
pub struct RateLimitState {
    clients: DashMap<IpAddr, ClientBuckets>,
    config: RateLimitConfig,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            clients: DashMap::new(),
            config,
        }
    }

    fn exempt(&self, ip: &IpAddr) -> bool {
        !self.config.enabled || self.config.whitelist.contains(ip)
    }

    /// Take one token for `ip`; on refusal, how long until the next one.
    pub fn admit(&self, ip: IpAddr, kind: BucketKind) -> Result<(), Duration> {
        if self.exempt(&ip) {
            return Ok(());
        }
        self.clients
            .entry(ip)
            .or_insert_with(|| {
                debug!(ip = %ip, "Tracking new client address");
                ClientBuckets::new(&self.config)
            })
            .take(kind)
    }

    /// Forget addresses not seen for `max_idle`. Returns how many went.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.clients.len();
        self.clients
            .retain(|_, buckets| buckets.last_seen.elapsed() <= max_idle);
        let evicted = before.saturating_sub(self.clients.len());
        if evicted > 0 {
            debug!(evicted, remaining = self.clients.len(), "Evicted idle rate limit buckets");
        }
        evicted
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    pub fn trusted_proxies(&self) -> &[IpAddr] {
        &self.config.trusted_proxies
    }
}

/// Rate limit layer
#[derive(Clone)]
pub struct RateLimitLayer {
    state: Arc<RateLimitState>,
}

impl RateLimitLayer {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            state: Arc::new(RateLimitState::new(config)),
        }
    }

    pub fn state(&self) -> Arc<RateLimitState> {
        Arc::clone(&self.state)
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            state: Arc::clone(&self.state),
        }
    }
}

/// Rate limit service
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    state: Arc<RateLimitState>,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let state = Arc::clone(&self.state);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let ip = extract_client_ip(&req, state.trusted_proxies());
            let kind = BucketKind::for_path(req.uri().path());

            if let Err(wait) = state.admit(ip, kind) {
                let retry_after = retry_after_secs(wait);
                warn!(ip = %ip, ?kind, retry_after, "Rate limit exceeded");
                return Ok(ApiError::rate_limited(retry_after).into_response());
            }
            inner.call(req).await
        })
    }
}

fn retry_after_secs(wait: Duration) -> u64 {
    (wait.as_millis() as u64).div_ceil(1000)
}

/// Client address for rate limiting.
///
/// The socket peer, or loopback when none is attached (e.g. `oneshot`
/// tests). When the peer is a trusted proxy, the first `X-Forwarded-For`
/// hop, then `X-Real-IP`, replace it.
pub fn extract_client_ip<B>(req: &Request<B>, trusted_proxies: &[IpAddr]) -> IpAddr {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    if !is_trusted_proxy(peer, trusted_proxies) {
        if req.headers().contains_key("x-forwarded-for") {
            debug!(peer = %peer, "Ignoring X-Forwarded-For from untrusted peer");
        }
        return peer;
    }

    header_ip(req, "x-forwarded-for")
        .or_else(|| header_ip(req, "x-real-ip"))
        .unwrap_or(peer)
}

pub fn is_trusted_proxy(peer: IpAddr, trusted_proxies: &[IpAddr]) -> bool {
    trusted_proxies.contains(&peer)
}

fn header_ip<B>(req: &Request<B>, name: &str) -> Option<IpAddr> {
    req.headers()
        .get(name)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Periodically evict idle buckets. Runs until aborted.
pub async fn cleanup_task(state: Arc<RateLimitState>, every: Duration, max_idle: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        state.evict_idle(max_idle);
    }
}

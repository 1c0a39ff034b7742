//! API Gateway service - main entry point.
//!
//! Wires the service handles into the router and serves HTTP, or HTTPS when
//! TLS paths are configured.

use crate::adapters::{InMemoryStore, LoggingTelephony};
use crate::domain::config::{GatewayConfig, TlsConfig};
use crate::domain::error::GatewayError;
use crate::domain::token::TokenIssuer;
use crate::middleware::{cleanup_task, RateLimitState};
use crate::ports::{CallStore, SystemTimeSource, TelephonyProvider, TimeSource, UserStore};
use crate::router::{build_router, AppState};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Grace period for in-flight HTTPS requests at shutdown
const TLS_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Collaborators the gateway is built from.
#[derive(Clone)]
pub struct GatewayServices {
    pub users: Arc<dyn UserStore>,
    pub calls: Arc<dyn CallStore>,
    pub telephony: Arc<dyn TelephonyProvider>,
    pub time: Arc<dyn TimeSource>,
}

impl GatewayServices {
    pub fn new(
        users: Arc<dyn UserStore>,
        calls: Arc<dyn CallStore>,
        telephony: Arc<dyn TelephonyProvider>,
    ) -> Self {
        Self {
            users,
            calls,
            telephony,
            time: Arc::new(SystemTimeSource),
        }
    }

    /// One in-memory store for users and calls, logging telephony.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self::new(store.clone(), store, Arc::new(LoggingTelephony))
    }

    pub fn with_telephony(mut self, telephony: Arc<dyn TelephonyProvider>) -> Self {
        self.telephony = telephony;
        self
    }

    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }
}

/// API Gateway service
pub struct CallboardGateway {
    config: GatewayConfig,
    router: Router,
    tokens: Arc<TokenIssuer>,
    rate_limit: Arc<RateLimitState>,
}

impl CallboardGateway {
    /// Create a new API Gateway service
    pub fn new(config: GatewayConfig, services: GatewayServices) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let tokens = Arc::new(TokenIssuer::new(
            &config.auth.secret,
            config.auth.issuer.clone(),
            config.auth.token_ttl,
            services.time,
        ));

        let state = AppState {
            users: services.users,
            calls: services.calls,
            telephony: services.telephony,
            tokens: Arc::clone(&tokens),
            row_limit: config.row_limit(),
        };
        let (router, rate_limit) = build_router(&config, state);

        Ok(Self {
            config,
            router,
            tokens,
            rate_limit,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The fully layered router, e.g. for `oneshot` tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn tokens(&self) -> Arc<TokenIssuer> {
        Arc::clone(&self.tokens)
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn start<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        match self.config.tls.clone() {
            Some(tls) => self.serve_tls(addr, tls, shutdown).await,
            None => {
                let listener = TcpListener::bind(addr)
                    .await
                    .map_err(|e| GatewayError::Bind(format!("{}: {}", addr, e)))?;
                self.serve(listener, shutdown).await
            }
        }
    }

    /// Serve plain HTTP on an already bound listener.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;
        info!(addr = %addr, tls = false, "Starting HTTP server");

        let cleanup = self.spawn_cleanup();
        let result = axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| GatewayError::Serve(e.to_string()));
        cleanup.abort();

        match &result {
            Ok(()) => info!("API Gateway stopped"),
            Err(e) => error!(error = %e, "HTTP server error"),
        }
        result
    }

    async fn serve_tls<F>(
        self,
        addr: SocketAddr,
        tls: TlsConfig,
        shutdown: F,
    ) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
            .await
            .map_err(|e| {
                GatewayError::Tls(format!(
                    "{} / {}: {}",
                    tls.cert_path.display(),
                    tls.key_path.display(),
                    e
                ))
            })?;

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            shutdown.await;
            shutdown_handle.graceful_shutdown(Some(TLS_SHUTDOWN_GRACE));
        });

        info!(addr = %addr, tls = true, "Starting HTTPS server");
        let cleanup = self.spawn_cleanup();
        let result = axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(
                self.router
                    .into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .map_err(|e| GatewayError::Serve(e.to_string()));
        cleanup.abort();

        match &result {
            Ok(()) => info!("API Gateway stopped"),
            Err(e) => error!(error = %e, "HTTPS server error"),
        }
        result
    }

    /// Start the idle rate-limit bucket eviction task
    fn spawn_cleanup(&self) -> JoinHandle<()> {
        let state = Arc::clone(&self.rate_limit);
        let interval = self.config.rate_limit.cleanup_interval;
        let max_idle = self.config.rate_limit.max_idle;
        tokio::spawn(cleanup_task(state, interval, max_idle))
    }
}

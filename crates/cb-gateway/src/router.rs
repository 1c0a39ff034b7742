use crate::domain::config::GatewayConfig;
use crate::domain::routes::{CALLBACK, CALLS, HEALTH, HISTORY, LOGIN, PING, VERIFICATION_CALL};
use crate::domain::token::TokenIssuer;
use crate::handlers;
use crate::middleware::{
    create_cors_layer, AuthLayer, RateLimitLayer, RateLimitState, TimeoutLayer, TracingLayer,
    ValidationLayer,
};
use crate::ports::{CallStore, TelephonyProvider, UserStore};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub calls: Arc<dyn CallStore>,
    pub telephony: Arc<dyn TelephonyProvider>,
    pub tokens: Arc<TokenIssuer>,
    /// Rows returned by the listing routes (already clamped)
    pub row_limit: u32,
}

/// Build the HTTP router with the full middleware stack.
///
/// Returns the rate limiter state as well so the caller can run its
/// cleanup task.
pub fn build_router(config: &GatewayConfig, state: AppState) -> (Router, Arc<RateLimitState>) {
    let rate_limit = RateLimitLayer::new(config.rate_limit.clone());
    let rate_limit_state = rate_limit.state();

    let middleware = ServiceBuilder::new()
        .layer(create_cors_layer(&config.cors))
        .layer(TracingLayer::new())
        .layer(TimeoutLayer::new(&config.timeouts))
        .layer(ValidationLayer::new(config.limits.clone()))
        .layer(rate_limit)
        .layer(AuthLayer::new(
            Arc::clone(&state.tokens),
            config.auth.require_token,
        ));

    let router = Router::new()
        .route(LOGIN, post(handlers::login))
        .route(CALLS, get(handlers::list_calls))
        .route(HISTORY, get(handlers::list_history))
        .route(VERIFICATION_CALL, post(handlers::verification_call))
        .route(CALLBACK, post(handlers::callback_call))
        .route(PING, get(handlers::ping))
        .route(HEALTH, get(handlers::health))
        .fallback(handlers::not_found)
        .layer(middleware)
        .with_state(state);

    (router, rate_limit_state)
}

//! Token guard middleware.
//!
//! When token guarding is on, protected routes need
//! `Authorization: Bearer <token>` carrying a token this gateway issued.
//! Verified claims are attached to the request extensions.

use crate::domain::routes::get_route_tier;
use crate::domain::token::TokenIssuer;
use crate::ApiError;
use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::{debug, warn};

/// Authentication layer
#[derive(Clone)]
pub struct AuthLayer {
    tokens: Arc<TokenIssuer>,
    require_token: bool,
}

impl AuthLayer {
    pub fn new(tokens: Arc<TokenIssuer>, require_token: bool) -> Self {
        Self {
            tokens,
            require_token,
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            tokens: Arc::clone(&self.tokens),
            require_token: self.require_token,
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    tokens: Arc<TokenIssuer>,
    require_token: bool,
}

impl<S> Service<Request<Body>> for AuthService<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let tokens = Arc::clone(&self.tokens);
        let require_token = self.require_token;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let path = req.uri().path().to_string();
            let tier = get_route_tier(&path);

            if tier.requires_token(require_token) {
                let Some(token) = bearer_token(&req) else {
                    warn!(path = %path, "Protected route called without a bearer token");
                    return Ok(ApiError::unauthorized("Missing bearer token").into_response());
                };

                match tokens.verify(token) {
                    Ok(claims) => {
                        debug!(path = %path, user = %claims.username, "Token accepted");
                        req.extensions_mut().insert(claims);
                    }
                    Err(e) => {
                        warn!(path = %path, error = %e, "Token rejected");
                        return Ok(ApiError::from(e).into_response());
                    }
                }
            }

            inner.call(req).await
        })
    }
}

/// Token from `Authorization: Bearer <token>`
pub fn bearer_token<B>(req: &Request<B>) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}

//! Request spans and completion logs.
//!
//! Every request runs inside an `api_request` span carrying `http.method`,
//! `http.target`, `route.tier` and, once answered, `otel.status_code`.
//! The dashboard polls the listings every few seconds, so successful
//! listing reads complete at `debug`; server errors complete at `warn`.

use crate::domain::routes::{get_route_info, RouteTier};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::{debug, info, info_span, warn, Instrument, Span};

#[derive(Clone, Default)]
pub struct TracingLayer;

impl TracingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService { inner }
    }
}

#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
}

fn tier_label(path: &str) -> &'static str {
    match get_route_info(path).map(|r| r.tier) {
        Some(RouteTier::Public) => "public",
        Some(RouteTier::Protected) => "protected",
        None => "unknown",
    }
}

/// How loudly to report a finished request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Loudness {
    Quiet,
    Normal,
    Loud,
}

fn loudness(method: &Method, status: StatusCode) -> Loudness {
    if status.is_server_error() {
        Loudness::Loud
    } else if *method == Method::GET && status.is_success() {
        Loudness::Quiet
    } else {
        Loudness::Normal
    }
}

impl<S> Service<Request<Body>> for TracingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();
        let method = req.method().clone();
        let path = req.uri().path();

        let span = info_span!(
            "api_request",
            http.method = %method,
            http.target = %path,
            route.tier = tier_label(path),
            otel.kind = "server",
            otel.status_code = tracing::field::Empty,
        );

        Box::pin(
            async move {
                let started = Instant::now();
                let result = inner.call(req).await;
                let latency_ms = started.elapsed().as_millis() as u64;

                let status = match &result {
                    Ok(response) => response.status(),
                    Err(_) => {
                        Span::current().record("otel.status_code", "ERROR");
                        return result;
                    }
                };

                let code = if status.is_success() { "OK" } else { "ERROR" };
                Span::current().record("otel.status_code", code);

                let level = loudness(&method, status);
                let status = status.as_u16();
                match level {
                    Loudness::Quiet => debug!(status, latency_ms, "Request completed"),
                    Loudness::Normal => info!(status, latency_ms, "Request completed"),
                    Loudness::Loud => warn!(status, latency_ms, "Request failed"),
                }
                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    #[test]
    fn test_tier_label() {
        assert_eq!(tier_label("/login"), "public");
        assert_eq!(tier_label("/history"), "protected");
        assert_eq!(tier_label("/eth_call"), "unknown");
    }

    #[test]
    fn test_polling_reads_are_quiet() {
        assert_eq!(loudness(&Method::GET, StatusCode::OK), Loudness::Quiet);
        assert_eq!(loudness(&Method::POST, StatusCode::OK), Loudness::Normal);
        assert_eq!(loudness(&Method::GET, StatusCode::NOT_FOUND), Loudness::Normal);
        assert_eq!(
            loudness(&Method::GET, StatusCode::INTERNAL_SERVER_ERROR),
            Loudness::Loud
        );
    }

    #[tokio::test]
    async fn test_response_passes_through_unchanged() {
        let svc = TracingLayer::new().layer(service_fn(|_req: Request<Body>| async {
            Ok::<_, Infallible>((StatusCode::UNAUTHORIZED, "no").into_response())
        }));

        let response = svc
            .oneshot(Request::get("/calls").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

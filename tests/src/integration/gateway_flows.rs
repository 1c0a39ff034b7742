//! # Gateway Flows
//!
//! Multi-step scenarios through the fully layered router, without a socket.
//! Each test drives one session from login to the guarded routes.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{seeded_store, test_config, PASSWORD, USERNAME};
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use cb_gateway::{
        CallboardGateway, GatewayConfig, GatewayServices, InMemoryStore, RecordingTelephony,
        TimeSource,
    };
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Clock the test can move forward.
    struct ManualClock(AtomicU64);

    impl ManualClock {
        fn at(secs: u64) -> Arc<Self> {
            Arc::new(Self(AtomicU64::new(secs)))
        }

        fn advance(&self, secs: u64) {
            self.0.fetch_add(secs, Ordering::SeqCst);
        }
    }

    impl TimeSource for ManualClock {
        fn now(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct Flow {
        router: Router,
        store: Arc<InMemoryStore>,
        telephony: Arc<RecordingTelephony>,
    }

    fn flow(config: GatewayConfig, clock: Arc<ManualClock>) -> Flow {
        let store = seeded_store();
        let telephony = Arc::new(RecordingTelephony::new());
        let services = GatewayServices::in_memory(store.clone())
            .with_telephony(telephony.clone())
            .with_time_source(clock);
        let gateway = CallboardGateway::new(config, services).unwrap();
        Flow {
            router: gateway.router(),
            store,
            telephony,
        }
    }

    fn guarded_config() -> GatewayConfig {
        let mut config = test_config();
        config.auth.require_token = true;
        config
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn login(router: &Router) -> String {
        let (status, body) = send(
            router,
            request(
                Method::POST,
                "/login",
                None,
                Some(json!({"username": USERNAME, "password": PASSWORD})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        body["token"].as_str().unwrap().to_string()
    }

    // =========================================================================
    // SESSION LIFECYCLE
    // =========================================================================

    #[tokio::test]
    async fn test_login_unlocks_guarded_routes() {
        let flow = flow(guarded_config(), ManualClock::at(1_700_000_000));

        let (status, _) = send(&flow.router, request(Method::GET, "/calls", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let token = login(&flow.router).await;
        let (status, calls) =
            send(&flow.router, request(Method::GET, "/calls", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(calls.as_array().unwrap().len(), 2);
        assert_eq!(calls[0]["clientName"], "Client 1");

        let (status, history) =
            send(&flow.router, request(Method::GET, "/history", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history[2]["status"], "failed");
    }

    #[tokio::test]
    async fn test_token_expires() {
        let clock = ManualClock::at(1_700_000_000);
        let config = guarded_config();
        let ttl = config.auth.token_ttl.as_secs();
        let flow = flow(config, clock.clone());

        let token = login(&flow.router).await;
        clock.advance(ttl - 1);
        let (status, _) =
            send(&flow.router, request(Method::GET, "/calls", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);

        clock.advance(2);
        let (status, body) =
            send(&flow.router, request(Method::GET, "/calls", Some(&token), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());

        let fresh = login(&flow.router).await;
        let (status, _) =
            send(&flow.router, request(Method::GET, "/calls", Some(&fresh), None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let flow = flow(guarded_config(), ManualClock::at(1_700_000_000));
        let token = login(&flow.router).await;
        let tampered = format!("{}00", token);

        let (status, _) =
            send(&flow.router, request(Method::GET, "/history", Some(&tampered), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_open_gateway_ignores_tokens() {
        let flow = flow(test_config(), ManualClock::at(1_700_000_000));
        let (status, _) =
            send(&flow.router, request(Method::GET, "/calls", Some("garbage"), None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    // =========================================================================
    // CALL INITIATION
    // =========================================================================

    #[tokio::test]
    async fn test_dispatch_both_call_kinds() {
        let flow = flow(guarded_config(), ManualClock::at(1_700_000_000));
        let token = login(&flow.router).await;

        let verification = json!({
            "phonenumber": "1234567890",
            "callerid": "1234456789",
            "calltype": "missedcall",
            "verificationcode": "123456",
            "ringtimeout": 60,
        });
        let (status, ack) = send(
            &flow.router,
            request(Method::POST, "/call.php", Some(&token), Some(verification)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack, json!({"message": "Success", "status": "Call Initiated."}));

        let callback = json!({
            "Fphonenumber": "0533177906",
            "Fcallerid": "0765989921",
            "Sphonenumber": "0527186026",
            "Scallerid": "0765989922",
        });
        let (status, _) = send(
            &flow.router,
            request(Method::POST, "/callback.php", Some(&token), Some(callback)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(flow.telephony.count(), 2);
    }

    #[tokio::test]
    async fn test_outage_mid_session() {
        let flow = flow(guarded_config(), ManualClock::at(1_700_000_000));
        let token = login(&flow.router).await;

        flow.store.set_unavailable(true);
        let (status, body) =
            send(&flow.router, request(Method::GET, "/history", Some(&token), None)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "DB error"}));

        // Call initiation never touches the store.
        let verification = json!({"phonenumber": "1", "callerid": "2", "calltype": "call"});
        let (status, _) = send(
            &flow.router,
            request(Method::POST, "/call.php", Some(&token), Some(verification)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

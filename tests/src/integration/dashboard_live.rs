//! # Dashboard Client Against a Running Gateway
//!
//! The gateway is served on an ephemeral loopback port and driven only
//! through `cb_dashboard`: login, live feeds, request probes, failures.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{
        anchor, seeded_store, test_config, LiveGateway, PASSWORD, USERNAME,
    };
    use cb_dashboard::{
        ActiveCallBoard, CallFeed, ClientConfig, ClientError, GatewayClient, GatewayFeed,
        HistoryFilter, ProbeClass, ProbeMethod, ProbeOutcome, ProbePreset, ProbeRequest,
        RequestLog, StatusFilter,
    };
    use chrono::Duration;
    use shared_types::{RecordingStatus, ACK_STATUS};

    fn client_for(gateway: &LiveGateway) -> GatewayClient {
        GatewayClient::new(&ClientConfig::new(gateway.base_url())).unwrap()
    }

    // =========================================================================
    // LOGIN AND FEEDS
    // =========================================================================

    #[tokio::test]
    async fn test_login_then_poll_live_feed() {
        let gateway = LiveGateway::spawn(test_config(), seeded_store()).await;
        let session = client_for(&gateway).login(USERNAME, PASSWORD).await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.user().username, USERNAME);
        assert_eq!(session.user().role, "operator");

        let feed = GatewayFeed::from_session(&session);
        assert_eq!(feed.describe(), format!("live {}", gateway.base_url()));

        let calls = feed.active_calls().await.unwrap();
        assert_eq!(calls.len(), 2);
        let board = ActiveCallBoard::with_calls(calls);
        board.tick(anchor());
        assert_eq!(board.stats().active, 1);
        assert_eq!(board.stats().waiting, 1);
        assert_eq!(board.calls()[0].duration, Some(60));

        let recordings = feed.recordings().await.unwrap();
        assert_eq!(recordings.len(), 3);
        assert_eq!(recordings[0].date, anchor() - Duration::days(1));

        let filter = HistoryFilter {
            status: StatusFilter::Only(RecordingStatus::Processing),
            ..HistoryFilter::default()
        };
        let shown = filter.apply(&recordings, &anchor());
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, "rec_2");
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let gateway = LiveGateway::spawn(test_config(), seeded_store()).await;
        let client = client_for(&gateway);

        let err = client.login(USERNAME, "nope").await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));

        let err = client.login("nobody", PASSWORD).await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));
    }

    #[tokio::test]
    async fn test_logout_returns_reusable_client() {
        let gateway = LiveGateway::spawn(test_config(), seeded_store()).await;
        let session = client_for(&gateway).login(USERNAME, PASSWORD).await.unwrap();

        let client = session.logout();
        assert_eq!(client.ping().await.unwrap().message, "pong");
        assert_eq!(client.health().await.unwrap().status, "ok");
    }

    #[tokio::test]
    async fn test_token_required_rejects_anonymous_feed() {
        let mut config = test_config();
        config.auth.require_token = true;
        let gateway = LiveGateway::spawn(config, seeded_store()).await;
        let client = client_for(&gateway);

        let anonymous = GatewayFeed::new(client.clone());
        let err = anonymous.active_calls().await.unwrap_err();
        assert_eq!(err.status(), Some(401));

        let session = client.login(USERNAME, PASSWORD).await.unwrap();
        let feed = GatewayFeed::from_session(&session);
        assert_eq!(feed.active_calls().await.unwrap().len(), 2);
        assert_eq!(feed.recordings().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_store_outage_reports_db_error() {
        let gateway = LiveGateway::spawn(test_config(), seeded_store()).await;
        let client = client_for(&gateway);
        gateway.store.set_unavailable(true);

        match client.list_calls(None).await.unwrap_err() {
            ClientError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("DB error"));
                assert!(!body.contains("unavailable"));
            }
            other => panic!("expected status error, got {:?}", other),
        }

        let err = client.login(USERNAME, PASSWORD).await.unwrap_err();
        assert_eq!(err.status(), Some(500));

        gateway.store.set_unavailable(false);
        assert_eq!(client.list_recordings(None).await.unwrap().len(), 3);
    }

    // =========================================================================
    // REQUEST PROBES
    // =========================================================================

    #[tokio::test]
    async fn test_presets_place_calls() {
        let gateway = LiveGateway::spawn(test_config(), seeded_store()).await;
        let session = client_for(&gateway).login(USERNAME, PASSWORD).await.unwrap();
        let mut log = RequestLog::new();

        for preset in ProbePreset::ALL {
            let outcome = session.probe(&preset.request()).await;
            assert_eq!(outcome.status, 200, "{}", preset.title());
            assert!(outcome.response.contains(ACK_STATUS));
            log.record(outcome);
        }

        assert_eq!(gateway.telephony.count(), ProbePreset::ALL.len());
        assert_eq!(log.len(), 3);
        assert!(log.entries().all(|e| e.class() == ProbeClass::Success));
        assert_eq!(log.get(0).unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_probe_with_missing_fields_is_client_error() {
        let gateway = LiveGateway::spawn(test_config(), seeded_store()).await;
        let client = client_for(&gateway);

        let request = ProbeRequest::new(ProbeMethod::Post, "/call.php")
            .with_body(r#"{"phonenumber": "0533177906"}"#);
        let outcome = client.probe(&request, None).await;

        assert_eq!(outcome.status, 400);
        assert!(outcome.response.contains("Missing required fields"));
        assert_eq!(gateway.telephony.count(), 0);

        let mut log = RequestLog::new();
        assert_eq!(log.record(outcome).class(), ProbeClass::ClientError);
    }

    #[tokio::test]
    async fn test_probe_unknown_route() {
        let gateway = LiveGateway::spawn(test_config(), seeded_store()).await;
        let outcome = client_for(&gateway)
            .probe(&ProbeRequest::new(ProbeMethod::Get, "/call-status.php"), None)
            .await;
        assert_eq!(outcome.status, 404);
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn test_probe_after_shutdown_is_network_error() {
        let gateway = LiveGateway::spawn(test_config(), seeded_store()).await;
        let client = client_for(&gateway);
        gateway.stop().await;

        let outcome: ProbeOutcome = client.probe(&ProbePreset::VerificationCall.request(), None).await;
        assert_eq!(outcome.status, 0);
        assert!(outcome.error.unwrap().starts_with("Network error"));
    }
}

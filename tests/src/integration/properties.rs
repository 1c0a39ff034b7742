//! # HTTP Contract Properties
//!
//! Randomized checks of the gateway contract:
//! - login succeeds exactly when the pair matches a stored user
//! - call initiation with any required field absent is a 400 and places
//!   nothing; with all present it always returns the fixed ack
//! - listings never exceed the row cap

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{call, seeded_store, test_config, PASSWORD, USERNAME};
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use cb_gateway::{CallboardGateway, GatewayServices, InMemoryStore, RecordingTelephony};
    use proptest::prelude::*;
    use serde_json::{Map, Value};
    use shared_types::{CallStatus, ACK_MESSAGE, ACK_STATUS};
    use std::sync::Arc;
    use tower::ServiceExt;

    const VERIFICATION_FIELDS: [&str; 3] = ["phonenumber", "callerid", "calltype"];
    const CALLBACK_FIELDS: [&str; 4] = ["Fphonenumber", "Fcallerid", "Sphonenumber", "Scallerid"];

    fn gateway(store: Arc<InMemoryStore>, telephony: Arc<RecordingTelephony>) -> CallboardGateway {
        let services = GatewayServices::in_memory(store).with_telephony(telephony);
        CallboardGateway::new(test_config(), services).unwrap()
    }

    fn post(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn send(gateway: &CallboardGateway, req: Request<Body>) -> (StatusCode, Value) {
        tokio_test::block_on(async {
            let response = gateway.router().oneshot(req).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
        })
    }

    /// Non-empty field values that the presence check accepts.
    fn present_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            "[0-9a-zA-Z]{1,12}".prop_map(Value::from),
            (1u32..10_000).prop_map(Value::from),
        ]
    }

    /// Values that count as absent.
    fn absent_value() -> impl Strategy<Value = Option<Value>> {
        prop_oneof![
            Just(None),
            Just(Some(Value::Null)),
            Just(Some(Value::from(""))),
            Just(Some(Value::from(0))),
        ]
    }

    fn body_with(fields: &[&str], present: &[Value], dropped: usize, filler: Option<Value>) -> Value {
        let mut map = Map::new();
        for (i, (field, value)) in fields.iter().zip(present).enumerate() {
            if i == dropped {
                if let Some(filler) = &filler {
                    map.insert(field.to_string(), filler.clone());
                }
            } else {
                map.insert(field.to_string(), value.clone());
            }
        }
        Value::Object(map)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_login_matches_exactly(username in "[a-z]{0,12}", password in "[a-z0-9]{0,12}") {
            let gateway = gateway(seeded_store(), Arc::new(RecordingTelephony::new()));
            let body = serde_json::json!({"username": username, "password": password});
            let (status, reply) = send(&gateway, post("/login", &body));

            if username == USERNAME && password == PASSWORD {
                prop_assert_eq!(status, StatusCode::OK);
                prop_assert_eq!(&reply["success"], &Value::Bool(true));
            } else {
                prop_assert_eq!(status, StatusCode::UNAUTHORIZED);
                prop_assert_eq!(reply, serde_json::json!({"success": false}));
            }
        }

        #[test]
        fn prop_verification_missing_field_places_nothing(
            present in prop::collection::vec(present_value(), 3),
            dropped in 0usize..3,
            filler in absent_value(),
        ) {
            let telephony = Arc::new(RecordingTelephony::new());
            let gateway = gateway(seeded_store(), telephony.clone());
            let body = body_with(&VERIFICATION_FIELDS, &present, dropped, filler);

            let (status, reply) = send(&gateway, post("/call.php", &body));
            prop_assert_eq!(status, StatusCode::BAD_REQUEST);
            prop_assert!(reply["error"].is_string());
            prop_assert_eq!(telephony.count(), 0);
        }

        #[test]
        fn prop_callback_missing_field_places_nothing(
            present in prop::collection::vec(present_value(), 4),
            dropped in 0usize..4,
            filler in absent_value(),
        ) {
            let telephony = Arc::new(RecordingTelephony::new());
            let gateway = gateway(seeded_store(), telephony.clone());
            let body = body_with(&CALLBACK_FIELDS, &present, dropped, filler);

            let (status, _) = send(&gateway, post("/callback.php", &body));
            prop_assert_eq!(status, StatusCode::BAD_REQUEST);
            prop_assert_eq!(telephony.count(), 0);
        }

        #[test]
        fn prop_complete_call_always_acked(present in prop::collection::vec(present_value(), 4)) {
            let telephony = Arc::new(RecordingTelephony::new());
            let gateway = gateway(seeded_store(), telephony.clone());
            // Index out of range: nothing dropped.
            let body = body_with(&CALLBACK_FIELDS, &present, usize::MAX, None);

            let (status, reply) = send(&gateway, post("/callback.php", &body));
            prop_assert_eq!(status, StatusCode::OK);
            prop_assert_eq!(reply["message"].as_str(), Some(ACK_MESSAGE));
            prop_assert_eq!(reply["status"].as_str(), Some(ACK_STATUS));
            prop_assert_eq!(telephony.count(), 1);
        }

        #[test]
        fn prop_listing_never_exceeds_cap(rows in 0usize..250) {
            let store = Arc::new(InMemoryStore::new());
            for i in 0..rows {
                store.add_call(call(i, CallStatus::Active));
            }
            let gateway = gateway(store, Arc::new(RecordingTelephony::new()));
            let req = Request::builder().uri("/calls").body(Body::empty()).unwrap();

            let (status, reply) = send(&gateway, req);
            prop_assert_eq!(status, StatusCode::OK);
            prop_assert_eq!(reply.as_array().map(Vec::len), Some(rows.min(100)));
        }
    }
}

//! Shared fixtures: seeded stores and a gateway bound to an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;

use cb_gateway::{
    CallboardGateway, GatewayConfig, GatewayServices, InMemoryStore, RecordingTelephony,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use shared_types::{Call, CallStatus, Recording, RecordingStatus, User};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const USERNAME: &str = "dispatcher";
pub const PASSWORD: &str = "s3cret";

/// Fixed reference instant for seeded data.
pub fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

pub fn user() -> User {
    User {
        id: "7".into(),
        username: USERNAME.into(),
        role: "operator".into(),
    }
}

pub fn call(i: usize, status: CallStatus) -> Call {
    Call {
        id: format!("call_{}", i),
        client_name: format!("Client {}", i),
        phone_number: format!("050-000-{:04}", i),
        client_caller_id: "0765989921".into(),
        driver_phone: format!("052-000-{:04}", i),
        driver_caller_id: "0765989922".into(),
        status,
        start_time: anchor() - Duration::minutes(i as i64),
        duration: None,
        company_id: format!("C{}", i % 2),
        driver_id: format!("DIV{}", i),
    }
}

pub fn recording(i: usize, status: RecordingStatus) -> Recording {
    Recording {
        id: format!("rec_{}", i),
        call_id: format!("call_{}", i),
        client_name: format!("Client {}", i),
        phone_number: format!("050-000-{:04}", i),
        client_caller_id: "0765989921".into(),
        driver_phone: format!("052-000-{:04}", i),
        driver_caller_id: "0765989922".into(),
        duration: 60 + i as u64,
        date: anchor() - Duration::days(i as i64),
        file_size: "1.0 MB".into(),
        status,
        company_id: format!("C{}", i % 2),
        driver_id: format!("DIV{}", i),
    }
}

/// Store with one user, two calls and three recordings.
pub fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.add_user(user(), PASSWORD);
    store.add_call(call(1, CallStatus::Active));
    store.add_call(call(2, CallStatus::Waiting));
    store.add_recording(recording(1, RecordingStatus::Available));
    store.add_recording(recording(2, RecordingStatus::Processing));
    store.add_recording(recording(3, RecordingStatus::Failed));
    store
}

/// Rate limiting off so tight test loops are never throttled.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.rate_limit.enabled = false;
    config
}

/// A gateway serving plain HTTP on 127.0.0.1 until dropped or stopped.
pub struct LiveGateway {
    pub addr: SocketAddr,
    pub store: Arc<InMemoryStore>,
    pub telephony: Arc<RecordingTelephony>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl LiveGateway {
    pub async fn spawn(config: GatewayConfig, store: Arc<InMemoryStore>) -> Self {
        let telephony = Arc::new(RecordingTelephony::new());
        let services = GatewayServices::in_memory(store.clone()).with_telephony(telephony.clone());
        let gateway = CallboardGateway::new(config, services).expect("valid test config");

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let _ = gateway
                .serve(listener, async {
                    let _ = rx.await;
                })
                .await;
        });

        Self {
            addr,
            store,
            telephony,
            shutdown: Some(tx),
            task,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Trigger graceful shutdown and wait for the server task.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.task).await;
    }
}

impl Drop for LiveGateway {
    fn drop(&mut self) {
        self.task.abort();
    }
}

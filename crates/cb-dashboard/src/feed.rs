//! Call feeds: where the dashboard gets its calls and recordings.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use shared_types::{Call, CallStatus, Recording, RecordingStatus};

use crate::client::GatewayClient;
use crate::error::ClientError;
use crate::session::Session;

/// Source of active calls and recordings.
#[async_trait]
pub trait CallFeed: Send + Sync {
    async fn active_calls(&self) -> Result<Vec<Call>, ClientError>;
    async fn recordings(&self) -> Result<Vec<Recording>, ClientError>;

    /// Short label for status lines.
    fn describe(&self) -> String;
}

/// Static demo data. Active call start times are relative to the anchor.
#[derive(Debug, Clone, Copy)]
pub struct MockFeed {
    anchor: DateTime<Utc>,
}

impl Default for MockFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFeed {
    pub fn new() -> Self {
        Self::anchored_at(Utc::now())
    }

    pub fn anchored_at(anchor: DateTime<Utc>) -> Self {
        Self { anchor }
    }

    pub fn call_list(&self) -> Vec<Call> {
        vec![
            mock_call(
                "1",
                "Sarah Cohen",
                ["050-123-4567", "0765989921", "052-987-1234", "0765989922"],
                CallStatus::Active,
                self.anchor - Duration::minutes(5),
                ["C123456789", "DIV12345678"],
            ),
            mock_call(
                "2",
                "Michael Levi",
                ["052-987-6543", "0765989923", "053-456-7890", "0765989924"],
                CallStatus::Waiting,
                self.anchor - Duration::minutes(2),
                ["C987654321", "DIV87654321"],
            ),
            mock_call(
                "3",
                "Lisa David",
                ["054-456-7890", "0765989925", "055-123-4567", "0765989926"],
                CallStatus::Active,
                self.anchor - Duration::minutes(3),
                ["C555666777", "DIV55566677"],
            ),
        ]
    }

    pub fn recording_list(&self) -> Vec<Recording> {
        vec![
            mock_recording(
                ["rec_1", "call_123"],
                "Sarah Cohen",
                ["050-123-4567", "0765989921", "052-987-1234", "0765989922"],
                180,
                fixed_date(2024, 1, 15, 10, 30),
                ("2.1 MB", RecordingStatus::Available),
                ["C123456789", "DIV12345678"],
            ),
            mock_recording(
                ["rec_2", "call_456"],
                "Michael Levi",
                ["052-987-6543", "0765989923", "053-456-7890", "0765989924"],
                95,
                fixed_date(2024, 1, 15, 9, 15),
                ("1.8 MB", RecordingStatus::Available),
                ["C987654321", "DIV87654321"],
            ),
            mock_recording(
                ["rec_3", "call_789"],
                "Lisa David",
                ["054-456-7890", "0765989925", "055-123-4567", "0765989926"],
                320,
                fixed_date(2024, 1, 14, 16, 45),
                ("3.2 MB", RecordingStatus::Processing),
                ["C555666777", "DIV55566677"],
            ),
            mock_recording(
                ["rec_4", "call_012"],
                "Robert Wilson",
                ["053-321-9876", "0765989927", "056-789-0123", "0765989928"],
                45,
                fixed_date(2024, 1, 14, 14, 20),
                ("0.9 MB", RecordingStatus::Available),
                ["C123456789", "DIV12345678"],
            ),
            mock_recording(
                ["rec_5", "call_345"],
                "Jennifer Lee",
                ["055-654-3210", "0765989929", "057-456-7890", "0765989930"],
                215,
                fixed_date(2024, 1, 13, 11, 30),
                ("2.8 MB", RecordingStatus::Failed),
                ["C987654321", "DIV87654321"],
            ),
        ]
    }
}

#[async_trait]
impl CallFeed for MockFeed {
    async fn active_calls(&self) -> Result<Vec<Call>, ClientError> {
        Ok(self.call_list())
    }

    async fn recordings(&self) -> Result<Vec<Recording>, ClientError> {
        Ok(self.recording_list())
    }

    fn describe(&self) -> String {
        "mock data".to_string()
    }
}

/// Polls `GET /calls` and `GET /history`.
#[derive(Debug, Clone)]
pub struct GatewayFeed {
    client: GatewayClient,
    token: Option<String>,
}

impl GatewayFeed {
    /// Unauthenticated feed; only works while the gateway does not require
    /// tokens.
    pub fn new(client: GatewayClient) -> Self {
        Self {
            client,
            token: None,
        }
    }

    pub fn from_session(session: &Session) -> Self {
        Self {
            client: session.client().clone(),
            token: Some(session.token().to_string()),
        }
    }
}

#[async_trait]
impl CallFeed for GatewayFeed {
    async fn active_calls(&self) -> Result<Vec<Call>, ClientError> {
        self.client.list_calls(self.token.as_deref()).await
    }

    async fn recordings(&self) -> Result<Vec<Recording>, ClientError> {
        self.client.list_recordings(self.token.as_deref()).await
    }

    fn describe(&self) -> String {
        format!("live {}", self.client.base_url())
    }
}

fn fixed_date(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

/// `phones` is client phone, client caller id, driver phone, driver caller id.
fn mock_call(
    id: &str,
    client_name: &str,
    phones: [&str; 4],
    status: CallStatus,
    start_time: DateTime<Utc>,
    [company_id, driver_id]: [&str; 2],
) -> Call {
    Call {
        id: id.to_string(),
        client_name: client_name.to_string(),
        phone_number: phones[0].to_string(),
        client_caller_id: phones[1].to_string(),
        driver_phone: phones[2].to_string(),
        driver_caller_id: phones[3].to_string(),
        status,
        start_time,
        duration: None,
        company_id: company_id.to_string(),
        driver_id: driver_id.to_string(),
    }
}

fn mock_recording(
    [id, call_id]: [&str; 2],
    client_name: &str,
    phones: [&str; 4],
    duration: u64,
    date: DateTime<Utc>,
    (file_size, status): (&str, RecordingStatus),
    [company_id, driver_id]: [&str; 2],
) -> Recording {
    Recording {
        id: id.to_string(),
        call_id: call_id.to_string(),
        client_name: client_name.to_string(),
        phone_number: phones[0].to_string(),
        client_caller_id: phones[1].to_string(),
        driver_phone: phones[2].to_string(),
        driver_caller_id: phones[3].to_string(),
        duration,
        date,
        file_size: file_size.to_string(),
        status,
        company_id: company_id.to_string(),
        driver_id: driver_id.to_string(),
    }
}

//! Outbound ports for the API Gateway.
//!
//! The gateway talks to three collaborators: the user store, the call log
//! store and the telephony provider. Each sits behind a trait so handlers
//! can be driven by in-memory adapters in tests.

use async_trait::async_trait;
use shared_types::{Call, CallbackCall, Credentials, Recording, User, VerificationCall};
use thiserror::Error;

/// Time source trait for testability
pub trait TimeSource: Send + Sync {
    /// Seconds since the Unix epoch
    fn now(&self) -> u64;
}

/// System time implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store unreachable or pool exhausted
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Query rejected by the store
    #[error("query failed: {0}")]
    Query(String),

    /// A row did not map onto the data model
    #[error("row decode failed: {0}")]
    Decode(String),
}

/// Telephony provider failures
#[derive(Debug, Error)]
pub enum TelephonyError {
    /// Provider refused the call request
    #[error("call rejected: {0}")]
    Rejected(String),

    /// Provider unreachable
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of the externally managed users table.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact username/password match; `None` when nothing matches.
    async fn find_user(&self, credentials: &Credentials) -> Result<Option<User>, StoreError>;
}

/// Call log and recording history.
#[async_trait]
pub trait CallStore: Send + Sync {
    /// At most `limit` calls in storage order.
    async fn list_calls(&self, limit: u32) -> Result<Vec<Call>, StoreError>;

    /// At most `limit` recordings in storage order.
    async fn list_recordings(&self, limit: u32) -> Result<Vec<Recording>, StoreError>;
}

/// Places outbound calls.
#[async_trait]
pub trait TelephonyProvider: Send + Sync {
    async fn place_verification_call(&self, call: &VerificationCall)
        -> Result<(), TelephonyError>;

    async fn place_callback(&self, call: &CallbackCall) -> Result<(), TelephonyError>;
}

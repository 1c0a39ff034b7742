//! Telephony provider adapters.
//!
//! No real provider is wired in: [`LoggingTelephony`] records the request in
//! the log and acknowledges it. [`RecordingTelephony`] keeps the requests in
//! memory so callers can assert on them.

use crate::ports::{TelephonyError, TelephonyProvider};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{CallbackCall, VerificationCall};
use tracing::info;

/// Logs each call request and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingTelephony;

#[async_trait]
impl TelephonyProvider for LoggingTelephony {
    async fn place_verification_call(
        &self,
        call: &VerificationCall,
    ) -> Result<(), TelephonyError> {
        info!(
            phone_number = %call.phone_number,
            caller_id = %call.caller_id,
            call_type = %call.call_type,
            has_code = call.verification_code.is_some(),
            ring_timeout = call.ring_timeout.as_deref().unwrap_or("-"),
            "Incoming verification call"
        );
        Ok(())
    }

    async fn place_callback(&self, call: &CallbackCall) -> Result<(), TelephonyError> {
        info!(
            first_phone = %call.first_phone,
            first_caller_id = %call.first_caller_id,
            second_phone = %call.second_phone,
            second_caller_id = %call.second_caller_id,
            company_id = call.company_id.as_deref().unwrap_or("-"),
            driver_id = call.driver_id.as_deref().unwrap_or("-"),
            "Incoming callback call"
        );
        Ok(())
    }
}

/// Placed call, as seen by [`RecordingTelephony`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacedCall {
    Verification(VerificationCall),
    Callback(CallbackCall),
}

/// Keeps every request it receives.
#[derive(Debug, Default)]
pub struct RecordingTelephony {
    placed: Mutex<Vec<PlacedCall>>,
}

impl RecordingTelephony {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placed(&self) -> Vec<PlacedCall> {
        self.placed.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.placed.lock().len()
    }
}

#[async_trait]
impl TelephonyProvider for RecordingTelephony {
    async fn place_verification_call(
        &self,
        call: &VerificationCall,
    ) -> Result<(), TelephonyError> {
        self.placed.lock().push(PlacedCall::Verification(call.clone()));
        Ok(())
    }

    async fn place_callback(&self, call: &CallbackCall) -> Result<(), TelephonyError> {
        self.placed.lock().push(PlacedCall::Callback(call.clone()));
        Ok(())
    }
}

//! # Core Domain Entities
//!
//! Users, calls and recordings as seen by the dashboard.
//!
//! Every `Call` and `Recording` carries exactly one `company_id` and one
//! `driver_id`. Referential integrity between them lives in the external
//! store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::StatusParseError;

/// An operator account, authenticated by exact username/password match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: String,
}

/// Lifecycle state of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Active,
    Waiting,
    Completed,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Active => "active",
            CallStatus::Waiting => "waiting",
            CallStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CallStatus::Active),
            "waiting" => Ok(CallStatus::Waiting),
            "completed" => Ok(CallStatus::Completed),
            other => Err(StatusParseError::new("call", other)),
        }
    }
}

/// Availability of a recording's audio file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingStatus {
    Available,
    Processing,
    Failed,
}

impl RecordingStatus {
    /// All statuses, in the order the history filter cycles through them.
    pub const ALL: [RecordingStatus; 3] = [
        RecordingStatus::Available,
        RecordingStatus::Processing,
        RecordingStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordingStatus::Available => "available",
            RecordingStatus::Processing => "processing",
            RecordingStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordingStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(RecordingStatus::Available),
            "processing" => Ok(RecordingStatus::Processing),
            "failed" => Ok(RecordingStatus::Failed),
            other => Err(StatusParseError::new("recording", other)),
        }
    }
}

/// A phone session between a client and a driver.
///
/// `duration` is whole seconds and is absent until someone measures it
/// (the store may leave it NULL for calls still ringing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: String,
    pub client_name: String,
    pub phone_number: String,
    pub client_caller_id: String,
    pub driver_phone: String,
    pub driver_caller_id: String,
    pub status: CallStatus,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    pub company_id: String,
    pub driver_id: String,
}

impl Call {
    /// Whole seconds elapsed between `start_time` and `now`, floored at zero.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        (now - self.start_time).num_seconds().max(0) as u64
    }
}

/// Metadata of a completed call's stored audio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    pub id: String,
    pub call_id: String,
    pub client_name: String,
    pub phone_number: String,
    pub client_caller_id: String,
    pub driver_phone: String,
    pub driver_caller_id: String,
    pub duration: u64,
    pub date: DateTime<Utc>,
    pub file_size: String,
    pub status: RecordingStatus,
    pub company_id: String,
    pub driver_id: String,
}

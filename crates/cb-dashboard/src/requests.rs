//! Request probe: ad-hoc gateway requests and their bounded log.
//!
//! Mirrors the "Requests" page of the dashboard: three canned forms
//! (telephone callback, verification call, free-form API request) whose
//! outcomes land newest-first in a log of at most [`MAX_LOG_ENTRIES`].

use chrono::Local;
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;

/// Maximum number of probe entries kept.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Endpoints offered by the free-form form.
pub const PROBE_ENDPOINTS: [&str; 5] = [
    "/callback.php",
    "/call.php",
    "/call-status.php",
    "/end-call.php",
    "/call-history.php",
];

const CALLBACK_BODY: &str = r#"{
  "Fphonenumber": "0533177906",
  "Fcallerid": "0765989921",
  "Sphonenumber": "0527186026",
  "Scallerid": "0765989922",
  "Companyid": "C123456789",
  "Driverid": "DIV12345678",
  "ringtimeout": "60"
}"#;

const VERIFICATION_BODY: &str = r#"{
  "phonenumber": "1234567890",
  "callerid": "1234456789",
  "calltype": "missedcall",
  "verificationcode": "123456",
  "ringtimeout": "60"
}"#;

/// HTTP method of a probe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl ProbeMethod {
    pub const ALL: [ProbeMethod; 4] = [
        ProbeMethod::Get,
        ProbeMethod::Post,
        ProbeMethod::Put,
        ProbeMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeMethod::Get => "GET",
            ProbeMethod::Post => "POST",
            ProbeMethod::Put => "PUT",
            ProbeMethod::Delete => "DELETE",
        }
    }

    /// Only POST and PUT carry the request body.
    pub fn sends_body(&self) -> bool {
        matches!(self, ProbeMethod::Post | ProbeMethod::Put)
    }

    pub fn next(&self) -> Self {
        match self {
            ProbeMethod::Get => ProbeMethod::Post,
            ProbeMethod::Post => ProbeMethod::Put,
            ProbeMethod::Put => ProbeMethod::Delete,
            ProbeMethod::Delete => ProbeMethod::Get,
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            ProbeMethod::Get => reqwest::Method::GET,
            ProbeMethod::Post => reqwest::Method::POST,
            ProbeMethod::Put => reqwest::Method::PUT,
            ProbeMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to send through the probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub method: ProbeMethod,
    /// Path relative to the API base URL
    pub endpoint: String,
    /// Raw JSON text, sent verbatim for POST and PUT
    pub body: Option<String>,
}

impl ProbeRequest {
    pub fn new(method: ProbeMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Body actually put on the wire.
    pub fn wire_body(&self) -> Option<&str> {
        if self.method.sends_body() {
            self.body.as_deref()
        } else {
            None
        }
    }
}

/// The canned request forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbePreset {
    TelephoneCallback,
    VerificationCall,
    FreeForm,
}

impl ProbePreset {
    pub const ALL: [ProbePreset; 3] = [
        ProbePreset::TelephoneCallback,
        ProbePreset::VerificationCall,
        ProbePreset::FreeForm,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ProbePreset::TelephoneCallback => "Telephone call",
            ProbePreset::VerificationCall => "Verification call",
            ProbePreset::FreeForm => "API request",
        }
    }

    /// The request the form submits with its default field values.
    pub fn request(&self) -> ProbeRequest {
        match self {
            ProbePreset::TelephoneCallback => {
                ProbeRequest::new(ProbeMethod::Post, "/callback.php").with_body(CALLBACK_BODY)
            }
            ProbePreset::VerificationCall => {
                ProbeRequest::new(ProbeMethod::Post, "/call.php").with_body(VERIFICATION_BODY)
            }
            ProbePreset::FreeForm => {
                ProbeRequest::new(ProbeMethod::Post, PROBE_ENDPOINTS[0]).with_body(CALLBACK_BODY)
            }
        }
    }
}

/// What came back from one probe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub method: ProbeMethod,
    /// Full URL the request was sent to
    pub endpoint: String,
    /// HTTP status, 0 on network failure
    pub status: u16,
    pub response: String,
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn answered(method: ProbeMethod, endpoint: String, status: u16, body: &str) -> Self {
        Self {
            method,
            endpoint,
            status,
            response: render_response(body),
            error: None,
        }
    }

    pub fn failed(method: ProbeMethod, endpoint: String, error: impl fmt::Display) -> Self {
        Self {
            method,
            endpoint,
            status: 0,
            response: String::new(),
            error: Some(format!("Network error: {}", error)),
        }
    }
}

/// Pretty-print a JSON response; anything else is kept as received.
pub fn render_response(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

/// Outcome class used to colour log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeClass {
    Success,
    ClientError,
    Failure,
}

/// A logged probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeEntry {
    pub id: u64,
    pub method: ProbeMethod,
    pub endpoint: String,
    pub status: u16,
    /// Local wall-clock time the entry was logged
    pub time: String,
    pub response: String,
    pub error: Option<String>,
}

impl ProbeEntry {
    pub fn class(&self) -> ProbeClass {
        match self.status {
            _ if self.error.is_some() => ProbeClass::Failure,
            200..=299 => ProbeClass::Success,
            400..=499 => ProbeClass::ClientError,
            _ => ProbeClass::Failure,
        }
    }
}

/// Bounded newest-first probe log.
#[derive(Debug, Clone)]
pub struct RequestLog {
    entries: VecDeque<ProbeEntry>,
    next_id: u64,
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            next_id: 1,
        }
    }

    /// Stamp an outcome with an id and the current local time and put it
    /// at the front, evicting the oldest entry past the bound.
    pub fn record(&mut self, outcome: ProbeOutcome) -> &ProbeEntry {
        let time = Local::now().format("%H:%M:%S").to_string();
        self.record_at(outcome, time)
    }

    pub fn record_at(&mut self, outcome: ProbeOutcome, time: String) -> &ProbeEntry {
        let entry = ProbeEntry {
            id: self.next_id,
            method: outcome.method,
            endpoint: outcome.endpoint,
            status: outcome.status,
            time,
            response: outcome.response,
            error: outcome.error,
        };
        self.next_id += 1;

        self.entries.push_front(entry);
        if self.entries.len() > MAX_LOG_ENTRIES {
            self.entries.pop_back();
        }
        &self.entries[0]
    }

    pub fn entries(&self) -> impl Iterator<Item = &ProbeEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ProbeEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

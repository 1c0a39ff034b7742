//! # HTTP Bodies
//!
//! Request and response bodies of the gateway endpoints.
//!
//! Call-initiation bodies are loosely typed on the wire: the dashboard sends
//! `"ringtimeout": "60"` while scripts send `60`. Both decode to text. A
//! field is *present* when it is a non-empty string or a non-zero number;
//! `null`, `""`, `0`, booleans and containers count as absent.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::entities::User;
use crate::errors::MissingFields;

/// Fixed acknowledgement message for call-initiation endpoints.
pub const ACK_MESSAGE: &str = "Success";
/// Fixed acknowledgement status for call-initiation endpoints.
pub const ACK_STATUS: &str = "Call Initiated.";

// =============================================================================
// LOGIN
// =============================================================================

/// `POST /login` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Username/password pair that passed presence validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Both fields must be present. Empty strings are present: they simply
    /// never match a stored user.
    pub fn validate(self) -> Result<Credentials, MissingFields> {
        match (self.username, self.password) {
            (Some(username), Some(password)) => Ok(Credentials { username, password }),
            (username, password) => {
                let mut fields = Vec::new();
                if username.is_none() {
                    fields.push("username");
                }
                if password.is_none() {
                    fields.push("password");
                }
                Err(MissingFields { fields })
            }
        }
    }
}

/// `POST /login` response: `{success:true, user, token}` or `{success:false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl LoginResponse {
    pub fn accepted(user: User, token: String) -> Self {
        Self {
            success: true,
            user: Some(user),
            token: Some(token),
        }
    }

    pub fn rejected() -> Self {
        Self {
            success: false,
            user: None,
            token: None,
        }
    }
}

// =============================================================================
// CALL INITIATION
// =============================================================================

/// `POST /call.php` body: a verification call or missed call delivering a
/// one-time code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCallRequest {
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub phonenumber: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub callerid: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub calltype: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub verificationcode: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub ringtimeout: Option<String>,
}

/// A verification call request with its required fields present.
///
/// Only presence is checked: phone format, call type and timeout bounds are
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCall {
    pub phone_number: String,
    pub caller_id: String,
    pub call_type: String,
    pub verification_code: Option<String>,
    pub ring_timeout: Option<String>,
}

impl VerificationCallRequest {
    pub fn validate(self) -> Result<VerificationCall, MissingFields> {
        let mut missing = Vec::new();
        check_present(&self.phonenumber, "phonenumber", &mut missing);
        check_present(&self.callerid, "callerid", &mut missing);
        check_present(&self.calltype, "calltype", &mut missing);

        match (self.phonenumber, self.callerid, self.calltype) {
            (Some(phone_number), Some(caller_id), Some(call_type)) => Ok(VerificationCall {
                phone_number,
                caller_id,
                call_type,
                verification_code: self.verificationcode,
                ring_timeout: self.ringtimeout,
            }),
            _ => Err(MissingFields { fields: missing }),
        }
    }
}

/// `POST /callback.php` body: a two-leg call bridging a client and a driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackRequest {
    #[serde(rename = "Fphonenumber", default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub first_phone: Option<String>,
    #[serde(rename = "Fcallerid", default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub first_caller_id: Option<String>,
    #[serde(rename = "Sphonenumber", default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub second_phone: Option<String>,
    #[serde(rename = "Scallerid", default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub second_caller_id: Option<String>,
    #[serde(rename = "Companyid", default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(rename = "Driverid", default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    #[serde(rename = "ringtimeout", default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub ring_timeout: Option<String>,
}

/// A callback request with both legs present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackCall {
    pub first_phone: String,
    pub first_caller_id: String,
    pub second_phone: String,
    pub second_caller_id: String,
    pub company_id: Option<String>,
    pub driver_id: Option<String>,
    pub ring_timeout: Option<String>,
}

impl CallbackRequest {
    pub fn validate(self) -> Result<CallbackCall, MissingFields> {
        let mut missing = Vec::new();
        check_present(&self.first_phone, "Fphonenumber", &mut missing);
        check_present(&self.first_caller_id, "Fcallerid", &mut missing);
        check_present(&self.second_phone, "Sphonenumber", &mut missing);
        check_present(&self.second_caller_id, "Scallerid", &mut missing);

        match (
            self.first_phone,
            self.first_caller_id,
            self.second_phone,
            self.second_caller_id,
        ) {
            (Some(first_phone), Some(first_caller_id), Some(second_phone), Some(second_caller_id)) => {
                Ok(CallbackCall {
                    first_phone,
                    first_caller_id,
                    second_phone,
                    second_caller_id,
                    company_id: self.company_id,
                    driver_id: self.driver_id,
                    ring_timeout: self.ring_timeout,
                })
            }
            _ => Err(MissingFields { fields: missing }),
        }
    }
}

/// Acknowledgement returned by call-initiation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallAck {
    pub message: String,
    pub status: String,
}

impl CallAck {
    /// `{"message":"Success","status":"Call Initiated."}`
    pub fn initiated() -> Self {
        Self {
            message: ACK_MESSAGE.to_string(),
            status: ACK_STATUS.to_string(),
        }
    }

    pub fn is_initiated(&self) -> bool {
        self.message == ACK_MESSAGE && self.status == ACK_STATUS
    }
}

// =============================================================================
// MISC
// =============================================================================

/// Error body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `GET /api/ping` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

/// `GET /health` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

fn check_present(value: &Option<String>, name: &'static str, missing: &mut Vec<&'static str>) {
    if value.is_none() {
        missing.push(name);
    }
}

/// Normalise a loosely typed JSON value to text, or `None` when it counts
/// as absent.
pub fn present_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => {
            let zero = n.as_f64().map(|f| f == 0.0).unwrap_or(false);
            if zero {
                None
            } else {
                Some(n.to_string())
            }
        }
        _ => None,
    }
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(present_text))
}

//! API guide catalog.
//!
//! Static examples of the telephony API as shown on the dashboard's guide
//! page, with the configured base URL prefixed for display and `curl`.

use crate::requests::ProbeMethod;

/// One documented endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiExample {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub method: ProbeMethod,
    /// Path, possibly with a query string
    pub endpoint: &'static str,
    pub request_body: Option<&'static str>,
    pub response_example: &'static str,
}

pub static API_EXAMPLES: [ApiExample; 5] = [
    ApiExample {
        id: "telephone-callback",
        title: "Create a phone call",
        description: "Bridge a call between two phone numbers with advanced parameters",
        method: ProbeMethod::Post,
        endpoint: "/callback.php",
        request_body: Some(
            r#"{
  "Fphonenumber": "0533177906",
  "Fcallerid": "0765989921",
  "Sphonenumber": "0527186026",
  "Scallerid": "0765989922",
  "Companyid": "C123456789",
  "Driverid": "DIV12345678",
  "ringtimeout": "60"
}"#,
        ),
        response_example: r#"{
  "message": "Success",
  "status": "Call Initiated."
}"#,
    },
    ApiExample {
        id: "verification-call",
        title: "Verification call and code",
        description: "Deliver a verification code by voice call or missed call",
        method: ProbeMethod::Post,
        endpoint: "/call.php",
        request_body: Some(
            r#"{
  "phonenumber": "1234567890",
  "callerid": "1234456789",
  "calltype": "missedcall",
  "verificationcode": "123456",
  "ringtimeout": "60"
}"#,
        ),
        response_example: r#"{
  "message": "Success",
  "status": "Call Initiated."
}"#,
    },
    ApiExample {
        id: "get-call-status",
        title: "Check call status",
        description: "Fetch the state of an existing call by id",
        method: ProbeMethod::Get,
        endpoint: "/call-status.php?call_id=call_789123456",
        request_body: None,
        response_example: r#"{
  "message": "Success",
  "status": "Call Active",
  "data": {
    "call_id": "call_789123456",
    "duration": 120,
    "first_phone_status": "connected",
    "second_phone_status": "connected"
  }
}"#,
    },
    ApiExample {
        id: "end-call",
        title: "End call",
        description: "Terminate an active call",
        method: ProbeMethod::Post,
        endpoint: "/end-call.php",
        request_body: Some(
            r#"{
  "call_id": "call_789123456",
  "reason": "user_request"
}"#,
        ),
        response_example: r#"{
  "message": "Success",
  "status": "Call Ended."
}"#,
    },
    ApiExample {
        id: "get-call-history",
        title: "Call history",
        description: "Fetch call history with filters",
        method: ProbeMethod::Get,
        endpoint: "/call-history.php?company_id=C123456789&date_from=2024-01-01",
        request_body: None,
        response_example: r#"{
  "message": "Success",
  "status": "Data Retrieved.",
  "data": [
    {
      "call_id": "call_789123456",
      "first_phone": "0533177906",
      "second_phone": "0527186026",
      "company_id": "C123456789",
      "driver_id": "DIV12345678",
      "duration": 180,
      "start_time": "2024-01-15T10:30:00Z",
      "end_time": "2024-01-15T10:33:00Z"
    }
  ]
}"#,
    },
];

/// The guide bound to a base URL.
#[derive(Debug, Clone)]
pub struct ApiGuide {
    base_url: String,
}

impl ApiGuide {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn examples(&self) -> &'static [ApiExample] {
        &API_EXAMPLES
    }

    pub fn find(&self, id: &str) -> Option<&'static ApiExample> {
        API_EXAMPLES.iter().find(|e| e.id == id)
    }

    pub fn url(&self, example: &ApiExample) -> String {
        format!("{}{}", self.base_url, example.endpoint)
    }

    /// Ready-to-paste `curl` invocation.
    pub fn curl(&self, example: &ApiExample) -> String {
        let mut cmd = format!("curl --location '{}'", self.url(example));
        if example.method != ProbeMethod::Get {
            cmd.push_str(&format!(" \\\n--request {}", example.method));
        }
        cmd.push_str(" \\\n--header 'Content-Type: application/json'");
        if let Some(body) = example.request_body {
            cmd.push_str(&format!(" \\\n--data '{}'", body));
        }
        cmd
    }
}

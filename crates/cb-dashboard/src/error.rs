//! Client error type.

use thiserror::Error;

/// Errors that can occur when talking to the gateway.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Login rejected")]
    Unauthorized,
}

impl ClientError {
    /// Status code carried by the error, if the gateway answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Unauthorized => Some(401),
            ClientError::Decode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ClientError::Status {
            status: 500,
            body: r#"{"error":"DB error"}"#.into(),
        };
        assert_eq!(err.to_string(), r#"Gateway returned 500: {"error":"DB error"}"#);
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_decode_has_no_status() {
        assert_eq!(ClientError::Decode("eof".into()).status(), None);
        assert_eq!(ClientError::Unauthorized.status(), Some(401));
    }
}

//! # Error Types
//!
//! Errors raised while decoding shared types.

use thiserror::Error;

/// A status string that is not part of the known enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} status: {value}")]
pub struct StatusParseError {
    pub kind: &'static str,
    pub value: String,
}

impl StatusParseError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A request body that lacks one or more required fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required fields")]
pub struct MissingFields {
    /// Wire names of the absent fields, in declaration order.
    pub fields: Vec<&'static str>,
}

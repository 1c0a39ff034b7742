//! Error conversions from infrastructure types.
//!
//! Port failures are logged here with their details; clients only ever see
//! the generic message.

use crate::domain::ApiError;
use crate::domain::TokenError;
use crate::ports::{StoreError, TelephonyError};
use tracing::error;

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        error!(error = %e, "Store operation failed");
        ApiError::database()
    }
}

impl From<TelephonyError> for ApiError {
    fn from(e: TelephonyError) -> Self {
        error!(error = %e, "Telephony provider failed");
        ApiError::internal("Telephony error")
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Encode(details) => {
                error!(error = %details, "Token signing failed");
                ApiError::internal("Token error")
            }
            other => ApiError::unauthorized(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(e.to_string())
            }
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_) => StoreError::Decode(e.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

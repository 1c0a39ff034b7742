//! Adapters for the API Gateway.
//!
//! Infrastructure implementations of the outbound ports.

mod error_conversions;
pub mod memory;
pub mod mysql;
pub mod telephony;

pub use memory::InMemoryStore;
pub use mysql::MySqlStore;
pub use telephony::{LoggingTelephony, PlacedCall, RecordingTelephony};

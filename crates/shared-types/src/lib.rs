//! # Shared Types Crate
//!
//! This crate contains the call-center data model and the JSON bodies
//! exchanged between the gateway and the dashboard.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the wire format (camelCase fields, RFC 3339
//!   timestamps, lowercase statuses) is defined once, here.
//! - **Read-only identities**: `User` rows are owned by an external store;
//!   nothing in this workspace creates or mutates them.
//! - **Tagged results at the boundary**: request bodies are decoded into
//!   typed structs and checked by `validate()`, never inspected ad hoc.

pub mod api;
pub mod entities;
pub mod errors;

pub use api::*;
pub use entities::*;
pub use errors::*;

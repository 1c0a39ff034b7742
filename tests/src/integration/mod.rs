//! Cross-crate integration tests.

pub mod fixtures;

mod dashboard_live;
mod gateway_flows;
mod properties;

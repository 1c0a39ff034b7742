//! # Callboard Test Suite
//!
//! Unified test crate: end-to-end flows across the gateway and the
//! dashboard client, plus property checks on the HTTP contract.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs        # Seeded stores, live gateway on 127.0.0.1:0
//!     ├── gateway_flows.rs   # Router flows across handlers and layers
//!     ├── dashboard_live.rs  # Dashboard client against a running gateway
//!     └── properties.rs      # Property checks on the HTTP contract
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p cb-tests
//!
//! # By category
//! cargo test -p cb-tests integration::dashboard_live::
//! cargo test -p cb-tests integration::properties::
//! ```

#![allow(dead_code)]

pub mod integration;

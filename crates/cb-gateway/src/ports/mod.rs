//! Ports (hexagonal boundaries) of the gateway.

pub mod outbound;

pub use outbound::{
    CallStore, StoreError, SystemTimeSource, TelephonyError, TelephonyProvider, TimeSource,
    UserStore,
};

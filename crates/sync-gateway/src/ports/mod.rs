//! Ports consumed by the gateway.

pub mod snapshot;

pub use snapshot::SnapshotProvider;

//! # Transfer-Sync Test Suite
//!
//! Unified test crate for cross-crate scenarios: events published on the
//! bus flowing through the coordinator and broadcaster to observers.
//!
//! ```text
//! tests/src/
//! └── integration/      # Bus + gateway choreography
//!     └── sync_flow.rs
//! ```
//!
//! Run with `cargo test -p sync-tests`.

#![allow(dead_code)]

pub mod integration;

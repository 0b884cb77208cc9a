//! Cross-crate integration scenarios.

pub mod sync_flow;

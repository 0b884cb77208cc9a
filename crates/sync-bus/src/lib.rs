//! # Sync Bus - Event Bus for Transfer Lifecycle Events
//!
//! In-process publish/subscribe registry decoupling transfer producers from
//! consumers by event kind.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Producer    │                    │  Consumer    │
//! │ (transfer    │    publish()       │ (sync        │
//! │  workers)    │ ──────┐            │  coordinator)│
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Contract
//!
//! - Subscriptions are keyed by (subscriber name, event kind); registering
//!   the same key again replaces the previous handler.
//! - `publish` dispatches to the handlers current at dispatch time and
//!   never fails: handler errors are caught, logged, and swallowed at the
//!   bus boundary so one consumer can never stall or abort a producer.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod registry;

// Re-export main types
pub use events::{TransferEvent, TransferEventKind};
pub use registry::{EventBus, EventHandler, HandlerError};

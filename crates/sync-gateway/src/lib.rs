//! Sync Gateway - broadcast gateway for transfer state synchronization.
//!
//! Seeds every newly connected observer with a full snapshot and fans out
//! translated transfer events to all connected observers.
//!
//! # Architecture
//!
//! ```text
//! producer ──publish──▶ EventBus ──▶ TransferEventHandler ──▶ Broadcaster
//!                                        (translate,            │ try_send
//!                                         CREATE/UPDATE)        ▼
//!                                                      per-observer queue
//!                                                               │ writer task
//!                                                               ▼
//!                                                           WebSocket
//!
//! on connect:  observer ──▶ Broadcaster ──▶ SnapshotProvider ──▶ LIST
//! ```
//!
//! # Ordering guarantee
//!
//! The LIST snapshot is the first message an observer ever processes:
//! the snapshot is captured and enqueued before the observer joins the
//! broadcast set. An event published in the window between capture and
//! registration may be missed once; every broadcast carries full current
//! state, so the next event for that transfer repairs the view.

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod handlers;
pub mod ports;
pub mod service;
pub mod ws;

pub use domain::{ConfigError, GatewayError, SyncConfig, TransferDto, WireMessage};
pub use handlers::TransferEventHandler;
pub use ports::SnapshotProvider;
pub use service::SyncService;
pub use ws::{Broadcaster, ObserverId};

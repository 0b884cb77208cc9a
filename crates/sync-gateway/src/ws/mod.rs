//! WebSocket module: observer registry and transport adapter.
//!
//! The [`Broadcaster`] owns the set of connected observers and enforces
//! the snapshot-then-register ordering contract; [`handler`] adapts an
//! axum WebSocket into an observer session.

pub mod broadcaster;
pub mod handler;

pub use broadcaster::{Broadcaster, ObserverId};
pub use handler::WebSocketHandler;

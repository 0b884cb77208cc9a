//! Event bus consumers owned by the gateway.

pub mod transfer_events;

pub use transfer_events::TransferEventHandler;

//! Domain types for the broadcast gateway.
//!
//! Contains the wire DTO and translator, configuration, and error handling.

pub mod config;
pub mod dto;
pub mod error;

// Re-exports for convenience
pub use config::{ConfigError, SyncConfig};
pub use dto::{TransferDto, WireMessage};
pub use error::GatewayError;

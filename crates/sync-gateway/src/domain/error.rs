//! Gateway error types.

use crate::domain::config::ConfigError;

/// Fatal gateway errors.
///
/// These only occur at startup; without a working gateway no observer can
/// ever receive state, so construction failures are not recoverable.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The WebSocket listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    /// The server terminated unexpectedly.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

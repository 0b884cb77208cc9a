//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// WebSocket server configuration
    pub websocket: WebSocketConfig,
    /// Outbound message queue depth per observer.
    ///
    /// A full queue drops messages for that observer only; full-state
    /// UPDATEs repair its view on the next event.
    pub observer_queue_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            websocket: WebSocketConfig::default(),
            observer_queue_capacity: 256,
        }
    }
}

impl SyncConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.observer_queue_capacity == 0 {
            return Err(ConfigError::InvalidLimit(
                "observer_queue_capacity cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

/// WebSocket server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Bind address
    pub host: IpAddr,
    /// Bind port
    pub port: u16,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5031,
        }
    }
}

impl WebSocketConfig {
    /// The socket address to bind.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Configuration validation error
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
}

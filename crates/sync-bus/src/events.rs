//! # Transfer Events
//!
//! Defines the event types that flow through the sync bus. Each event
//! carries a full [`Transfer`] snapshot valid at publish time; events are
//! immutable once published.

use serde::{Deserialize, Serialize};
use std::fmt;
use transfer_types::Transfer;

/// All events that can be published to the event bus.
///
/// Every variant carries the complete transfer state as of publish time,
/// never a delta. This is what lets downstream consumers self-heal a
/// missed message: the next event for the same transfer fully replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TransferEvent {
    /// A transfer was accepted by the remote peer and left the queue.
    Started(Transfer),

    /// Bytes moved; periodic progress tick.
    Progress(Transfer),

    /// A transfer finished successfully.
    Completed(Transfer),

    /// A transfer was cancelled locally or remotely.
    Cancelled(Transfer),

    /// A transfer failed.
    Errored {
        /// Snapshot at the moment of failure.
        transfer: Transfer,
        /// Message describing the failure.
        message: String,
    },
}

impl TransferEvent {
    /// The kind of this event, used as the dispatch key.
    #[must_use]
    pub fn kind(&self) -> TransferEventKind {
        match self {
            Self::Started(_) => TransferEventKind::Started,
            Self::Progress(_) => TransferEventKind::Progress,
            Self::Completed(_) => TransferEventKind::Completed,
            Self::Cancelled(_) => TransferEventKind::Cancelled,
            Self::Errored { .. } => TransferEventKind::Errored,
        }
    }

    /// The transfer snapshot carried by this event.
    #[must_use]
    pub fn transfer(&self) -> &Transfer {
        match self {
            Self::Started(t)
            | Self::Progress(t)
            | Self::Completed(t)
            | Self::Cancelled(t) => t,
            Self::Errored { transfer, .. } => transfer,
        }
    }
}

/// Statically-typed dispatch key for [`TransferEvent`] variants.
///
/// Using an enumeration instead of a string topic eliminates key-collision
/// and wrong-type-dispatch risks in the subscription registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferEventKind {
    Started,
    Progress,
    Completed,
    Cancelled,
    Errored,
}

impl TransferEventKind {
    /// Every event kind, in a fixed order. Used by consumers that
    /// subscribe to the full lifecycle.
    pub const ALL: [Self; 5] = [
        Self::Started,
        Self::Progress,
        Self::Completed,
        Self::Cancelled,
        Self::Errored,
    ];
}

impl fmt::Display for TransferEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Started => "Started",
            Self::Progress => "Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Errored => "Errored",
        };
        f.write_str(name)
    }
}

//! # Transfer Entity
//!
//! The `Transfer` snapshot and its lifecycle enumerations, plus the
//! derived-field arithmetic (percent complete, bytes remaining, elapsed
//! and estimated remaining durations).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a transfer relative to this node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferDirection {
    /// A remote user is fetching a file from this node.
    Upload,
    /// This node is fetching a file from a remote user.
    Download,
}

/// Lifecycle state of a transfer.
///
/// Completed, Cancelled and Errored are terminal; once a transfer reaches
/// one of them no further mutation is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferState {
    /// Waiting for a remote queue slot.
    Queued,
    /// Accepted by the remote peer, no bytes moved yet.
    Started,
    /// Bytes are actively moving.
    InProgress,
    /// All bytes transferred.
    Completed,
    /// Cancelled locally or remotely.
    Cancelled,
    /// Failed with an error.
    Errored,
}

impl TransferState {
    /// Whether this state permits no further transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Errored)
    }
}

/// An immutable snapshot of a single transfer.
///
/// Identity is the (`username`, `filename`) pair. All other fields describe
/// the transfer as of the moment the snapshot was taken; producers publish
/// a fresh snapshot with every lifecycle event rather than mutating a
/// shared record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    /// Remote user on the other end of the transfer.
    pub username: String,
    /// Remote path of the file being transferred.
    pub filename: String,
    /// Total size of the file, in bytes.
    pub size: u64,
    /// Upload or download, relative to this node.
    pub direction: TransferDirection,
    /// Current lifecycle state.
    pub state: TransferState,
    /// Byte offset the transfer resumed from.
    pub start_offset: u64,
    /// Bytes moved so far. Invariant: `start_offset <= bytes_transferred <= size`.
    pub bytes_transferred: u64,
    /// Average throughput in bytes per second.
    pub average_speed: f64,
    /// When the transfer left the queue, if it has.
    pub started_at: Option<DateTime<Utc>>,
    /// When the transfer reached a terminal state, if it has.
    pub ended_at: Option<DateTime<Utc>>,
    /// Position in the remote queue, while queued.
    pub place_in_queue: Option<u32>,
    /// Message of the error that terminated the transfer, if any.
    pub exception: Option<String>,
}

impl Transfer {
    /// Create a queued transfer with no progress.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        filename: impl Into<String>,
        size: u64,
        direction: TransferDirection,
    ) -> Self {
        Self {
            username: username.into(),
            filename: filename.into(),
            size,
            direction,
            state: TransferState::Queued,
            start_offset: 0,
            bytes_transferred: 0,
            average_speed: 0.0,
            started_at: None,
            ended_at: None,
            place_in_queue: None,
            exception: None,
        }
    }

    /// Percentage of the file transferred, in `[0, 100]`.
    ///
    /// A zero-size file reports 0, not a division error.
    #[must_use]
    pub fn percent_complete(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        100.0 * self.bytes_transferred as f64 / self.size as f64
    }

    /// Bytes still to be transferred. Saturates at zero.
    #[must_use]
    pub fn bytes_remaining(&self) -> u64 {
        self.size.saturating_sub(self.bytes_transferred)
    }

    /// Wall-clock time the transfer has been active.
    ///
    /// `None` until the transfer has started. For a live transfer this is
    /// measured against the current time; for an ended one, against
    /// `ended_at`.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        let started = self.started_at?;
        let end = self.ended_at.unwrap_or_else(Utc::now);
        Some(end - started)
    }

    /// Estimated time to completion, based on the average speed.
    ///
    /// `None` for terminal transfers and whenever no speed measurement
    /// exists, so the wire layer can omit the field rather than imply a
    /// measurement that was never taken.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        if self.state.is_terminal() || self.average_speed <= 0.0 {
            return None;
        }
        let secs = self.bytes_remaining() as f64 / self.average_speed;
        Some(Duration::milliseconds((secs * 1000.0) as i64))
    }
}

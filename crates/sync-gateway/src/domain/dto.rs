//! Wire DTO for transfers and the outbound message envelope.
//!
//! Translation is a pure mapping from the domain [`Transfer`] to the
//! JSON shape observers consume. It fails closed: optional measurements
//! that are absent on the domain side are omitted on the wire, never
//! emitted as a default numeric value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use transfer_types::{Transfer, TransferDirection, TransferState};

/// Wire representation of a single transfer.
///
/// Derived fields (`percentComplete`, `bytesRemaining`, durations) are
/// computed at translation time from the snapshot, so every message an
/// observer sees is internally consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDto {
    pub username: String,
    pub filename: String,
    pub size: u64,
    pub direction: TransferDirection,
    pub state: TransferState,
    pub start_offset: u64,
    pub bytes_transferred: u64,
    pub average_speed: f64,
    pub percent_complete: f64,
    pub bytes_remaining: u64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Omitted while the transfer has not started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_time_ms: Option<i64>,
    /// Omitted for terminal transfers and when no speed was measured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_time_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_in_queue: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

impl From<&Transfer> for TransferDto {
    fn from(t: &Transfer) -> Self {
        Self {
            username: t.username.clone(),
            filename: t.filename.clone(),
            size: t.size,
            direction: t.direction,
            state: t.state,
            start_offset: t.start_offset,
            bytes_transferred: t.bytes_transferred,
            average_speed: t.average_speed,
            percent_complete: t.percent_complete(),
            bytes_remaining: t.bytes_remaining(),
            start_time: t.started_at,
            end_time: t.ended_at,
            elapsed_time_ms: t.elapsed().map(|d| d.num_milliseconds()),
            remaining_time_ms: t.remaining().map(|d| d.num_milliseconds()),
            place_in_queue: t.place_in_queue,
            exception: t.exception.clone(),
        }
    }
}

/// Outbound message to observers.
///
/// Serializes as `{"method": "...", "payload": ...}`. `LIST` is sent once,
/// to a newly connected observer only; `CREATE` and `UPDATE` are broadcast
/// to all observers and always carry full current state, never a delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "payload")]
pub enum WireMessage {
    /// Full snapshot, seeding a new observer.
    #[serde(rename = "LIST")]
    List(Vec<TransferDto>),
    /// A transfer entered the system.
    #[serde(rename = "CREATE")]
    Create(TransferDto),
    /// Full current state of an existing transfer.
    #[serde(rename = "UPDATE")]
    Update(TransferDto),
}

impl WireMessage {
    /// Wire name of this message.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::List(_) => "LIST",
            Self::Create(_) => "CREATE",
            Self::Update(_) => "UPDATE",
        }
    }
}

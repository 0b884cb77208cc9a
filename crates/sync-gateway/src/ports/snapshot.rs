//! Snapshot provider port.

use async_trait::async_trait;
use transfer_types::Transfer;

/// Source of the authoritative current transfer state.
///
/// Owned by the transfer-management subsystem; the gateway only reads it
/// when seeding a newly connected observer. The returned ordering is
/// preserved verbatim in the LIST message.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// List all transfers in their current state.
    async fn list(&self) -> Vec<Transfer>;
}

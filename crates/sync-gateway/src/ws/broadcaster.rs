//! Observer registry and fanout.
//!
//! The ordering contract on connect is the crux of this module: the
//! snapshot is captured and enqueued as the observer's first message
//! *before* the observer joins the broadcast set. Registering first would
//! let a broadcast arrive ahead of the LIST and make the stale snapshot
//! appear to roll state backward. The price of this order is a small
//! window between capture and registration in which a published event is
//! missed once; because every broadcast carries full current state, the
//! next event for the same transfer repairs the observer's view.

use crate::domain::dto::{TransferDto, WireMessage};
use crate::ports::SnapshotProvider;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identifier of a connected observer, valid for its session only.
pub type ObserverId = Uuid;

/// Tracks connected observers and fans messages out to them.
///
/// Sends are non-blocking: each observer has a bounded queue drained by
/// its own writer task, so a slow or stalled observer can never stall the
/// publishing path.
pub struct Broadcaster {
    /// Outbound queues of currently connected observers.
    observers: DashMap<ObserverId, mpsc::Sender<WireMessage>>,
    /// Authoritative transfer state, read once per connect.
    snapshot: Arc<dyn SnapshotProvider>,
    /// Queue depth per observer.
    queue_capacity: usize,
}

impl Broadcaster {
    /// Create a broadcaster over the given snapshot source.
    pub fn new(snapshot: Arc<dyn SnapshotProvider>, queue_capacity: usize) -> Self {
        Self {
            observers: DashMap::new(),
            snapshot,
            queue_capacity,
        }
    }

    /// Admit a new observer.
    ///
    /// Captures the current snapshot, enqueues it as a single LIST — the
    /// first message the observer will ever process — and only then adds
    /// the observer to the broadcast set. Returns the observer's id and
    /// the receiving end of its queue for the transport to drain.
    pub async fn on_connect(&self) -> (ObserverId, mpsc::Receiver<WireMessage>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.queue_capacity);

        let transfers = self.snapshot.list().await;
        let list = WireMessage::List(transfers.iter().map(TransferDto::from).collect());

        // The queue is fresh, so this cannot fail for any validated
        // (non-zero) capacity; the guard keeps a misconfigured capacity
        // from panicking the connection path.
        if let Err(e) = tx.try_send(list) {
            warn!(observer = %id, error = %e, "Failed to enqueue snapshot");
        }

        // Registration strictly after the snapshot is enqueued; see the
        // module docs for why this order is load-bearing.
        self.observers.insert(id, tx);

        info!(observer = %id, observers = self.observers.len(), "Observer connected");
        (id, rx)
    }

    /// Remove an observer from the broadcast set. Idempotent.
    pub fn on_disconnect(&self, id: &ObserverId) {
        if self.observers.remove(id).is_some() {
            info!(observer = %id, observers = self.observers.len(), "Observer disconnected");
        }
    }

    /// Fan a message out to every connected observer.
    ///
    /// Per-observer failures are isolated: a full queue drops this message
    /// for that observer only, and a closed queue (dead connection) prunes
    /// the observer. Neither outcome surfaces to the caller.
    pub fn broadcast(&self, message: &WireMessage) {
        let mut dead = Vec::new();

        for entry in self.observers.iter() {
            match entry.value().try_send(message.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(
                        observer = %entry.key(),
                        method = message.method(),
                        "Observer queue full, message dropped"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    dead.push(*entry.key());
                }
            }
        }

        for id in dead {
            self.observers.remove(&id);
            debug!(observer = %id, "Pruned dead observer");
        }
    }

    /// Number of currently connected observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

//! # Handler Registry
//!
//! The subscription registry and dispatch loop of the event bus.

use crate::events::{TransferEvent, TransferEventKind};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors a handler can surface to the bus.
///
/// These never propagate past the bus boundary; they exist so dispatch
/// failures can be logged with context instead of disappearing inside
/// the handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The event could not be translated to its outbound form.
    #[error("translation failed: {0}")]
    Translation(String),

    /// The translated message could not be handed to the delivery layer.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// A registered event handler: an async closure owned by the bus.
pub type EventHandler =
    Arc<dyn Fn(TransferEvent) -> BoxFuture<'static, Result<(), HandlerError>> + Send + Sync>;

/// In-process event bus with named, replaceable handler slots.
///
/// Subscriptions are keyed by (subscriber name, event kind): at most one
/// live handler per key, and re-subscribing the same key replaces the
/// prior handler rather than adding a second. Dispatch snapshots the
/// registered handlers before invoking any of them, so subscriptions added
/// concurrently with an in-flight publish need not see that publish.
pub struct EventBus {
    /// Handler slots, keyed by (kind, subscriber name).
    slots: RwLock<HashMap<(TransferEventKind, String), EventHandler>>,

    /// Total events published.
    events_published: AtomicU64,
}

impl EventBus {
    /// Create an empty event bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            events_published: AtomicU64::new(0),
        }
    }

    /// Register or replace the handler for (`subscriber`, `kind`).
    pub fn subscribe<F, Fut>(&self, subscriber: impl Into<String>, kind: TransferEventKind, handler: F)
    where
        F: Fn(TransferEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        let subscriber = subscriber.into();
        let handler: EventHandler =
            Arc::new(move |event| -> BoxFuture<'static, Result<(), HandlerError>> {
                Box::pin(handler(event))
            });

        let replaced = {
            let Ok(mut slots) = self.slots.write() else {
                warn!(%kind, %subscriber, "Subscription registry poisoned, dropping subscribe");
                return;
            };
            slots.insert((kind, subscriber.clone()), handler).is_some()
        };

        debug!(%kind, %subscriber, replaced, "Handler registered");
    }

    /// Remove the handler for (`subscriber`, `kind`).
    ///
    /// Returns whether a handler was registered under that key.
    pub fn unsubscribe(&self, subscriber: &str, kind: TransferEventKind) -> bool {
        let Ok(mut slots) = self.slots.write() else {
            return false;
        };
        let removed = slots.remove(&(kind, subscriber.to_string())).is_some();
        if removed {
            debug!(%kind, subscriber, "Handler removed");
        }
        removed
    }

    /// Publish an event to every handler registered for its kind.
    ///
    /// Handlers are invoked in sequence on the publisher's task; a failing
    /// handler is logged and skipped, and never prevents dispatch to the
    /// remaining handlers or surfaces to the publisher.
    ///
    /// Returns the number of handlers invoked.
    pub async fn publish(&self, event: TransferEvent) -> usize {
        let kind = event.kind();

        // Always increment counter (event was attempted)
        self.events_published.fetch_add(1, Ordering::Relaxed);

        // Snapshot the handlers current at dispatch time; the lock must
        // not be held across an await point.
        let handlers: Vec<(String, EventHandler)> = {
            let Ok(slots) = self.slots.read() else {
                warn!(%kind, "Subscription registry poisoned, event dropped");
                return 0;
            };
            slots
                .iter()
                .filter(|((k, _), _)| *k == kind)
                .map(|((_, name), handler)| (name.clone(), handler.clone()))
                .collect()
        };

        if handlers.is_empty() {
            debug!(%kind, "Event dropped (no handlers)");
            return 0;
        }

        let filename = event.transfer().filename.clone();
        let mut invoked = 0;
        for (subscriber, handler) in handlers {
            match handler(event.clone()).await {
                Ok(()) => {
                    debug!(%kind, %subscriber, %filename, "Event dispatched");
                }
                Err(e) => {
                    warn!(%kind, %subscriber, %filename, error = %e, "Handler failed");
                }
            }
            invoked += 1;
        }

        invoked
    }

    /// Whether a handler is registered under (`subscriber`, `kind`).
    #[must_use]
    pub fn is_subscribed(&self, subscriber: &str, kind: TransferEventKind) -> bool {
        self.slots
            .read()
            .map(|slots| slots.contains_key(&(kind, subscriber.to_string())))
            .unwrap_or(false)
    }

    /// Number of registered handler slots across all kinds.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.slots.read().map(|slots| slots.len()).unwrap_or(0)
    }

    /// Total events published since construction.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

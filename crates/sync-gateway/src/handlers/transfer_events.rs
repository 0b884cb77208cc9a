//! Sync coordinator: bridges the event bus to the broadcast gateway.
//!
//! Subscribes to every transfer lifecycle event kind under one fixed
//! subscriber name, translates each event, and forwards it to all
//! connected observers. Started becomes CREATE; every other kind collapses
//! into UPDATE carrying full current state, which is what makes a missed
//! message self-healing on the observer side.

use crate::domain::dto::{TransferDto, WireMessage};
use crate::ws::broadcaster::Broadcaster;
use std::sync::Arc;
use sync_bus::{EventBus, TransferEvent, TransferEventKind};
use tracing::info;

/// Fixed subscriber name for all coordinator subscriptions.
///
/// Re-registering under this name replaces the prior handlers instead of
/// duplicating delivery.
pub const SUBSCRIBER_NAME: &str = "transfer-sync";

/// Handles transfer events and broadcasts them to connected observers.
pub struct TransferEventHandler;

impl TransferEventHandler {
    /// Subscribe to all transfer lifecycle events.
    ///
    /// Must run at startup, before the transport begins accepting
    /// observers; [`crate::service::SyncService`] calls it from `new`.
    pub fn register(bus: &EventBus, broadcaster: Arc<Broadcaster>) {
        for kind in TransferEventKind::ALL {
            let broadcaster = broadcaster.clone();
            bus.subscribe(SUBSCRIBER_NAME, kind, move |event| {
                let broadcaster = broadcaster.clone();
                async move {
                    broadcaster.broadcast(&outbound_message(&event));
                    Ok(())
                }
            });
        }
        info!(subscriber = SUBSCRIBER_NAME, "Subscribed to transfer events");
    }
}

/// Map a domain event to its outbound wire message.
fn outbound_message(event: &TransferEvent) -> WireMessage {
    let mut dto = TransferDto::from(event.transfer());
    if let TransferEvent::Errored { message, .. } = event {
        dto.exception = Some(message.clone());
    }

    match event.kind() {
        TransferEventKind::Started => WireMessage::Create(dto),
        _ => WireMessage::Update(dto),
    }
}

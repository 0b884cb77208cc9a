//! Gateway service - wiring and WebSocket server entry point.

use crate::domain::config::SyncConfig;
use crate::domain::error::GatewayError;
use crate::handlers::TransferEventHandler;
use crate::ports::SnapshotProvider;
use crate::ws::{Broadcaster, WebSocketHandler};
use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use sync_bus::EventBus;
use tokio::sync::oneshot;
use tracing::info;

/// Gateway service state.
///
/// Construction wires the full pipeline — bus, broadcaster, coordinator —
/// before any observer can connect; subscription is an explicit startup
/// step, not a side effect of the first connection.
pub struct SyncService {
    config: SyncConfig,
    bus: Arc<EventBus>,
    broadcaster: Arc<Broadcaster>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl SyncService {
    /// Create a new gateway service.
    pub fn new(
        config: SyncConfig,
        snapshot: Arc<dyn SnapshotProvider>,
    ) -> Result<Self, GatewayError> {
        config.validate()?;

        let bus = Arc::new(EventBus::new());
        let broadcaster = Arc::new(Broadcaster::new(
            snapshot,
            config.observer_queue_capacity,
        ));

        // Coordinator goes live before the transport starts accepting
        // observers, so no event published after startup can be missed.
        TransferEventHandler::register(&bus, broadcaster.clone());

        Ok(Self {
            config,
            bus,
            broadcaster,
            shutdown_tx: None,
        })
    }

    /// The event bus producers publish to.
    #[must_use]
    pub fn bus(&self) -> Arc<EventBus> {
        self.bus.clone()
    }

    /// The broadcast gateway.
    #[must_use]
    pub fn broadcaster(&self) -> Arc<Broadcaster> {
        self.broadcaster.clone()
    }

    /// Build the axum router exposing the observer endpoint.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(ws_upgrade))
            .with_state(self.broadcaster.clone())
    }

    /// Bind and serve until [`Self::shutdown`] is called.
    pub async fn start(&mut self) -> Result<(), GatewayError> {
        let addr = self.config.websocket.addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })?;

        info!(%addr, "WebSocket server listening");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await?;

        Ok(())
    }

    /// Signal the server to stop accepting observers and drain.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn ws_upgrade(
    State(broadcaster): State<Arc<Broadcaster>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| WebSocketHandler::new(broadcaster).handle(socket))
}

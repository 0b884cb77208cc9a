//! # Integration Test Flows
//!
//! Tests that sync-bus, the sync coordinator, and the broadcaster work
//! together: events published on the bus reach every connected observer
//! as CREATE/UPDATE messages, and a new observer is seeded with a LIST
//! snapshot before anything else.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use sync_bus::{HandlerError, TransferEvent};
    use sync_gateway::{SnapshotProvider, SyncConfig, SyncService, WireMessage};
    use transfer_types::{Transfer, TransferDirection, TransferState};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Snapshot provider backed by a shared mutable list, standing in for
    /// the transfer-management subsystem.
    struct SharedSnapshot(Arc<Mutex<Vec<Transfer>>>);

    #[async_trait]
    impl SnapshotProvider for SharedSnapshot {
        async fn list(&self) -> Vec<Transfer> {
            self.0.lock().clone()
        }
    }

    fn transfer(filename: &str, size: u64, transferred: u64) -> Transfer {
        Transfer {
            bytes_transferred: transferred,
            ..Transfer::new("alice", filename, size, TransferDirection::Download)
        }
    }

    /// Wire up the full pipeline without a network listener.
    fn pipeline(snapshot: Vec<Transfer>) -> (SyncService, Arc<Mutex<Vec<Transfer>>>) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let state = Arc::new(Mutex::new(snapshot));
        let service = SyncService::new(
            SyncConfig::default(),
            Arc::new(SharedSnapshot(state.clone())),
        )
        .expect("default config is valid");
        (service, state)
    }

    async fn recv(rx: &mut mpsc::Receiver<WireMessage>) -> WireMessage {
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for message")
            .expect("observer channel closed")
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[tokio::test]
    async fn test_scenario_a_new_observer_gets_completed_snapshot() {
        let mut t1 = transfer("t1.flac", 100, 100);
        t1.state = TransferState::Completed;
        let (service, _state) = pipeline(vec![t1]);

        let (_id, mut rx) = service.broadcaster().on_connect().await;

        let WireMessage::List(transfers) = recv(&mut rx).await else {
            panic!("expected LIST first");
        };
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].percent_complete, 100.0);
        assert_eq!(transfers[0].bytes_remaining, 0);
    }

    #[tokio::test]
    async fn test_scenario_b_started_event_broadcasts_create() {
        let (service, _state) = pipeline(vec![]);
        let (_id, mut rx) = service.broadcaster().on_connect().await;
        recv(&mut rx).await; // LIST

        service
            .bus()
            .publish(TransferEvent::Started(transfer("t2.flac", 200, 0)))
            .await;

        let WireMessage::Create(dto) = recv(&mut rx).await else {
            panic!("expected CREATE");
        };
        assert_eq!(dto.filename, "t2.flac");
        assert_eq!(dto.percent_complete, 0.0);
    }

    #[tokio::test]
    async fn test_scenario_c_progress_event_broadcasts_full_state_update() {
        let (service, _state) = pipeline(vec![]);
        let (_id, mut rx) = service.broadcaster().on_connect().await;
        recv(&mut rx).await; // LIST

        service
            .bus()
            .publish(TransferEvent::Progress(transfer("t2.flac", 200, 50)))
            .await;

        let WireMessage::Update(dto) = recv(&mut rx).await else {
            panic!("expected UPDATE");
        };
        assert_eq!(dto.percent_complete, 25.0);
        assert_eq!(dto.bytes_remaining, 150);
    }

    #[tokio::test]
    async fn test_scenario_d_error_then_later_events_still_flow() {
        let (service, _state) = pipeline(vec![]);

        // One healthy observer and one whose connection is already dead,
        // so the broadcast path exercises a delivery failure.
        let (_live, mut rx) = service.broadcaster().on_connect().await;
        let (_dead, rx_dead) = service.broadcaster().on_connect().await;
        drop(rx_dead);
        recv(&mut rx).await; // LIST

        let mut errored = transfer("t2.flac", 200, 50);
        errored.state = TransferState::Errored;
        service
            .bus()
            .publish(TransferEvent::Errored {
                transfer: errored,
                message: "connection reset".into(),
            })
            .await;

        let WireMessage::Update(dto) = recv(&mut rx).await else {
            panic!("expected UPDATE");
        };
        assert_eq!(dto.exception.as_deref(), Some("connection reset"));

        // A subsequent event for a different transfer is still delivered
        service
            .bus()
            .publish(TransferEvent::Progress(transfer("t3.flac", 100, 10)))
            .await;

        let WireMessage::Update(dto) = recv(&mut rx).await else {
            panic!("expected UPDATE");
        };
        assert_eq!(dto.filename, "t3.flac");
    }

    // =============================================================================
    // DELIVERY PROPERTIES
    // =============================================================================

    #[tokio::test]
    async fn test_fanout_preserves_publish_order_per_observer() {
        let (service, _state) = pipeline(vec![]);
        let mut observers = Vec::new();
        for _ in 0..3 {
            let (_id, rx) = service.broadcaster().on_connect().await;
            observers.push(rx);
        }

        let events = [
            TransferEvent::Started(transfer("a.flac", 100, 0)),
            TransferEvent::Progress(transfer("a.flac", 100, 40)),
            TransferEvent::Completed(transfer("a.flac", 100, 100)),
            TransferEvent::Started(transfer("b.flac", 50, 0)),
        ];
        for event in events {
            service.bus().publish(event).await;
        }

        // Each observer: its LIST, then one message per event, in order
        for rx in &mut observers {
            assert_eq!(recv(rx).await.method(), "LIST");
            assert_eq!(recv(rx).await.method(), "CREATE");
            assert_eq!(recv(rx).await.method(), "UPDATE");
            assert_eq!(recv(rx).await.method(), "UPDATE");
            assert_eq!(recv(rx).await.method(), "CREATE");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_list_is_first_despite_concurrent_publishes() {
        let (service, state) = pipeline(vec![transfer("seed.flac", 10, 0)]);
        let bus = service.bus();

        // Hammer the bus from another task while observers connect
        let publisher = tokio::spawn({
            let state = state.clone();
            async move {
                for i in 0..200 {
                    let t = transfer("hot.flac", 1000, i);
                    state.lock().push(t.clone());
                    bus.publish(TransferEvent::Progress(t)).await;
                }
            }
        });

        for _ in 0..5 {
            let (_id, mut rx) = service.broadcaster().on_connect().await;
            let first = recv(&mut rx).await;
            assert_eq!(first.method(), "LIST", "LIST must be the first message");
        }

        publisher.await.expect("publisher task panicked");
    }

    #[tokio::test]
    async fn test_failing_foreign_handler_does_not_affect_observers() {
        let (service, _state) = pipeline(vec![]);
        let (_id, mut rx) = service.broadcaster().on_connect().await;
        recv(&mut rx).await; // LIST

        // A second consumer of Started events that always fails
        service
            .bus()
            .subscribe("flaky-metrics", sync_bus::TransferEventKind::Started, |_| async {
                Err(HandlerError::Delivery("downstream unavailable".into()))
            });

        service
            .bus()
            .publish(TransferEvent::Started(transfer("x.flac", 10, 0)))
            .await;
        service
            .bus()
            .publish(TransferEvent::Progress(transfer("x.flac", 10, 5)))
            .await;

        assert_eq!(recv(&mut rx).await.method(), "CREATE");
        assert_eq!(recv(&mut rx).await.method(), "UPDATE");
    }

    #[tokio::test]
    async fn test_each_event_is_delivered_exactly_once() {
        let (service, _state) = pipeline(vec![]);
        let (_id, mut rx) = service.broadcaster().on_connect().await;
        recv(&mut rx).await; // LIST

        service
            .bus()
            .publish(TransferEvent::Started(transfer("once.flac", 10, 0)))
            .await;

        assert_eq!(recv(&mut rx).await.method(), "CREATE");
        // Nothing else pending: the coordinator's five kind-slots share one
        // subscriber name, so no kind is double-registered.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disconnected_observer_stops_receiving() {
        let (service, _state) = pipeline(vec![]);
        let broadcaster = service.broadcaster();

        let (id, mut rx) = broadcaster.on_connect().await;
        recv(&mut rx).await; // LIST
        broadcaster.on_disconnect(&id);

        service
            .bus()
            .publish(TransferEvent::Started(transfer("gone.flac", 10, 0)))
            .await;

        assert!(rx.try_recv().is_err());
        assert_eq!(broadcaster.observer_count(), 0);
    }
}

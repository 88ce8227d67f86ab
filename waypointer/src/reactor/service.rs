//! Single-consumer actor around [`DerivedStateReactor`].
//!
//! Position, heading and destination updates arrive from independent tasks.
//! Rather than locking the reactor from each of them, every producer sends a
//! [`ReactorEvent`] into one unbounded queue. A single task drains the queue
//! in arrival order, applies each event and publishes the snapshot.
//!
//! ```text
//! position forwarder ──┐
//! heading forwarder ───┼──► mpsc queue ──► ReactorService ──► broadcast ──► presentation
//! destination input ───┘                         │
//!                                                └──► latest snapshot (pull)
//! ```

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::geo::{Heading, Position};

use super::engine::DerivedStateReactor;
use super::event::ReactorEvent;
use super::state::DerivedState;

/// Errors returned by [`ReactorHandle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactorError {
    /// The service task has stopped and no longer accepts events.
    #[error("Reactor service has stopped")]
    Closed,
}

/// Broadcast sender shared with handles for subscribing.
///
/// Only the service publishes. It empties the slot when it stops, so its own
/// sender is the last one and subscribers see the channel close.
type SharedSender = Arc<RwLock<Option<broadcast::Sender<DerivedState>>>>;

/// The task that owns the reactor.
pub struct ReactorService {
    reactor: DerivedStateReactor,
    event_rx: mpsc::UnboundedReceiver<ReactorEvent>,
    state_tx: broadcast::Sender<DerivedState>,
    subscribe_slot: SharedSender,
    latest: Arc<RwLock<DerivedState>>,
    cancellation: CancellationToken,
}

impl ReactorService {
    /// Spawn the service on the current Tokio runtime.
    ///
    /// The service runs until `cancellation` fires or every handle has been
    /// dropped. Events still queued at cancellation are discarded. Once it
    /// stops, subscribers receive [`broadcast::error::RecvError::Closed`].
    pub fn spawn(reactor: DerivedStateReactor, cancellation: CancellationToken) -> ReactorHandle {
        let capacity = reactor.config().broadcast_capacity.max(1);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = broadcast::channel(capacity);
        let subscribe_slot: SharedSender = Arc::new(RwLock::new(Some(state_tx.clone())));
        let latest = Arc::new(RwLock::new(reactor.derived()));

        let service = Self {
            reactor,
            event_rx,
            state_tx,
            subscribe_slot: Arc::clone(&subscribe_slot),
            latest: Arc::clone(&latest),
            cancellation: cancellation.clone(),
        };

        let task = tokio::spawn(service.run());

        ReactorHandle {
            event_tx,
            subscribe_slot,
            latest,
            cancellation,
            task: Arc::new(Mutex::new(Some(task))),
        }
    }

    async fn run(mut self) {
        info!(
            heading_gap = %self.reactor.config().heading_gap,
            "Reactor service started"
        );

        let mut events_processed: u64 = 0;

        loop {
            tokio::select! {
                biased;

                _ = self.cancellation.cancelled() => {
                    debug!("Reactor service cancelled");
                    break;
                }

                event = self.event_rx.recv() => {
                    match event {
                        Some(event) => {
                            events_processed += 1;
                            self.handle(event);
                        }
                        None => {
                            debug!("All reactor handles dropped");
                            break;
                        }
                    }
                }
            }
        }

        // Drop the shared sender; ours goes when `self` does.
        self.subscribe_slot.write().take();
        info!(events_processed, "Reactor service stopped");
    }

    fn handle(&mut self, event: ReactorEvent) {
        let kind = event.as_str();
        let state = self.reactor.apply(event);

        *self.latest.write() = state;

        // No subscribers is fine; presentation may attach later.
        let receivers = self.state_tx.send(state).unwrap_or(0);

        tracing::trace!(event = kind, receivers, "Reactor published snapshot");
    }
}

/// Cloneable handle for feeding and observing a running [`ReactorService`].
#[derive(Clone)]
pub struct ReactorHandle {
    event_tx: mpsc::UnboundedSender<ReactorEvent>,
    subscribe_slot: SharedSender,
    latest: Arc<RwLock<DerivedState>>,
    cancellation: CancellationToken,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl std::fmt::Debug for ReactorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactorHandle")
            .field("closed", &self.is_closed())
            .field("latest", &*self.latest.read())
            .field(
                "subscribers",
                &self.subscribe_slot.read().as_ref().map_or(0, |tx| tx.receiver_count()),
            )
            .finish()
    }
}

impl ReactorHandle {
    /// Queue an event. Never blocks.
    pub fn send(&self, event: ReactorEvent) -> Result<(), ReactorError> {
        if self.cancellation.is_cancelled() {
            return Err(ReactorError::Closed);
        }
        self.event_tx.send(event).map_err(|_| ReactorError::Closed)
    }

    /// Queue a position fix.
    pub fn position(&self, position: Position) -> Result<(), ReactorError> {
        self.send(ReactorEvent::Position(position))
    }

    /// Queue a heading reading.
    pub fn heading(&self, heading: Heading) -> Result<(), ReactorError> {
        self.send(ReactorEvent::Heading(heading))
    }

    /// Queue a destination edit.
    pub fn destination(
        &self,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Result<(), ReactorError> {
        self.send(ReactorEvent::destination(latitude, longitude))
    }

    /// Queue a destination removal.
    pub fn clear_destination(&self) -> Result<(), ReactorError> {
        self.send(ReactorEvent::ClearDestination)
    }

    /// Queue a heading invalidation.
    pub fn heading_lost(&self) -> Result<(), ReactorError> {
        self.send(ReactorEvent::HeadingLost)
    }

    /// Queue a position invalidation.
    pub fn position_lost(&self) -> Result<(), ReactorError> {
        self.send(ReactorEvent::PositionLost)
    }

    /// Subscribe to published snapshots.
    ///
    /// Slow subscribers lag rather than stall the reactor; see
    /// [`broadcast::error::RecvError::Lagged`]. After the service has stopped
    /// the returned receiver is already closed.
    pub fn subscribe(&self) -> broadcast::Receiver<DerivedState> {
        match self.subscribe_slot.read().as_ref() {
            Some(tx) => tx.subscribe(),
            None => {
                let (_, rx) = broadcast::channel(1);
                rx
            }
        }
    }

    /// Latest published snapshot.
    pub fn current(&self) -> DerivedState {
        *self.latest.read()
    }

    /// Whether the service has been asked to stop or has stopped.
    pub fn is_closed(&self) -> bool {
        self.cancellation.is_cancelled() || self.event_tx.is_closed()
    }

    /// Ask the service to stop.
    pub fn shutdown(&self) {
        self.cancellation.cancel();
    }

    /// Wait for the service task to finish.
    ///
    /// Only the first caller across all clones actually waits.
    pub async fn join(&self) {
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Reactor service task failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::reactor::{HeadingGapPolicy, ReactorConfig};
    use std::time::Duration;

    fn position(lat: f64, lon: f64) -> Position {
        Position::new(Coordinate::new(lat, lon).unwrap())
    }

    fn spawn_default() -> ReactorHandle {
        ReactorService::spawn(DerivedStateReactor::new(), CancellationToken::new())
    }

    #[tokio::test]
    async fn test_publishes_one_snapshot_per_event() {
        let handle = spawn_default();
        let mut rx = handle.subscribe();

        handle.destination("0.0", "1.0").unwrap();
        handle.position(position(0.0, 0.0)).unwrap();
        handle.heading(Heading::new(0.0).unwrap()).unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first, DerivedState::EMPTY);

        let second = rx.recv().await.unwrap();
        assert!(second.has_route());
        assert!(second.rotation().is_none());

        let third = rx.recv().await.unwrap();
        assert_eq!(third.continuous_rotation, Some(90.0));

        assert_eq!(handle.current(), third);

        handle.shutdown();
        handle.join().await;
    }

    #[tokio::test]
    async fn test_events_applied_in_arrival_order() {
        let handle = spawn_default();
        let mut rx = handle.subscribe();

        handle.destination("0.0", "1.0").unwrap();
        handle.position(position(0.0, 0.0)).unwrap();
        for degrees in [100.0, 80.0, 60.0] {
            handle.heading(Heading::new(degrees).unwrap()).unwrap();
        }

        let mut last = DerivedState::EMPTY;
        for _ in 0..5 {
            last = rx.recv().await.unwrap();
        }

        // 350 → 370 → 390
        assert_eq!(last.continuous_rotation, Some(390.0));
        assert_eq!(last.display_rotation, Some(30.0));

        handle.shutdown();
        handle.join().await;
    }

    #[tokio::test]
    async fn test_send_after_shutdown_fails() {
        let handle = spawn_default();
        handle.shutdown();
        handle.join().await;

        assert!(handle.is_closed());
        assert_eq!(handle.clear_destination(), Err(ReactorError::Closed));
    }

    #[tokio::test]
    async fn test_clones_share_one_service() {
        let handle = spawn_default();
        let other = handle.clone();
        let mut rx = handle.subscribe();

        other.destination("10.0", "10.0").unwrap();
        handle.position(position(0.0, 0.0)).unwrap();

        rx.recv().await.unwrap();
        let state = rx.recv().await.unwrap();
        assert!(state.has_route());
        assert_eq!(other.current(), state);

        other.shutdown();
        handle.join().await;
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_uses_reactor_config() {
        let config = ReactorConfig {
            heading_gap: HeadingGapPolicy::Reset,
            broadcast_capacity: 4,
        };
        let handle = ReactorService::spawn(
            DerivedStateReactor::with_config(config),
            CancellationToken::new(),
        );
        let mut rx = handle.subscribe();

        handle.destination("0.0", "1.0").unwrap();
        handle.position(position(0.0, 0.0)).unwrap();
        handle.heading(Heading::new(100.0).unwrap()).unwrap();
        handle.heading(Heading::new(80.0).unwrap()).unwrap();
        for _ in 0..4 {
            rx.recv().await.unwrap();
        }

        handle.heading_lost().unwrap();
        handle.heading(Heading::new(80.0).unwrap()).unwrap();
        rx.recv().await.unwrap();
        let resumed = rx.recv().await.unwrap();

        // Reset policy: cold start at the raw ideal angle
        assert_eq!(resumed.continuous_rotation, Some(10.0));

        handle.shutdown();
        handle.join().await;
    }

    #[tokio::test]
    async fn test_subscribers_see_close_after_shutdown() {
        let handle = spawn_default();
        let _forwarder_clone = handle.clone();
        let mut rx = handle.subscribe();

        handle.shutdown();
        handle.join().await;

        let result = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("recv should not hang once the service has stopped");
        assert_eq!(result, Err(broadcast::error::RecvError::Closed));

        // Late subscribers are closed from the start
        let mut late = handle.subscribe();
        assert_eq!(
            late.try_recv(),
            Err(broadcast::error::TryRecvError::Closed)
        );
    }

    #[tokio::test]
    async fn test_presentation_loop_ends_with_service() {
        let handle = spawn_default();
        let mut rx = handle.subscribe();

        let presenter = tokio::spawn(async move {
            let mut seen = 0;
            while let Ok(_state) = rx.recv().await {
                seen += 1;
            }
            seen
        });

        handle.destination("0.0", "1.0").unwrap();
        handle.position(position(0.0, 0.0)).unwrap();
        while handle.current() == DerivedState::EMPTY {
            tokio::task::yield_now().await;
        }

        handle.shutdown();
        handle.join().await;

        let seen = tokio::time::timeout(Duration::from_secs(1), presenter)
            .await
            .expect("presentation loop should end")
            .unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ReactorError::Closed.to_string(), "Reactor service has stopped");
    }
}

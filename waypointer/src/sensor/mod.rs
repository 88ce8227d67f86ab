//! Sensor Feed
//!
//! Abstraction over whatever produces position fixes and compass headings
//! (a GPS receiver, a platform location service, a replay script). The
//! reactor never reaches for a global sensor service; a [`SensorFeed`] is
//! constructed by the caller and injected.
//!
//! # Subscription Semantics
//!
//! - Each stream is lazy and unbounded.
//! - Only one subscription per stream is active. Subscribing again supersedes
//!   the previous subscription, whose stream simply ends.
//! - A new position subscription immediately yields the latest known fix.
//! - Invalid readings (negative heading sentinel, out-of-range coordinates)
//!   are dropped by the feed and never delivered.
//!
//! # Components
//!
//! - [`SensorFeed`] - trait implemented by feeds
//! - [`SensorStream`] - receiving end of one subscription
//! - [`ManualSensorFeed`] - in-process feed driven by explicit `publish_*` calls
//! - [`spawn_position_forwarder`] / [`spawn_heading_forwarder`] - independently
//!   cancellable tasks piping one stream each into a
//!   [`ReactorHandle`](crate::reactor::ReactorHandle)

mod forwarder;
mod manual;

pub use forwarder::{spawn_heading_forwarder, spawn_position_forwarder};
pub use manual::ManualSensorFeed;

use tokio::sync::mpsc;

use crate::geo::{Heading, Position};

/// Source of position and heading updates.
pub trait SensorFeed: Send + Sync {
    /// Subscribe to position fixes.
    ///
    /// Supersedes any earlier position subscription. Yields the most recent
    /// known fix first, if there is one.
    fn position_updates(&self) -> SensorStream<Position>;

    /// Subscribe to heading readings.
    ///
    /// Supersedes any earlier heading subscription. Only valid headings are
    /// delivered.
    fn heading_updates(&self) -> SensorStream<Heading>;
}

/// Receiving end of a sensor subscription.
#[derive(Debug)]
pub struct SensorStream<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> SensorStream<T> {
    /// Wrap an existing receiver.
    pub fn new(rx: mpsc::UnboundedReceiver<T>) -> Self {
        Self { rx }
    }

    /// Create a connected sender/stream pair.
    pub fn channel() -> (mpsc::UnboundedSender<T>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx))
    }

    /// Wait for the next update. `None` once the subscription has ended.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Take the next update if one is already queued.
    pub fn try_next(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

//! In-process sensor feed driven by explicit publish calls.

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::geo::{Coordinate, Heading, Position};

use super::{SensorFeed, SensorStream};

#[derive(Debug, Default)]
struct FeedInner {
    latest_position: Option<Position>,
    latest_heading: Option<Heading>,
    position_tx: Option<mpsc::UnboundedSender<Position>>,
    heading_tx: Option<mpsc::UnboundedSender<Heading>>,
    rejected_positions: u64,
    rejected_headings: u64,
}

/// Sensor feed whose readings are pushed in by the owner.
///
/// Used as the fake feed in tests and by the CLI replay runner. Raw readings
/// are validated here, at the boundary: invalid ones are counted, logged and
/// dropped.
///
/// # Usage
///
/// ```
/// use waypointer::sensor::{ManualSensorFeed, SensorFeed};
///
/// let feed = ManualSensorFeed::new();
/// let mut headings = feed.heading_updates();
///
/// assert!(feed.publish_heading(90.0));
/// assert!(!feed.publish_heading(-1.0)); // sensor failure sentinel
///
/// assert_eq!(headings.try_next().map(|h| h.degrees()), Some(90.0));
/// assert!(headings.try_next().is_none());
/// ```
#[derive(Debug, Default)]
pub struct ManualSensorFeed {
    inner: Mutex<FeedInner>,
}

impl ManualSensorFeed {
    /// Create a feed with no readings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a raw position reading.
    ///
    /// Returns false if the coordinates were invalid and the reading dropped.
    pub fn publish_position(&self, latitude: f64, longitude: f64) -> bool {
        match Coordinate::new(latitude, longitude) {
            Ok(coordinate) => {
                self.publish_fix(Position::new(coordinate));
                true
            }
            Err(e) => {
                let mut inner = self.inner.lock();
                inner.rejected_positions += 1;
                tracing::debug!(
                    error = %e,
                    rejected = inner.rejected_positions,
                    "Dropping invalid position reading"
                );
                false
            }
        }
    }

    /// Publish an already validated position fix.
    pub fn publish_fix(&self, position: Position) {
        let mut inner = self.inner.lock();
        inner.latest_position = Some(position);

        if let Some(tx) = &inner.position_tx {
            if tx.send(position).is_err() {
                tracing::debug!("Position subscriber gone");
                inner.position_tx = None;
            }
        }
    }

    /// Publish a raw heading reading in degrees.
    ///
    /// Returns false if the reading was outside [0, 360) and dropped.
    pub fn publish_heading(&self, degrees: f64) -> bool {
        let mut inner = self.inner.lock();

        let Some(heading) = Heading::new(degrees) else {
            inner.rejected_headings += 1;
            tracing::debug!(
                degrees,
                rejected = inner.rejected_headings,
                "Dropping invalid heading reading"
            );
            return false;
        };

        inner.latest_heading = Some(heading);

        if let Some(tx) = &inner.heading_tx {
            if tx.send(heading).is_err() {
                tracing::debug!("Heading subscriber gone");
                inner.heading_tx = None;
            }
        }
        true
    }

    /// Most recent valid position.
    pub fn latest_position(&self) -> Option<Position> {
        self.inner.lock().latest_position
    }

    /// Most recent valid heading.
    pub fn latest_heading(&self) -> Option<Heading> {
        self.inner.lock().latest_heading
    }

    /// Number of readings dropped as invalid, as (positions, headings).
    pub fn rejected_counts(&self) -> (u64, u64) {
        let inner = self.inner.lock();
        (inner.rejected_positions, inner.rejected_headings)
    }
}

impl SensorFeed for ManualSensorFeed {
    fn position_updates(&self) -> SensorStream<Position> {
        let (tx, stream) = SensorStream::channel();
        let mut inner = self.inner.lock();

        if let Some(latest) = inner.latest_position {
            // Receiver is held right here, so this cannot fail.
            let _ = tx.send(latest);
        }

        if inner.position_tx.replace(tx).is_some() {
            tracing::debug!("Position subscription superseded");
        }
        stream
    }

    fn heading_updates(&self) -> SensorStream<Heading> {
        let (tx, stream) = SensorStream::channel();
        let mut inner = self.inner.lock();

        if inner.heading_tx.replace(tx).is_some() {
            tracing::debug!("Heading subscription superseded");
        }
        stream
    }
}

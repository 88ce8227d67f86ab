//! Synchronous merge of position, heading and destination.

use std::str::FromStr;

use crate::continuity::{ideal_angle, AngleContinuityTracker, ContinuityState};
use crate::geo::{great_circle, Coordinate, Heading, Position};

use super::event::ReactorEvent;
use super::state::DerivedState;

/// Default capacity of the snapshot broadcast channel.
pub const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// What to do with accumulated rotation when the heading drops out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeadingGapPolicy {
    /// Stop publishing rotation but keep the accumulator, so the indicator
    /// continues from where it was once the heading returns.
    #[default]
    Suspend,
    /// Discard the accumulator; the next heading is a cold start.
    Reset,
}

impl HeadingGapPolicy {
    /// Config-file spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingGapPolicy::Suspend => "suspend",
            HeadingGapPolicy::Reset => "reset",
        }
    }
}

impl std::fmt::Display for HeadingGapPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HeadingGapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "suspend" => Ok(HeadingGapPolicy::Suspend),
            "reset" => Ok(HeadingGapPolicy::Reset),
            other => Err(format!("unknown heading gap policy '{}'", other)),
        }
    }
}

/// Configuration for the reactor and its service.
#[derive(Debug, Clone)]
pub struct ReactorConfig {
    /// Behaviour on heading loss.
    pub heading_gap: HeadingGapPolicy,

    /// Snapshot broadcast channel capacity (service only).
    pub broadcast_capacity: usize,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            heading_gap: HeadingGapPolicy::default(),
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

/// Owns the three input cells and recomputes the derived state on every change.
///
/// Every mutator runs a full recomputation pass and returns the resulting
/// snapshot. Calling a mutator twice with the same input yields the same
/// snapshot: the tracker folds a zero delta.
///
/// This type is not synchronized. Concurrent sources must be serialized in
/// front of it; [`ReactorService`](super::ReactorService) does that with a
/// single-consumer queue.
///
/// # Usage
///
/// ```
/// use waypointer::geo::{Coordinate, Heading, Position};
/// use waypointer::reactor::DerivedStateReactor;
///
/// let mut reactor = DerivedStateReactor::new();
///
/// reactor.on_destination_changed("35.01", "139.0");
/// reactor.on_position(Position::new(Coordinate::new(35.0, 139.0).unwrap()));
/// let state = reactor.on_heading(Heading::new(0.0).unwrap());
///
/// assert!(state.has_route());
/// assert!(state.rotation().is_some());
/// ```
#[derive(Debug)]
pub struct DerivedStateReactor {
    position: Option<Position>,
    heading: Option<Heading>,
    destination: Option<Coordinate>,
    tracker: AngleContinuityTracker,
    derived: DerivedState,
    config: ReactorConfig,
}

impl Default for DerivedStateReactor {
    fn default() -> Self {
        Self::new()
    }
}

impl DerivedStateReactor {
    /// Create a reactor with default configuration.
    pub fn new() -> Self {
        Self::with_config(ReactorConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: ReactorConfig) -> Self {
        Self {
            position: None,
            heading: None,
            destination: None,
            tracker: AngleContinuityTracker::new(),
            derived: DerivedState::EMPTY,
            config,
        }
    }

    /// Record a new position fix.
    pub fn on_position(&mut self, position: Position) -> DerivedState {
        self.position = Some(position);
        self.recompute()
    }

    /// Record a new heading reading.
    pub fn on_heading(&mut self, heading: Heading) -> DerivedState {
        self.heading = Some(heading);
        self.recompute()
    }

    /// Record new destination text.
    ///
    /// If either field fails to parse, the destination becomes absent.
    pub fn on_destination_changed(&mut self, latitude: &str, longitude: &str) -> DerivedState {
        let destination = Coordinate::parse(latitude, longitude);
        if destination.is_none() {
            tracing::debug!(
                latitude,
                longitude,
                "Destination text did not parse, clearing destination"
            );
        }
        self.set_destination(destination)
    }

    /// Set the destination directly.
    pub fn set_destination(&mut self, destination: Option<Coordinate>) -> DerivedState {
        self.destination = destination;
        self.recompute()
    }

    /// Remove the destination.
    pub fn clear_destination(&mut self) -> DerivedState {
        self.set_destination(None)
    }

    /// Forget the heading.
    ///
    /// The accumulator is kept or discarded according to
    /// [`ReactorConfig::heading_gap`].
    pub fn on_heading_lost(&mut self) -> DerivedState {
        self.heading = None;
        if self.config.heading_gap == HeadingGapPolicy::Reset {
            self.tracker.reset();
        }
        self.recompute()
    }

    /// Forget the position.
    pub fn on_position_lost(&mut self) -> DerivedState {
        self.position = None;
        self.recompute()
    }

    /// Apply any event.
    pub fn apply(&mut self, event: ReactorEvent) -> DerivedState {
        match event {
            ReactorEvent::Position(position) => self.on_position(position),
            ReactorEvent::Heading(heading) => self.on_heading(heading),
            ReactorEvent::HeadingLost => self.on_heading_lost(),
            ReactorEvent::PositionLost => self.on_position_lost(),
            ReactorEvent::Destination {
                latitude,
                longitude,
            } => self.on_destination_changed(&latitude, &longitude),
            ReactorEvent::ClearDestination => self.clear_destination(),
        }
    }

    /// Most recently computed snapshot.
    pub fn derived(&self) -> DerivedState {
        self.derived
    }

    /// Current position, if any.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Current heading, if any.
    pub fn heading(&self) -> Option<Heading> {
        self.heading
    }

    /// Current destination, if any.
    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    /// Tracker state.
    pub fn continuity(&self) -> ContinuityState {
        self.tracker.state()
    }

    /// Active configuration.
    pub fn config(&self) -> &ReactorConfig {
        &self.config
    }

    fn recompute(&mut self) -> DerivedState {
        let derived = match (self.position, self.destination) {
            (Some(position), Some(destination)) => {
                let route = great_circle(position.coordinate, destination);

                match self.heading {
                    Some(heading) => {
                        let ideal = ideal_angle(route.bearing_degrees, heading.degrees());
                        let rotation = self.tracker.advance(ideal);
                        DerivedState::with_rotation(route, rotation)
                    }
                    None => DerivedState::route_only(route),
                }
            }
            _ => {
                // No bearing: the next one starts a fresh rotation.
                self.tracker.reset();
                DerivedState::EMPTY
            }
        };

        tracing::trace!(
            distance_m = ?derived.distance_meters,
            bearing = ?derived.bearing_degrees,
            continuous = ?derived.continuous_rotation,
            display = ?derived.display_rotation,
            "Derived state recomputed"
        );

        self.derived = derived;
        derived
    }
}

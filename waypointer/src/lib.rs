//! Waypointer - keeps a direction arrow pointed at a destination
//!
//! Given a stream of position fixes, a stream of compass headings and a
//! destination typed in by the user, this library derives the distance and
//! initial great-circle bearing to the destination, plus a rotation angle for
//! an on-screen arrow that stays continuous as it swings across north.
//!
//! # Architecture
//!
//! ```text
//! SensorFeed ──► forwarders ──┐
//!                             ├──► ReactorService ──► DerivedState broadcast
//! destination text ───────────┘        │
//!                                      ├── geo::great_circle       (distance, bearing)
//!                                      └── AngleContinuityTracker  (continuous rotation)
//! ```
//!
//! # Modules
//!
//! - [`geo`] - coordinates, headings, great-circle distance and bearing
//! - [`continuity`] - unwrapping ideal angles into a continuous rotation
//! - [`reactor`] - merging the three inputs and publishing snapshots
//! - [`sensor`] - sensor feed abstraction and forwarders
//! - [`config`] - `config.ini` handling
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod continuity;
pub mod geo;
pub mod logging;
pub mod reactor;
pub mod sensor;

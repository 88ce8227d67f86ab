//! Geographic primitives and great-circle math.
//!
//! Provides the coordinate, position and heading value types consumed by the
//! reactor, along with the pure bearing/distance calculation between two
//! coordinates on a spherical earth.
//!
//! # Example
//!
//! ```
//! use waypointer::geo::{great_circle, Coordinate};
//!
//! let here = Coordinate::new(35.0, 139.0).unwrap();
//! let there = Coordinate::new(35.01, 139.0).unwrap();
//!
//! let route = great_circle(here, there);
//! assert!(route.bearing_degrees < 0.5 || route.bearing_degrees > 359.5);
//! assert!((route.distance_meters - 1113.0).abs() < 5.0);
//! ```

mod angle;
mod great_circle;
mod types;

pub use angle::{normalize_degrees, shortest_delta};
pub use great_circle::{
    bearing, distance, great_circle, GreatCircle, COINCIDENT_METERS, EARTH_RADIUS_METERS,
};
pub use types::{Coordinate, GeoError, Heading, Position, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

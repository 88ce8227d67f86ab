//! Geographic value types: coordinates, positions and headings.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors raised when constructing a validated coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not finite.
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// A point on the earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting out-of-range or non-finite values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a coordinate without range checks.
    ///
    /// The great-circle functions accept whatever they are given; callers
    /// using this constructor are responsible for passing sane values.
    pub const fn from_degrees_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse a coordinate from two free-text fields.
    ///
    /// Surrounding whitespace is ignored. Returns `None` if either field is
    /// not a number or the result is out of range.
    pub fn parse(latitude: &str, longitude: &str) -> Option<Self> {
        let latitude = latitude.trim().parse::<f64>().ok()?;
        let longitude = longitude.trim().parse::<f64>().ok()?;
        Self::new(latitude, longitude).ok()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}°, {:.6}°)", self.latitude, self.longitude)
    }
}

/// A position fix. Only the most recent one matters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Where the fix was taken.
    pub coordinate: Coordinate,
    /// When the fix was received.
    pub timestamp: Instant,
}

impl Position {
    /// Create a position fix stamped with the current time.
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            timestamp: Instant::now(),
        }
    }

    /// Create a position fix with the time it was actually taken.
    pub fn with_timestamp(coordinate: Coordinate, timestamp: Instant) -> Self {
        Self {
            coordinate,
            timestamp,
        }
    }
}

/// True heading of the device in degrees, always in [0, 360).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Heading(f64);

impl Heading {
    /// Wrap a raw heading reading.
    ///
    /// Compass sensors report a negative heading when they have no fix, so
    /// anything outside [0, 360) is treated as a failed reading.
    pub fn new(degrees: f64) -> Option<Self> {
        if degrees.is_finite() && (0.0..360.0).contains(&degrees) {
            Some(Self(degrees))
        } else {
            None
        }
    }

    /// Heading in degrees.
    pub fn degrees(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_coordinate_rejects_out_of_range() {
        assert!(matches!(
            Coordinate::new(90.5, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Coordinate::new(0.0, -180.1),
            Err(GeoError::InvalidLongitude(_))
        ));
        assert!(matches!(
            Coordinate::new(f64::NAN, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Coordinate::new(0.0, f64::INFINITY),
            Err(GeoError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_coordinate_parse() {
        let coord = Coordinate::parse(" 35.01 ", "139.0").unwrap();
        assert_eq!(coord.latitude, 35.01);
        assert_eq!(coord.longitude, 139.0);

        assert!(Coordinate::parse("", "139.0").is_none());
        assert!(Coordinate::parse("35.0", "east").is_none());
        assert!(Coordinate::parse("91", "0").is_none());
        assert!(Coordinate::parse("NaN", "0").is_none());
    }

    #[test]
    fn test_heading_validation() {
        assert_eq!(Heading::new(0.0).map(Heading::degrees), Some(0.0));
        assert_eq!(Heading::new(359.9).map(Heading::degrees), Some(359.9));
        assert!(Heading::new(-1.0).is_none());
        assert!(Heading::new(360.0).is_none());
        assert!(Heading::new(f64::NAN).is_none());
    }

    #[test]
    fn test_error_display() {
        let err = GeoError::InvalidLatitude(95.0);
        assert!(err.to_string().contains("Invalid latitude"));
        assert!(err.to_string().contains("95"));
    }
}

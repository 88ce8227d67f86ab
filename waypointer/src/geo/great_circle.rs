//! Great-circle distance and initial bearing on a spherical earth.

use serde::Serialize;

use super::angle::normalize_degrees;
use super::types::Coordinate;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Separation below which two coordinates name the same place.
///
/// Catches the same point written two ways, such as either pole at any
/// longitude or the antimeridian as +180 and -180.
pub const COINCIDENT_METERS: f64 = 1e-6;

/// Distance and initial bearing between two coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GreatCircle {
    /// Great-circle distance in meters.
    pub distance_meters: f64,
    /// Initial bearing in degrees (0-360), where 0 = North, 90 = East.
    pub bearing_degrees: f64,
}

/// Compute distance and initial bearing from `start` to `end`.
pub fn great_circle(start: Coordinate, end: Coordinate) -> GreatCircle {
    GreatCircle {
        distance_meters: distance(start, end),
        bearing_degrees: bearing(start, end),
    }
}

/// Initial bearing (forward azimuth) from `start` to `end`.
///
/// Returns bearing in degrees (0-360), where 0 = North, 90 = East.
/// Coincident points have no direction and return 0.
pub fn bearing(start: Coordinate, end: Coordinate) -> f64 {
    if start == end || distance(start, end) < COINCIDENT_METERS {
        return 0.0;
    }

    let lat1 = start.latitude.to_radians();
    let lat2 = end.latitude.to_radians();
    let dlon = (end.longitude - start.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Haversine distance from `start` to `end` in meters.
///
/// Zero for coincident points and exactly `π·R` for antipodal ones.
pub fn distance(start: Coordinate, end: Coordinate) -> f64 {
    let lat1 = start.latitude.to_radians();
    let lat2 = end.latitude.to_radians();
    let dlat = (end.latitude - start.latitude).to_radians();
    let dlon = (end.longitude - start.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `a` slightly past 1 near the antipode.
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    let meters = EARTH_RADIUS_METERS * c;
    if meters < COINCIDENT_METERS {
        0.0
    } else {
        meters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = coord(0.0, 0.0);
        // North
        assert!((bearing(origin, coord(1.0, 0.0)) - 0.0).abs() < 0.1);
        // East
        assert!((bearing(origin, coord(0.0, 1.0)) - 90.0).abs() < 0.1);
        // South
        assert!((bearing(origin, coord(-1.0, 0.0)) - 180.0).abs() < 0.1);
        // West
        assert!((bearing(origin, coord(0.0, -1.0)) - 270.0).abs() < 0.1);
    }

    #[test]
    fn test_short_hop_due_north() {
        let result = great_circle(coord(35.0, 139.0), coord(35.01, 139.0));
        assert!(
            result.bearing_degrees < 0.5 || result.bearing_degrees > 359.5,
            "Expected ~0°, got {}°",
            result.bearing_degrees
        );
        assert!(
            (result.distance_meters - 1113.0).abs() < 5.0,
            "Expected ~1113m, got {}m",
            result.distance_meters
        );
    }

    #[test]
    fn test_coincident_points() {
        let tokyo = coord(35.6762, 139.6503);
        assert_eq!(bearing(tokyo, tokyo), 0.0);
        assert_eq!(distance(tokyo, tokyo), 0.0);
    }

    #[test]
    fn test_same_place_written_differently() {
        // Poles at any longitude
        let north = coord(90.0, 0.0);
        let also_north = coord(90.0, 50.0);
        assert_eq!(distance(north, also_north), 0.0);
        assert_eq!(bearing(north, also_north), 0.0);

        // Antimeridian from either side
        let east = coord(0.0, 180.0);
        let west = coord(0.0, -180.0);
        assert_eq!(distance(east, west), 0.0);
        assert_eq!(bearing(east, west), 0.0);
    }

    #[test]
    fn test_unchecked_coordinates_share_the_math() {
        const ORIGIN: Coordinate = Coordinate::from_degrees_unchecked(0.0, 0.0);
        const EAST: Coordinate = Coordinate::from_degrees_unchecked(0.0, 1.0);

        let route = great_circle(ORIGIN, EAST);
        assert_eq!(route.bearing_degrees, 90.0);
        assert!((route.distance_meters - 111_195.0).abs() < 1.0);
        assert_eq!(ORIGIN, coord(0.0, 0.0));
    }

    #[test]
    fn test_antipodal_distance_is_half_circumference() {
        let d = distance(coord(0.0, 0.0), coord(0.0, 180.0));
        assert!((d - PI * EARTH_RADIUS_METERS).abs() < 1e-6);

        let d = distance(coord(90.0, 0.0), coord(-90.0, 0.0));
        assert!((d - PI * EARTH_RADIUS_METERS).abs() < 1e-6);
    }

    #[test]
    fn test_distance_grows_with_separation() {
        let start = coord(53.5, 10.0);
        let mut previous = 0.0;
        for step in 1..=20 {
            let end = coord(53.5 + step as f64 * 1.5, 10.0);
            let d = distance(start, end);
            assert!(d > previous, "distance should grow: {} <= {}", d, previous);
            previous = d;
        }
    }

    #[test]
    fn test_bearing_london_to_new_york() {
        // Known initial bearing ~288°
        let b = bearing(coord(51.5074, -0.1278), coord(40.7128, -74.0060));
        assert!((b - 288.3).abs() < 1.0, "Expected ~288°, got {}°", b);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use crate::geo::angle::shortest_delta;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_bearing_always_in_range(
                lat1 in -90.0..=90.0_f64,
                lon1 in -180.0..=180.0_f64,
                lat2 in -90.0..=90.0_f64,
                lon2 in -180.0..=180.0_f64,
            ) {
                let b = bearing(coord(lat1, lon1), coord(lat2, lon2));
                prop_assert!((0.0..360.0).contains(&b), "bearing out of range: {}", b);
            }

            #[test]
            fn test_distance_to_self_is_zero(
                lat in -90.0..=90.0_f64,
                lon in -180.0..=180.0_f64,
            ) {
                let a = coord(lat, lon);
                prop_assert_eq!(distance(a, a), 0.0);
            }

            #[test]
            fn test_distance_never_exceeds_half_circumference(
                lat1 in -90.0..=90.0_f64,
                lon1 in -180.0..=180.0_f64,
                lat2 in -90.0..=90.0_f64,
                lon2 in -180.0..=180.0_f64,
            ) {
                let d = distance(coord(lat1, lon1), coord(lat2, lon2));
                prop_assert!(d >= 0.0);
                prop_assert!(d <= PI * EARTH_RADIUS_METERS + 1e-6);
            }

            #[test]
            fn test_reciprocal_bearing_at_short_range(
                lat in -60.0..60.0_f64,
                lon in -170.0..170.0_f64,
                dlat in -0.05..0.05_f64,
                dlon in -0.05..0.05_f64,
            ) {
                prop_assume!(dlat.abs() > 1e-3 || dlon.abs() > 1e-3);

                let a = coord(lat, lon);
                let b = coord(lat + dlat, lon + dlon);
                let forward = bearing(a, b);
                let back = bearing(b, a);

                let mismatch = shortest_delta(forward, normalize_degrees(back + 180.0)).abs();
                prop_assert!(
                    mismatch < 0.2,
                    "forward {} vs reciprocal {} differ by {}",
                    forward, back, mismatch
                );
            }
        }
    }
}

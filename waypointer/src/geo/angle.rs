//! Angle normalization helpers.

/// Normalize an angle in degrees into [0, 360).
///
/// `rem_euclid` can round a tiny negative input up to exactly 360.0, so that
/// case is folded back to 0.
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Signed shortest rotation from `from` to `to`, in [-180, 180].
///
/// Handles wraparound: 350° to 10° is +20°, not -340°.
#[inline]
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    let mut delta = to - normalize_degrees(from);
    if delta > 180.0 {
        delta -= 360.0;
    }
    if delta < -180.0 {
        delta += 360.0;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(0.0) - 0.0).abs() < 0.001);
        assert!((normalize_degrees(360.0) - 0.0).abs() < 0.001);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 0.001);
        assert!((normalize_degrees(450.0) - 90.0).abs() < 0.001);
        assert!((normalize_degrees(-450.0) - 270.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_tiny_negative_never_returns_360() {
        let normalized = normalize_degrees(-1e-15);
        assert!((0.0..360.0).contains(&normalized), "got {}", normalized);
    }

    #[test]
    fn test_shortest_delta() {
        assert!((shortest_delta(80.0, 90.0) - 10.0).abs() < 0.001);
        assert!((shortest_delta(90.0, 80.0) + 10.0).abs() < 0.001);

        // Wraparound
        assert!((shortest_delta(350.0, 10.0) - 20.0).abs() < 0.001);
        assert!((shortest_delta(10.0, 350.0) + 20.0).abs() < 0.001);

        // Unbounded source angle is folded before comparing
        assert!((shortest_delta(710.0, 10.0) - 20.0).abs() < 0.001);
        assert!((shortest_delta(-370.0, 340.0) + 10.0).abs() < 0.001);
    }

    #[test]
    fn test_shortest_delta_half_turn() {
        assert!((shortest_delta(0.0, 180.0) - 180.0).abs() < 0.001);
        assert!((shortest_delta(270.0, 90.0) + 180.0).abs() < 0.001);
    }
}

//! Angle unwrapping for smooth indicator rotation.

use serde::Serialize;

use crate::geo::{normalize_degrees, shortest_delta};

/// Accumulated rotation carried between samples.
///
/// Owned by exactly one [`AngleContinuityTracker`]. `None` means the next
/// sample is a cold start.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContinuityState {
    /// Last continuous (unbounded) angle emitted, in degrees.
    pub last_continuous_angle: Option<f64>,
}

/// One step of tracker output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RotationSample {
    /// Accumulated rotation in degrees. Unbounded and signed.
    pub continuous: f64,
    /// `continuous` folded into [0, 360) for display.
    pub display: f64,
}

/// Converts independently computed ideal angles into a continuous rotation.
///
/// Every ideal angle arrives freshly wrapped into [0, 360) with no memory of
/// previous values. Feeding them straight into an animated rotation makes the
/// indicator spin the long way round whenever the angle crosses north. The
/// tracker instead keeps an unbounded accumulator and always moves it by the
/// shortest signed delta, so 350° followed by 10° becomes 350° → 370°.
///
/// # Usage
///
/// ```
/// use waypointer::continuity::AngleContinuityTracker;
///
/// let mut tracker = AngleContinuityTracker::new();
///
/// assert_eq!(tracker.advance(350.0).continuous, 350.0);
/// let sample = tracker.advance(10.0);
/// assert_eq!(sample.continuous, 370.0);
/// assert_eq!(sample.display, 10.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AngleContinuityTracker {
    state: ContinuityState,
}

impl AngleContinuityTracker {
    /// Create a tracker with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker resuming from existing state.
    pub fn with_state(state: ContinuityState) -> Self {
        Self { state }
    }

    /// Feed the next ideal angle (degrees, [0, 360)).
    pub fn advance(&mut self, ideal: f64) -> RotationSample {
        let continuous = match self.state.last_continuous_angle {
            None => ideal,
            // Fold against the wrapped last angle, accumulate on the raw one.
            Some(last) => last + shortest_delta(last, ideal),
        };

        self.state.last_continuous_angle = Some(continuous);

        RotationSample {
            continuous,
            display: normalize_degrees(continuous),
        }
    }

    /// Forget all history; the next sample is a cold start.
    pub fn reset(&mut self) {
        if self.state.last_continuous_angle.take().is_some() {
            tracing::debug!("Continuity tracker reset");
        }
    }

    /// Last continuous angle emitted, if any.
    pub fn last_continuous_angle(&self) -> Option<f64> {
        self.state.last_continuous_angle
    }

    /// Snapshot of the tracker state.
    pub fn state(&self) -> ContinuityState {
        self.state
    }
}

/// Rotation the indicator should show, ignoring continuity.
///
/// `(bearing - heading)` normalized into [0, 360).
#[inline]
pub fn ideal_angle(bearing_degrees: f64, heading_degrees: f64) -> f64 {
    normalize_degrees(bearing_degrees - heading_degrees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cold_start_returns_ideal() {
        let mut tracker = AngleContinuityTracker::new();
        let sample = tracker.advance(123.0);
        assert_eq!(sample.continuous, 123.0);
        assert_eq!(sample.display, 123.0);
        assert_eq!(tracker.last_continuous_angle(), Some(123.0));
    }

    #[test]
    fn test_crossing_north_clockwise() {
        let mut tracker = AngleContinuityTracker::new();
        let first = tracker.advance(350.0);
        let second = tracker.advance(10.0);

        assert_eq!(first.continuous, 350.0);
        assert_eq!(first.display, 350.0);
        assert_eq!(second.continuous, 370.0);
        assert_eq!(second.display, 10.0);
    }

    #[test]
    fn test_crossing_north_counter_clockwise() {
        let mut tracker = AngleContinuityTracker::new();
        tracker.advance(10.0);
        let sample = tracker.advance(350.0);

        assert_eq!(sample.continuous, -10.0);
        assert_eq!(sample.display, 350.0);
    }

    #[test]
    fn test_multiple_revolutions_accumulate() {
        let mut tracker = AngleContinuityTracker::new();
        let mut last = tracker.advance(0.0);
        // Three full clockwise turns in 90° steps
        for step in 1..=12 {
            last = tracker.advance((step as f64 * 90.0) % 360.0);
        }
        assert_eq!(last.continuous, 1080.0);
        assert_eq!(last.display, 0.0);
    }

    #[test]
    fn test_folding_uses_wrapped_last_angle() {
        // Accumulator far from [0, 360) must still fold correctly.
        let mut tracker = AngleContinuityTracker::with_state(ContinuityState {
            last_continuous_angle: Some(725.0),
        });
        let sample = tracker.advance(15.0);
        assert_eq!(sample.continuous, 735.0);
        assert_eq!(sample.display, 15.0);

        let mut tracker = AngleContinuityTracker::with_state(ContinuityState {
            last_continuous_angle: Some(-725.0),
        });
        let sample = tracker.advance(350.0);
        assert_eq!(sample.continuous, -730.0);
        assert_eq!(sample.display, 350.0);
    }

    #[test]
    fn test_repeated_ideal_is_stable() {
        let mut tracker = AngleContinuityTracker::new();
        tracker.advance(350.0);
        tracker.advance(10.0);
        let again = tracker.advance(10.0);
        assert_eq!(again.continuous, 370.0);
    }

    #[test]
    fn test_reset_restarts_from_ideal() {
        let mut tracker = AngleContinuityTracker::new();
        tracker.advance(350.0);
        tracker.advance(10.0);

        tracker.reset();
        assert_eq!(tracker.last_continuous_angle(), None);

        let sample = tracker.advance(200.0);
        assert_eq!(sample.continuous, 200.0);
        assert_eq!(sample.display, 200.0);
    }

    #[test]
    fn test_ideal_angle() {
        assert_eq!(ideal_angle(90.0, 0.0), 90.0);
        assert_eq!(ideal_angle(90.0, 350.0), 100.0);
        assert_eq!(ideal_angle(10.0, 20.0), 350.0);
        assert_eq!(ideal_angle(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_heading_sweep_turns_short_way() {
        // Bearing 90: heading 0 → ideal 90, heading 350 → ideal 100
        let mut tracker = AngleContinuityTracker::new();
        let first = tracker.advance(ideal_angle(90.0, 0.0));
        let second = tracker.advance(ideal_angle(90.0, 350.0));
        assert_eq!(first.continuous, 90.0);
        assert_eq!(second.continuous, 100.0);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_steps_never_exceed_half_turn(
                ideals in prop::collection::vec(0.0..360.0_f64, 1..64)
            ) {
                let mut tracker = AngleContinuityTracker::new();
                let mut previous: Option<f64> = None;

                for ideal in ideals {
                    let sample = tracker.advance(ideal);
                    if let Some(prev) = previous {
                        let step = (sample.continuous - prev).abs();
                        prop_assert!(step <= 180.0 + 1e-9, "step of {}° from {} to {}", step, prev, sample.continuous);
                    }
                    previous = Some(sample.continuous);
                }
            }

            #[test]
            fn test_display_matches_continuous(
                ideals in prop::collection::vec(0.0..360.0_f64, 1..64)
            ) {
                let mut tracker = AngleContinuityTracker::new();

                for ideal in ideals {
                    let sample = tracker.advance(ideal);
                    prop_assert!((0.0..360.0).contains(&sample.display));

                    let expected = normalize_degrees(sample.continuous);
                    let error = shortest_delta(expected, sample.display).abs();
                    prop_assert!(error < 1e-6, "display {} vs continuous {}", sample.display, sample.continuous);

                    // Display tracks the ideal angle itself
                    let tracking = shortest_delta(ideal, sample.display).abs();
                    prop_assert!(tracking < 1e-6, "display {} vs ideal {}", sample.display, ideal);
                }
            }

            #[test]
            fn test_cold_start_after_reset(
                history in prop::collection::vec(0.0..360.0_f64, 0..16),
                ideal in 0.0..360.0_f64,
            ) {
                let mut tracker = AngleContinuityTracker::new();
                for angle in history {
                    tracker.advance(angle);
                }

                tracker.reset();
                let sample = tracker.advance(ideal);
                prop_assert_eq!(sample.continuous, ideal);
                prop_assert_eq!(sample.display, ideal);
            }
        }
    }
}

//! Indicator rotation continuity.
//!
//! The bearing to the destination and the device heading are both wrapped
//! angles. Their difference, the *ideal* rotation, jumps from 359° to 0°
//! whenever it crosses north. This module turns that sawtooth into a
//! continuous, unbounded rotation suitable for animation, plus the matching
//! display angle in [0, 360).
//!
//! ```text
//! ideal:      350 ──► 10 ──► 30 ──► 350
//! continuous: 350 ──► 370 ─► 390 ─► 350
//! display:    350 ──► 10 ──► 30 ──► 350
//! ```

mod tracker;

pub use tracker::{ideal_angle, AngleContinuityTracker, ContinuityState, RotationSample};

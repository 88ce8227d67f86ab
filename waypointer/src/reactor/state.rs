//! Published output of the reactor.

use std::fmt;

use serde::Serialize;

use crate::continuity::RotationSample;
use crate::geo::GreatCircle;

/// Snapshot of everything derived from position, heading and destination.
///
/// Distance and bearing are present whenever both position and destination
/// are known. The rotation fields additionally need a heading, so they are
/// never present without distance and bearing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedState {
    /// Great-circle distance to the destination in meters.
    pub distance_meters: Option<f64>,
    /// Initial bearing to the destination in degrees [0, 360).
    pub bearing_degrees: Option<f64>,
    /// Accumulated indicator rotation in degrees (unbounded).
    pub continuous_rotation: Option<f64>,
    /// Indicator rotation folded into [0, 360).
    pub display_rotation: Option<f64>,
}

impl DerivedState {
    /// Nothing known yet.
    pub const EMPTY: DerivedState = DerivedState {
        distance_meters: None,
        bearing_degrees: None,
        continuous_rotation: None,
        display_rotation: None,
    };

    /// Route known, rotation unknown (no heading).
    pub fn route_only(route: GreatCircle) -> Self {
        Self {
            distance_meters: Some(route.distance_meters),
            bearing_degrees: Some(route.bearing_degrees),
            continuous_rotation: None,
            display_rotation: None,
        }
    }

    /// Route and rotation both known.
    pub fn with_rotation(route: GreatCircle, rotation: RotationSample) -> Self {
        Self {
            distance_meters: Some(route.distance_meters),
            bearing_degrees: Some(route.bearing_degrees),
            continuous_rotation: Some(rotation.continuous),
            display_rotation: Some(rotation.display),
        }
    }

    /// Whether distance and bearing are available.
    pub fn has_route(&self) -> bool {
        self.distance_meters.is_some() && self.bearing_degrees.is_some()
    }

    /// Rotation pair, if available.
    pub fn rotation(&self) -> Option<RotationSample> {
        Some(RotationSample {
            continuous: self.continuous_rotation?,
            display: self.display_rotation?,
        })
    }
}

impl fmt::Display for DerivedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.distance_meters, self.bearing_degrees) {
            (Some(distance), Some(bearing)) => {
                write!(f, "distance {:.0} m, bearing {:.1}°", distance, bearing)?;
                match self.rotation() {
                    Some(rotation) => write!(
                        f,
                        ", rotation {:.1}° (continuous {:.1}°)",
                        rotation.display, rotation.continuous
                    ),
                    None => write!(f, ", rotation calculating..."),
                }
            }
            _ => write!(f, "calculating..."),
        }
    }
}

//! Input events accepted by the reactor.

use crate::geo::{Heading, Position};

/// One update from any of the reactor's input sources.
///
/// Position and heading come from the sensor feed; destination edits come
/// from the user. All of them are funnelled through a single queue and
/// applied strictly in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ReactorEvent {
    /// New position fix.
    Position(Position),
    /// New valid heading reading.
    Heading(Heading),
    /// Heading is no longer known.
    HeadingLost,
    /// Position is no longer known.
    PositionLost,
    /// Destination text fields changed.
    Destination {
        /// Raw latitude text.
        latitude: String,
        /// Raw longitude text.
        longitude: String,
    },
    /// Destination removed.
    ClearDestination,
}

impl ReactorEvent {
    /// Build a destination edit from anything string-like.
    pub fn destination(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        ReactorEvent::Destination {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    /// Short name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactorEvent::Position(_) => "position",
            ReactorEvent::Heading(_) => "heading",
            ReactorEvent::HeadingLost => "heading_lost",
            ReactorEvent::PositionLost => "position_lost",
            ReactorEvent::Destination { .. } => "destination",
            ReactorEvent::ClearDestination => "clear_destination",
        }
    }
}

impl std::fmt::Display for ReactorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

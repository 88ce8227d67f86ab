//! Derived State Reactor
//!
//! Merges three independently updating inputs into one consistent snapshot:
//!
//! - **Position** from the sensor feed
//! - **Heading** from the sensor feed
//! - **Destination** typed in by the user as two text fields
//!
//! Whenever any of them changes, the reactor recomputes distance and bearing
//! to the destination and feeds `bearing - heading` through the
//! [`AngleContinuityTracker`](crate::continuity::AngleContinuityTracker) to
//! produce a rotation that never snaps across north.
//!
//! # Components
//!
//! - [`DerivedStateReactor`] - synchronous core, one recomputation per mutator
//! - [`ReactorService`] / [`ReactorHandle`] - single-consumer actor that
//!   serializes events from concurrent producers and broadcasts snapshots
//! - [`ReactorEvent`] - tagged union of every input
//! - [`DerivedState`] - published snapshot
//!
//! # Example
//!
//! ```ignore
//! use tokio_util::sync::CancellationToken;
//! use waypointer::reactor::{DerivedStateReactor, ReactorService};
//!
//! let handle = ReactorService::spawn(DerivedStateReactor::new(), CancellationToken::new());
//! let mut rx = handle.subscribe();
//!
//! handle.destination("35.01", "139.0")?;
//! while let Ok(state) = rx.recv().await {
//!     println!("{}", state);
//! }
//! ```

mod engine;
mod event;
mod service;
mod state;

pub use engine::{
    DerivedStateReactor, HeadingGapPolicy, ReactorConfig, DEFAULT_BROADCAST_CAPACITY,
};
pub use event::ReactorEvent;
pub use service::{ReactorError, ReactorHandle, ReactorService};
pub use state::DerivedState;

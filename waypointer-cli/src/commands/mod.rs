//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`bearing`] - One-shot distance and bearing between two points
//! - [`run`] - Replay a sensor script through the reactor

pub mod bearing;
pub mod run;

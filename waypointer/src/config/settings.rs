//! Configuration structs and their defaults.

use std::path::PathBuf;

use crate::reactor::{HeadingGapPolicy, ReactorConfig, DEFAULT_BROADCAST_CAPACITY};

/// Default directory for log files, relative to the working directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "waypointer.log";

/// Complete user configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// `[tracker]` section.
    pub tracker: TrackerSettings,
    /// `[reactor]` section.
    pub reactor: ReactorSettings,
    /// `[logging]` section.
    pub logging: LoggingSettings,
}

/// Rotation tracker settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerSettings {
    /// What happens to accumulated rotation when the heading drops out.
    pub heading_gap: HeadingGapPolicy,
}

/// Reactor service settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactorSettings {
    /// Snapshots buffered per subscriber before it starts lagging.
    pub broadcast_capacity: usize,
}

impl Default for ReactorSettings {
    fn default() -> Self {
        Self {
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory log files are written to.
    pub directory: PathBuf,
    /// Log file name inside `directory`.
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl ConfigFile {
    /// Reactor configuration derived from these settings.
    pub fn reactor_config(&self) -> ReactorConfig {
        ReactorConfig {
            heading_gap: self.tracker.heading_gap,
            broadcast_capacity: self.reactor.broadcast_capacity,
        }
    }
}

//! User configuration (`config.ini`).
//!
//! Settings are read with `rust-ini`, overlaid on defaults, and validated.
//! A missing file is not an error: every setting has a default.
//!
//! ```ini
//! [tracker]
//! heading_gap = suspend
//!
//! [reactor]
//! broadcast_capacity = 64
//!
//! [logging]
//! directory = logs
//! file = waypointer.log
//! ```

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, LoggingSettings, ReactorSettings, TrackerSettings, DEFAULT_LOG_DIR,
    DEFAULT_LOG_FILE,
};

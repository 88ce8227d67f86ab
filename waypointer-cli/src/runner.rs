//! CLI runner for common setup.
//!
//! Loads the config file and initializes logging so command handlers don't
//! have to.

use std::path::Path;

use tracing::info;
use waypointer::config::ConfigFile;
use waypointer::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config (from `config_path`, or the default location) and start
    /// logging.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Waypointer v{}", env!("CARGO_PKG_VERSION"));
        info!(
            log_file = %self.logging_guard.path().display(),
            heading_gap = %self.config.tracker.heading_gap,
            "Waypointer CLI: {} command",
            command
        );
    }
}

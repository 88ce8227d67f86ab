//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use waypointer::config::ConfigFileError;
use waypointer::geo::GeoError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Coordinate given on the command line is out of range
    InvalidCoordinate(GeoError),
    /// Script line could not be parsed
    Script { line: usize, message: String },
    /// Failed to read the script
    ScriptRead { path: String, error: std::io::Error },
    /// Failed to serialize a snapshot
    Output(serde_json::Error),
    /// Failed to write to stdout
    Write(std::io::Error),
    /// Failed to start the async runtime or signal handler
    Runtime(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Script { .. } = self {
            eprintln!();
            eprintln!("Script commands:");
            eprintln!("  pos LAT LON      position fix");
            eprintln!("  hdg DEG          compass heading");
            eprintln!("  dest LAT LON     destination text");
            eprintln!("  clear            remove the destination");
            eprintln!("  heading-lost     compass reading unavailable");
            eprintln!("  position-lost    position fix unavailable");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::InvalidCoordinate(e) => write!(f, "Invalid coordinate: {}", e),
            CliError::Script { line, message } => {
                write!(f, "Script error on line {}: {}", line, message)
            }
            CliError::ScriptRead { path, error } => {
                write!(f, "Failed to read script '{}': {}", path, error)
            }
            CliError::Output(e) => write!(f, "Failed to serialize output: {}", e),
            CliError::Write(e) => write!(f, "Failed to write output: {}", e),
            CliError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::InvalidCoordinate(e) => Some(e),
            CliError::ScriptRead { error, .. } => Some(error),
            CliError::Output(e) => Some(e),
            CliError::Write(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<GeoError> for CliError {
    fn from(e: GeoError) -> Self {
        CliError::InvalidCoordinate(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}

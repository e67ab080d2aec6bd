//! CLI error handling with user-friendly messages.

use std::fmt;
use std::process;

use its_quadkeys::config::ConfigFileError;
use its_quadkeys::QuadError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid path, region or depth given on the command line
    Input(QuadError),
    /// Configuration file could not be loaded
    Config(ConfigFileError),
    /// Failed to serialize output
    Output(serde_json::Error),
}

impl CliError {
    /// Exit the process with an error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Config(_) = self {
            eprintln!();
            eprintln!(
                "Check the [topics] and [roi] sections of the file, or pass another one with --config."
            );
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Input(e) => write!(f, "{}", e),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Input(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Output(e) => Some(e),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<QuadError> for CliError {
    fn from(e: QuadError) -> Self {
        CliError::Input(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}

//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use basestation::config::ConfigFileError;
use basestation::packet::PacketError;
use basestation::persistence::PersistenceError;
use basestation::producer::{LiveError, ReplayError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Configuration file could not be read or written
    ConfigFile(ConfigFileError),
    /// Unsupported protocol version requested
    Packet(PacketError),
    /// Failed to open the live input
    Input { path: String, error: std::io::Error },
    /// Live acquisition failed
    Live(LiveError),
    /// Recording could not be loaded or saved
    Persistence(PersistenceError),
    /// Replay could not be set up
    Replay(ReplayError),
    /// A background task panicked or was aborted
    Task(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Input { .. } => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. Wrong device node: check the receiver with 'ls /dev/tty*'");
                eprintln!("  2. Permissions: you may need to add your user to the 'dialout' group");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Packet(e) => write!(f, "{}", e),
            CliError::Input { path, error } => {
                write!(f, "Failed to open input '{}': {}", path, error)
            }
            CliError::Live(e) => write!(f, "Live acquisition failed: {}", e),
            CliError::Persistence(e) => write!(f, "{}", e),
            CliError::Replay(e) => write!(f, "Replay failed: {}", e),
            CliError::Task(msg) => write!(f, "Background task failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Packet(e) => Some(e),
            CliError::Input { error, .. } => Some(error),
            CliError::Live(e) => Some(e),
            CliError::Persistence(e) => Some(e),
            CliError::Replay(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<PacketError> for CliError {
    fn from(e: PacketError) -> Self {
        CliError::Packet(e)
    }
}

impl From<LiveError> for CliError {
    fn from(e: LiveError) -> Self {
        CliError::Live(e)
    }
}

impl From<PersistenceError> for CliError {
    fn from(e: PersistenceError) -> Self {
        CliError::Persistence(e)
    }
}

impl From<ReplayError> for CliError {
    fn from(e: ReplayError) -> Self {
        CliError::Replay(e)
    }
}

impl From<tokio::task::JoinError> for CliError {
    fn from(e: tokio::task::JoinError) -> Self {
        CliError::Task(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_messages() {
        let err = CliError::Config("bad zone".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad zone");

        let err = CliError::from(PacketError::UnsupportedVersion(2020));
        assert!(err.to_string().contains("2020"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_input_error_keeps_source() {
        let err = CliError::Input {
            path: "/dev/ttyUSB0".to_string(),
            error: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/dev/ttyUSB0"));
        assert!(err.source().is_some());
    }
}

//! Host Error Types

use thiserror::Error;

/// Errors that stop the host loop
#[derive(Debug, Error)]
pub enum HostError {
    /// Settings could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Serial port could not be opened
    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Read or write on the link failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown log level name
    #[error("Invalid log level: {0}")]
    LogLevel(String),

    /// A global subscriber was already installed
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

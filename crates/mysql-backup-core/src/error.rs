//! Error types for the MySQL backup core library.

use std::fmt;

use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// The operation an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Backup,
    Restore,
    /// Standalone connectivity check
    Check,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Backup => write!(f, "backup"),
            Operation::Restore => write!(f, "restore"),
            Operation::Check => write!(f, "check"),
        }
    }
}

/// Main error type for the MySQL backup library.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The driver rejected the connection options before dialing
    #[error("failed to open driver for database: {0}")]
    DriverOpen(String),

    /// Connect or ping failed (unreachable host, auth rejected, timeout)
    #[error("failed to connect to database ({operation}): {message}")]
    Connectivity { operation: Operation, message: String },

    /// External dump/restore process failed to launch or exited non-zero
    #[error("failed executing {label}: {message}\n.Output:{output}")]
    ProcessExecution {
        label: String,
        message: String,
        output: String,
    },

    /// The caller cancelled the operation
    #[error("{0} cancelled")]
    Cancelled(Operation),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Captured process output, if this error came from an external process.
    pub fn process_output(&self) -> Option<&str> {
        match self {
            Error::ProcessExecution { output, .. } => Some(output),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

//! Error types for ghostport.
//!
//! Uses `thiserror` for ergonomic error definitions. Only [`ScanError`] and
//! [`ConfigError`] abort a run; [`ProbeError`] and [`OutputError`] are
//! recovered where they occur.

use crate::types::PortError;
use std::path::PathBuf;
use thiserror::Error;

/// Scan-level failures. All of these are raised before any probe is issued.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("invalid port range: {0}")]
    InvalidRange(#[from] PortError),

    #[error("unknown strategy: {0}")]
    StrategyDispatch(String),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Why a single connect attempt did not produce an open port.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("connection refused")]
    Refused,

    #[error("connection timed out")]
    TimedOut,

    #[error("network error: {0}")]
    Network(String),
}

impl From<std::io::Error> for ProbeError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::ConnectionRefused => Self::Refused,
            std::io::ErrorKind::TimedOut => Self::TimedOut,
            _ => Self::Network(e.to_string()),
        }
    }
}

/// Result sink failures. The caller falls back to console output.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Settings loading failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<PortError> for CliError {
    fn from(e: PortError) -> Self {
        Self::Scan(ScanError::InvalidRange(e))
    }
}

impl CliError {
    /// Process exit code for this error: 2 for usage errors, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Scan(_) => 2,
            Self::Config(_) => 1,
        }
    }
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_probe_error_from_io() {
        let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "nope");
        assert_eq!(ProbeError::from(refused), ProbeError::Refused);

        let timed_out = io::Error::new(io::ErrorKind::TimedOut, "slow");
        assert_eq!(ProbeError::from(timed_out), ProbeError::TimedOut);

        let other = io::Error::new(io::ErrorKind::AddrNotAvailable, "gone");
        assert!(matches!(ProbeError::from(other), ProbeError::Network(_)));
    }

    #[test]
    fn test_exit_codes() {
        let usage: CliError = ScanError::StrategyDispatch("9".into()).into();
        assert_eq!(usage.exit_code(), 2);

        let config: CliError = ConfigError::DirectoryNotFound.into();
        assert_eq!(config.exit_code(), 1);
    }
}

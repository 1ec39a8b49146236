//! Error types for chatline operations.
//!
//! This module provides the error hierarchy using `thiserror` for queries,
//! response extraction, configuration, I/O, and CLI commands. Every failure
//! path ends in one of these values; nothing in the library panics.

use thiserror::Error;

/// Result type alias for chatline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A query to the completion endpoint failed.
    #[error("query failed: {0}")]
    Query(#[from] QueryError),

    /// Settings could not be loaded, saved, or changed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors (file and terminal operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// A request was refused by the minimum-interval gate.
    #[error("requests are too frequent; wait {wait_ms} ms before the next one")]
    Throttled {
        /// Milliseconds left until the gate opens.
        wait_ms: u64,
    },
}

/// Failures of a single query, as seen by the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The API key is absent or still the placeholder.
    #[error("no valid API key configured. Run: chatline config set api-key <KEY>")]
    InvalidCredential,

    /// The outbound call failed at the network level.
    #[error("transport failure: {reason}")]
    TransportFailure {
        /// Description of the underlying fault.
        reason: String,
    },

    /// The endpoint answered with a non-success status.
    #[error("HTTP error: status {status}")]
    UnsuccessfulStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The response ended before the reply field was found.
    #[error("reply field not found in response")]
    PatternNotFound,

    /// The response ended inside the reply field.
    #[error("response ended before the reply was complete ({} chars received)", captured.chars().count())]
    Incomplete {
        /// Raw text captured before the stream ended.
        captured: String,
    },
}

/// End-of-stream outcomes of the response extractor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The target pattern never appeared.
    #[error("target pattern not found")]
    NotFound,

    /// The pattern was found but the value never closed.
    #[error("value not terminated before end of stream")]
    Incomplete {
        /// Raw text captured so far.
        captured: String,
    },
}

/// Settings errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file exists but could not be parsed.
    #[error("invalid settings file: {path}: {reason}")]
    Parse {
        /// Path to the settings file.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// A value given for a setting was rejected.
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        /// Setting name.
        key: String,
        /// Rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The platform has no configuration directory.
    #[error("no configuration directory available; pass --config")]
    NoConfigDir,

    /// Settings could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// I/O-specific errors for file and terminal operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Failed to read a file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write a file.
    #[error("failed to write file: {path}: {reason}")]
    WriteFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Directory creation error.
    #[error("failed to create directory: {path}: {reason}")]
    DirectoryFailed {
        /// Path to the directory.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<ExtractError> for QueryError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::NotFound => Self::PatternNotFound,
            ExtractError::Incomplete { captured } => Self::Incomplete { captured },
        }
    }
}

impl From<ExtractError> for Error {
    fn from(err: ExtractError) -> Self {
        Self::Query(err.into())
    }
}

// Implement From traits for library errors

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        Self::TransportFailure {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

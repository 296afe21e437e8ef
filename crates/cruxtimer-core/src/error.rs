//! Core error types for cruxtimer-core.
//!
//! A routine that yields no steps is reported through
//! [`ValidationError::EmptyTimeline`] and configuration problems through
//! [`ConfigError`]. Audio cue failures surface as [`CueError`] and are
//! swallowed by the runner.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cruxtimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// The routine produced no playable steps.
    #[error("routine contains no recognizable exercises")]
    EmptyTimeline,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Failure to produce an audio cue. Never fatal.
#[derive(Error, Debug)]
pub enum CueError {
    /// No audio output is available on this host.
    #[error("audio output unavailable")]
    Unavailable,

    /// The output device rejected the cue.
    #[error("failed to play cue: {0}")]
    Playback(String),
}

impl From<std::io::Error> for CueError {
    fn from(err: std::io::Error) -> Self {
        CueError::Playback(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

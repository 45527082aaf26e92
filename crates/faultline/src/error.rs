//! Error types for faultline operations.
//!
//! Analyses and topology mutations never fail on unknown component ids; those
//! are answered with empty results or treated as no-ops. The variants here
//! cover the outer ring: configuration, snapshot I/O, publishing, and lock
//! poisoning inside the topology store.

use std::io;
use thiserror::Error;

/// The error type for faultline operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The component repository could not supply or store a snapshot.
    #[error("Repository error: {0}")]
    Repository(String),

    /// An analysis result could not be handed to the publisher.
    #[error("Publish error: {0}")]
    Publish(String),

    /// Internal failure, such as a poisoned topology lock.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-specific errors surfaced while locating a workspace.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `.faultline/` directory was found.
    #[error("Not a faultline workspace (or any parent). Run 'faultline init' first.")]
    NotInitialized,
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

/// A specialized Result type for faultline operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Common error types for NetWith

use thiserror::Error;

/// Common result type for NetWith operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types used across NetWith services
#[derive(Error, Debug)]
pub enum Error {
    /// A discovery session was started with zero candidates
    #[error("Candidate pool is empty")]
    EmptyPool,

    /// A discovery session was queried before being started
    #[error("Session has not been started")]
    EmptySession,

    /// Candidate retrieval from storage failed
    #[error("Candidate fetch failed: {0}")]
    Fetch(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input provided by caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

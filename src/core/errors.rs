//! Error types for the Pet Connect service.

use thiserror::Error;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Rejected user input (blank message, missing required field).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The user already applied to adopt this pet.
    #[error("an application for this pet has already been submitted")]
    DuplicateApplication,
    /// The request carries no authenticated user.
    #[error("authentication required")]
    Unauthorized,
    /// Stored row could not be decoded.
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
    /// `SQLite` storage error (sync).
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// `SQLite` storage error (async).
    #[error("tokio-rusqlite error: {0}")]
    TokioSqlite(#[from] tokio_rusqlite::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Identifier parse error.
    #[error("invalid identifier: {0}")]
    Id(#[from] uuid::Error),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias.
pub type AppResult<T> = Result<T, AppError>;

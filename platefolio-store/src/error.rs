//! Error types for the store layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Referenced row absent (or not visible through the given filter).
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint rejected the write (duplicate handle,
    /// per-owner slug, or membership pair).
    #[error("already exists: {0}")]
    UniquenessViolation(String),

    /// More than one profile matched a case-insensitive handle lookup.
    /// Data-integrity fault: the store-level constraint should make this
    /// impossible, so it is surfaced, never resolved silently.
    #[error("handle is ambiguous: {0}")]
    AmbiguousHandle(String),

    /// A stored row failed to parse back into a record.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

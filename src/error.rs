//! Error types for the MyLibrary core
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! The taxonomy mirrors the layering of the crate: validation errors are
//! produced by the library service before any store access, identity conflicts
//! are produced after a store round-trip, and raw storage failures are
//! converted at the adapter boundary so callers never have to interpret
//! driver error text.
//!
//! All failures are terminal for the call that produced them; nothing in this
//! layer retries.

use thiserror::Error;

/// Result type alias using our LibraryError type
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Main error type for the MyLibrary core
#[derive(Error, Debug)]
pub enum LibraryError {
    // ===== Validation Errors =====
    // Detected by the library service before any store access

    /// Malformed or missing required field, or a length violation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reading status outside the closed enum (unread, read, currently reading)
    #[error("Invalid status '{0}'. Valid statuses are: unread, read, currently reading")]
    InvalidStatus(String),

    // ===== Identity Conflicts =====
    // Detected after a store round-trip, never silently merged

    /// A book with a case-insensitively matching title already exists
    #[error("Book '{0}' already exists in your library")]
    DuplicateBook(String),

    /// A book with the same ISBN already exists (store-level unique constraint)
    #[error("A book with ISBN '{0}' already exists in your library")]
    DuplicateIsbn(String),

    /// Update/delete target absent
    #[error("Not found: {0}")]
    NotFound(String),

    // ===== Throttling =====

    /// Per-operation rate limit exceeded (only when a throttle policy is injected)
    #[error("Rate limit exceeded for '{operation}'. Try again in {retry_after_ms} ms")]
    RateLimitExceeded {
        operation: String,
        /// Milliseconds until the operation may be retried
        retry_after_ms: u64,
    },

    // ===== Storage Errors =====

    /// Database schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Filesystem error while locating or creating the database
    #[error("File I/O error: {0}")]
    FileIoError(String),

    // ===== External Library Errors =====
    // Automatic conversions from external error types

    /// JSON serialization/deserialization error (authors column encoding)
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Database driver error from sqlx not otherwise classified
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl LibraryError {
    /// Whether this error was produced by input validation, i.e. before the
    /// call reached storage.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LibraryError::InvalidInput(_) | LibraryError::InvalidStatus(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_status_message_lists_valid_statuses() {
        let err = LibraryError::InvalidStatus("finished".to_string());
        let message = err.to_string();
        assert!(message.contains("finished"));
        assert!(message.contains("unread, read, currently reading"));
    }

    #[test]
    fn test_validation_classification() {
        assert!(LibraryError::InvalidInput("title".into()).is_validation());
        assert!(LibraryError::InvalidStatus("x".into()).is_validation());
        assert!(!LibraryError::DuplicateBook("Dune".into()).is_validation());
        assert!(!LibraryError::NotFound("Dune".into()).is_validation());
    }
}

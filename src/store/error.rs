//! Store error types
//!
//! Defines all errors that can occur in the persistence layer.

use thiserror::Error;

/// Errors that can occur in the job store
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation failed (creating the data directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite returned an error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Requested record does not exist (or belongs to another account)
    #[error("{0} not found")]
    NotFound(String),

    /// Unique constraint hit (duplicate email, second profile write)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A computed timestamp fell outside the representable range
    #[error("Timestamp out of range: {0}")]
    OutOfRange(String),
}

impl StoreError {
    pub(crate) fn job_not_found(id: &str) -> Self {
        StoreError::NotFound(format!("Job {}", id))
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::job_not_found("abc");
        assert_eq!(err.to_string(), "Job abc not found");

        let err = StoreError::Conflict("email already registered".to_string());
        assert_eq!(err.to_string(), "Conflict: email already registered");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let store_err: StoreError = io_err.into();
        assert!(matches!(store_err, StoreError::Io(_)));
    }
}

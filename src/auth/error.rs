//! Authentication error types

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while registering, signing in or resolving a session
#[derive(Error, Debug)]
pub enum AuthError {
    /// Registration form failed validation
    #[error("{0}")]
    Validation(String),

    /// Email already has an account
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Wrong email or password
    #[error("Failed to log in. Please check your credentials.")]
    InvalidCredentials,

    /// Missing, unknown, revoked or expired session token
    #[error("Authentication required")]
    Unauthenticated,

    /// Password hashing backend failed
    #[error("Password hashing error: {0}")]
    Hashing(String),

    /// Store layer error
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

use thiserror::Error;

use crate::domain::errors::StoreTimeout;

/// Error for CareerPathId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CareerPathIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for required text field validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TextFieldError {
    #[error("{field} is required")]
    Empty { field: &'static str },

    #[error("{field} too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, Error)]
pub enum CareerPathError {
    #[error("Invalid career path ID: {0}")]
    InvalidId(#[from] CareerPathIdError),

    #[error("Invalid career path: {0}")]
    InvalidField(#[from] TextFieldError),

    #[error("Career path not found: {0}")]
    NotFound(String),

    #[error("Career path belongs to another identity")]
    Forbidden,

    /// The owning identity no longer exists, e.g. deleted after the caller
    /// passed the authentication gate.
    #[error("Owner not found: {0}")]
    OwnerNotFound(String),

    #[error("Store timeout: {0}")]
    StoreTimeout(#[from] StoreTimeout),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

use thiserror::Error;

/// Errors produced by [`crate::AccountStore`] operations
///
/// Unknown-email and wrong-password logins both surface as
/// [`AccountError::InvalidCredentials`] so a caller cannot tell which of
/// the two happened. Deleting or resetting a missing id is not an error at
/// all; there is deliberately no `NotFound` variant for those paths.
#[derive(Clone, Error, Debug, PartialEq)]
pub enum AccountError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing error: {0}")]
    Hash(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

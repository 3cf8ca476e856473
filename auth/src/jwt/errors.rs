use thiserror::Error;

/// Error type for JWT operations.
///
/// The verification variants are for server-side logging. Callers facing a
/// client collapse all of them into a single "unauthorized" outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token is expired")]
    Expired,
}

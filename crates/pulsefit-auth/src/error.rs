use thiserror::Error;

/// Typed outcomes of token verification.
///
/// The distinction between variants is for internal logging only. Client
/// responses must collapse all of them into a single generic authentication
/// failure so the API gives no oracle for credential guessing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("expired token")]
    Expired,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

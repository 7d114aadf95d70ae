//! Error types for the unrepost library.
//!
//! One unified error type with explicit variants for transport failures,
//! remote API failures, signing failures, and input problems. The pagination
//! and deletion engines deliberately absorb most of these at their
//! normalization boundaries; only the CLI orchestration layer sees them.

use thiserror::Error;

/// The unified error type for unrepost operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status}: {excerpt}")]
    Http { status: u16, excerpt: String },

    /// The server answered 200 but reported a logical failure in the body.
    #[error("API error {status_code}: {message}")]
    Api { status_code: i64, message: String },

    /// The external signing service failed to produce a signed URL.
    #[error("signing error: {0}")]
    Signing(String),

    /// The username did not resolve to a platform user id.
    #[error("user @{username} not found")]
    UserNotFound { username: String },

    /// A response body could not be decoded.
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP transport error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

impl Error {
    /// Build an HTTP-status error, keeping only a short body excerpt for logs.
    pub(crate) fn http(status: u16, body: &str) -> Self {
        let excerpt: String = body.chars().take(100).collect();
        Error::Http { status, excerpt }
    }
}

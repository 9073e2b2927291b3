//! Shared client error type.

use thiserror::Error;

/// Errors that can occur when calling an external service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The service returned a non-2xx response or unexpected body.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

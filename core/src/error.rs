//! Error types for the relation client.
//!
//! # Design
//! Failures are split by where they happened: the network (`Transport`,
//! `Timeout`, `InvalidUrl`), the service's status line (`NotFound`, `Server`,
//! `HttpError`), or the body (`MalformedResponse`). Only network failures are
//! retryable; a 4xx answer is the service's final word.

use thiserror::Error;

/// Errors returned by `RelationClient` operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The service returned 404 for the requested URL.
    #[error("resource not found: {url}")]
    NotFound { url: String },

    /// The service returned a 5xx status.
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },

    /// The service returned a non-2xx status that is neither 404 nor 5xx.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response: connection refused, DNS, I/O.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The assembled URL could not be parsed by the transport.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The body was not JSON of the shape the accessor expects.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ApiError {
    /// True for failures that happened below HTTP; these may be retried.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout)
    }
}

//! Error types for the Alpha Vantage client.
//!
//! # Design
//! `ApiError` is the flat taxonomy every layer returns: local validation,
//! transport failures, logical errors reported inside a response body, and
//! bodies that do not match the expected shape. Operations on `Vantage` wrap
//! it in `Error` together with a description of the call, so the message
//! reads naturally while `Error::kind` still answers "which failure" without
//! string matching.

use thiserror::Error;

/// An options object failed validation. No request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct InvalidInput {
    /// Query parameter (or rule) that failed.
    pub field: &'static str,
    pub reason: String,
}

impl InvalidInput {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Coarse classification of an `ApiError`, for retry decisions and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    /// Non-success status, network failure, timeout or cancellation. May be
    /// transient.
    Transport,
    /// The service accepted the request but reported an error in the body.
    Logical,
    /// The body passed the error checks but did not match the expected shape.
    Decode,
}

/// Errors produced while building requests and decoding responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    /// Non-success status with a `{code, detail}` body.
    #[error("alphavantage call error message: ({detail}), status code: {status}")]
    Status {
        status: u16,
        code: Option<i64>,
        detail: String,
    },

    /// Non-success status whose body could not be read as `{code, detail}`.
    #[error("unknown error: {reason}, status code: {status}")]
    UnknownStatus { status: u16, reason: String },

    /// Connection, TLS or timeout failure reported by the transport.
    #[error("transport failure: {0}")]
    Network(String),

    #[error("request cancelled")]
    Cancelled,

    /// `Error Message`, `Information`, `Note` or `detail` found in the body.
    #[error("alphavantage call error message: {message}")]
    Logical { message: String },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidInput(_) => ErrorKind::InvalidInput,
            ApiError::Status { .. }
            | ApiError::UnknownStatus { .. }
            | ApiError::Network(_)
            | ApiError::Cancelled => ErrorKind::Transport,
            ApiError::Logical { .. } => ErrorKind::Logical,
            ApiError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } | ApiError::UnknownStatus { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// An `ApiError` tagged with the operation that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to {operation}: {source}")]
pub struct Error {
    operation: &'static str,
    source: ApiError,
}

impl Error {
    pub(crate) fn new(operation: &'static str, source: ApiError) -> Self {
        Self { operation, source }
    }

    /// Human description of the failed operation, e.g. `"get news sentiment"`.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn api_error(&self) -> &ApiError {
        &self.source
    }

    pub fn into_api_error(self) -> ApiError {
        self.source
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    pub fn is_invalid_input(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    pub fn is_logical(&self) -> bool {
        self.kind() == ErrorKind::Logical
    }

    pub fn is_decode(&self) -> bool {
        self.kind() == ErrorKind::Decode
    }
}

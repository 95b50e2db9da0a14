//! Request-level error taxonomy.
//!
//! Every failure that can surface from a handler chain is one of two
//! families: a [`ApiError::Client`] error (the caller's fault, carries a
//! fixed 4xx status chosen at construction) or a [`ApiError::Server`]
//! error (our fault, always rendered as 500 at the boundary). The enum is
//! deliberately closed so rendering is a pattern match, not a chain of
//! downcasts.
use http::StatusCode;
use thiserror::Error;

/// A client-error message: either plain text or a structured payload.
///
/// Structured payloads are stored as their canonical JSON serialization,
/// so two errors built from equal values render identically.
#[derive(Debug, Clone)]
pub enum ErrorMessage {
    Text(String),
    Structured(serde_json::Value),
}

impl ErrorMessage {
    /// Canonical string form used in responses.
    pub fn canonical(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(value) => value.to_string(),
        }
    }
}

impl From<&str> for ErrorMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ErrorMessage {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<serde_json::Value> for ErrorMessage {
    fn from(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}

/// The error type propagated out of handler chains.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A recognized 4xx condition caused by caller input. The status is
    /// fixed by the constructor and cannot be altered afterwards; the
    /// message is safe to expose verbatim.
    #[error("{message}")]
    Client { status: StatusCode, message: String },

    /// Anything else. The throwing site attaches no status; the boundary
    /// maps it to 500 uniformly.
    #[error("{0}")]
    Server(eyre::Report),
}

impl ApiError {
    /// 400 Bad Request.
    pub fn bad_request(message: impl Into<ErrorMessage>) -> Self {
        Self::client(StatusCode::BAD_REQUEST, message)
    }

    /// 404 Not Found.
    pub fn not_found(message: impl Into<ErrorMessage>) -> Self {
        Self::client(StatusCode::NOT_FOUND, message)
    }

    /// 413 Payload Too Large.
    pub fn payload_too_large(message: impl Into<ErrorMessage>) -> Self {
        Self::client(StatusCode::PAYLOAD_TOO_LARGE, message)
    }

    fn client(status: StatusCode, message: impl Into<ErrorMessage>) -> Self {
        Self::Client {
            status,
            message: message.into().canonical(),
        }
    }

    /// Wrap any error as a server fault.
    pub fn server<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Server(eyre::Report::new(err))
    }

    /// The status this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Client { status, .. } => *status,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Self::Client { .. })
    }
}

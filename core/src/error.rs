//! Error types for the Nuki API client.
//!
//! # Design
//! Status codes an endpoint documents map to named variants so callers can
//! match on "not authenticated" or "no such lock" directly. Any other status
//! lands in `UnexpectedResponse` with the raw code. `Decode` is kept apart
//! from the status-driven variants: the server accepted the request but sent
//! a body the client cannot read.
//!
//! Underlying `reqwest` and `serde_json` errors are flattened to strings so
//! the enum stays `Clone + PartialEq` and can be asserted on in tests.

use thiserror::Error;

/// Errors returned by `NukiClient` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NukiError {
    /// 401: the credential is missing, expired or revoked.
    #[error("authentication required")]
    AuthenticationRequired,

    /// 403: the credential is valid but lacks access to the resource.
    #[error("forbidden")]
    Forbidden,

    /// 404: the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// 400: the server rejected the request parameters.
    #[error("bad request")]
    BadRequest,

    /// 422: the request was well-formed but semantically invalid.
    #[error("invalid request")]
    InvalidRequest,

    /// A status the endpoint does not document.
    #[error("unexpected response status {status}")]
    UnexpectedResponse { status: u16 },

    /// Success status, but the body does not match the expected type.
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// The exchange failed before a status was received.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The configured server URL cannot be parsed.
    #[error("invalid server url: {0}")]
    InvalidServerUrl(String),

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(String),
}

impl NukiError {
    /// HTTP status behind a status-derived error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            NukiError::AuthenticationRequired => Some(401),
            NukiError::Forbidden => Some(403),
            NukiError::NotFound => Some(404),
            NukiError::BadRequest => Some(400),
            NukiError::InvalidRequest => Some(422),
            NukiError::UnexpectedResponse { status } => Some(*status),
            _ => None,
        }
    }
}

/// Named error outcomes an endpoint descriptor can map a status code to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AuthenticationRequired,
    Forbidden,
    NotFound,
    BadRequest,
    InvalidRequest,
}

impl From<ErrorKind> for NukiError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::AuthenticationRequired => NukiError::AuthenticationRequired,
            ErrorKind::Forbidden => NukiError::Forbidden,
            ErrorKind::NotFound => NukiError::NotFound,
            ErrorKind::BadRequest => NukiError::BadRequest,
            ErrorKind::InvalidRequest => NukiError::InvalidRequest,
        }
    }
}

impl From<reqwest::Error> for NukiError {
    fn from(e: reqwest::Error) -> Self {
        NukiError::Transport(e.to_string())
    }
}

impl From<url::ParseError> for NukiError {
    fn from(e: url::ParseError) -> Self {
        NukiError::InvalidServerUrl(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NukiError>;

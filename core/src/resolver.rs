//! Maps raw responses to decoded entities or `NukiError`s.
//!
//! # Design
//! Every operation resolves the same way:
//! 1. the endpoint's success status decodes the body (or ignores it for
//!    no-content operations), and a body that does not fit is a `Decode`
//!    error;
//! 2. a status the endpoint documents becomes its named error, body unread;
//! 3. anything else is `UnexpectedResponse` carrying the status.
//!
//! Both entry points take the response by value so it is consumed exactly once.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::{NukiError, Result};
use crate::http::HttpResponse;

/// Classify `status` against the endpoint's table.
pub fn check_status(endpoint: &Endpoint, status: u16) -> Result<()> {
    if status == endpoint.success {
        return Ok(());
    }
    let error = match endpoint.error_for(status) {
        Some(kind) => NukiError::from(kind),
        None => NukiError::UnexpectedResponse { status },
    };
    debug!(operation = endpoint.operation_id, status, %error, "resolved error status");
    Err(error)
}

/// Resolve a response whose success body is JSON of type `T`.
pub fn resolve_json<T: DeserializeOwned>(endpoint: &Endpoint, response: HttpResponse) -> Result<T> {
    check_status(endpoint, response.status)?;
    serde_json::from_str(&response.body).map_err(|e| NukiError::Decode(e.to_string()))
}

/// Resolve a response whose success carries no content.
pub fn resolve_no_content(endpoint: &Endpoint, response: HttpResponse) -> Result<()> {
    check_status(endpoint, response.status)
}

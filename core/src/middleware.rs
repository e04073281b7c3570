//! Request/response interceptors wrapped around the transport.
//!
//! # Design
//! A `Middleware` receives the outgoing request and a `Next` handle to the
//! rest of the chain. `Next::run` consumes the handle, so a middleware can
//! forward at most once; not calling it short-circuits the chain. The client
//! builds the chain as `[AuthMiddleware, LoggingMiddleware]`, so the
//! authorization header is in place before the request is logged and the
//! transport's response reaches the logger first on the way back.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::credential::Credential;
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// One link in the request pipeline.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> Result<HttpResponse>;
}

/// The remainder of the chain, ending in the transport.
pub struct Next<'a> {
    middlewares: &'a [Arc<dyn Middleware>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    pub fn new(middlewares: &'a [Arc<dyn Middleware>], transport: &'a dyn Transport) -> Self {
        Self {
            middlewares,
            transport,
        }
    }

    /// Hand the request to the next middleware, or to the transport when
    /// none remain.
    pub async fn run(self, request: HttpRequest) -> Result<HttpResponse> {
        match self.middlewares.split_first() {
            Some((current, rest)) => {
                current
                    .intercept(request, Next::new(rest, self.transport))
                    .await
            }
            None => self.transport.send(request).await,
        }
    }
}

/// Adds `Authorization: Bearer <token>` when a credential is set.
///
/// The token is read from the shared `Credential` on every request. Without
/// a token the request goes out unauthenticated and the server answers 401.
#[derive(Debug, Clone)]
pub struct AuthMiddleware {
    credential: Credential,
}

impl AuthMiddleware {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl Middleware for AuthMiddleware {
    async fn intercept(&self, mut request: HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
        if let Some(token) = self.credential.get() {
            request.set_header("authorization", format!("Bearer {token}"));
        }
        next.run(request).await
    }
}

/// Records the method and path of each request and the status it got back.
///
/// Emits exactly one record before forwarding and one after, including when
/// the transport fails. Never modifies the request or response.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
        let method = request.method;
        let path = request.path().to_string();
        info!(%method, %path, "sending request");

        let result = next.run(request).await;
        match &result {
            Ok(response) => info!(%method, %path, status = response.status, "received response"),
            Err(error) => warn!(%method, %path, %error, "request failed"),
        }
        result
    }
}

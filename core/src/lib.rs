//! Async client for the Nuki Web API.
//!
//! # Overview
//! `NukiClient` exposes typed methods for the smart-lock operations (list,
//! get, update, lock actions, logs, account). Every call goes through the
//! same pipeline: an `Endpoint` descriptor plus `RequestParams` become an
//! `HttpRequest`, the request passes the middleware chain (auth, then
//! logging) to a `Transport`, and the resolver turns the `HttpResponse` into
//! an entity or a `NukiError`.
//!
//! # Design
//! - Descriptors in `endpoint` hold all per-operation knowledge; the
//!   dispatcher and resolver are shared.
//! - The bearer token lives in a shared `Credential` read per request, so
//!   `set_credential` affects every later call.
//! - `Dispatcher::build_request` and the `resolver` functions are usable on
//!   their own when the caller wants to execute HTTP itself.
//! - No retries, caching or timeouts are added on top of the transport.
//!
//! ```rust,no_run
//! use nuki_core::{LockAction, NukiClient};
//!
//! # async fn run() -> nuki_core::Result<()> {
//! let client = NukiClient::new(nuki_core::DEFAULT_SERVER_URL, Some("api-token".into()))?;
//! for lock in client.list_smartlocks(None).await? {
//!     println!("{} {}", lock.smartlock_id, lock.name);
//! }
//! client.send_lock_action(17, &LockAction::Unlock.into()).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod credential;
pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod middleware;
pub mod resolver;
pub mod transport;
pub mod types;

pub use client::NukiClient;
pub use config::{ClientConfig, DEFAULT_SERVER_URL};
pub use credential::Credential;
pub use dispatcher::{Dispatcher, RequestParams};
pub use endpoint::Endpoint;
pub use error::{ErrorKind, NukiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use middleware::{AuthMiddleware, LoggingMiddleware, Middleware, Next};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    Account, LockAction, LockActionRequest, LogEntry, LogQuery, Smartlock, SmartlockState,
};

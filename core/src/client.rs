//! Typed facade over the Nuki Web API.
//!
//! # Design
//! `NukiClient` owns the parsed server URL, the shared `Credential`, and a
//! `Dispatcher` whose middleware chain is `AuthMiddleware` then
//! `LoggingMiddleware`. Each operation method fills `RequestParams`, sends
//! them through the dispatcher and hands the response to the shared
//! resolver; the per-operation knowledge lives in the `Endpoint` descriptors.
//!
//! The auth middleware holds a clone of the same `Credential`, so
//! `set_credential` applies to every request built afterwards, including
//! requests from clones of this client. Requests already past the auth
//! middleware keep the token they were built with.

use std::sync::Arc;

use chrono::SecondsFormat;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::dispatcher::{Dispatcher, RequestParams};
use crate::endpoint::{
    Endpoint, GET_ACCOUNT, GET_SMARTLOCK, GET_SMARTLOCK_LOGS, LIST_SMARTLOCKS, SEND_LOCK_ACTION,
    UPDATE_SMARTLOCK,
};
use crate::error::Result;
use crate::middleware::{AuthMiddleware, LoggingMiddleware, Middleware};
use crate::resolver::{resolve_json, resolve_no_content};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Account, LockAction, LockActionRequest, LogEntry, LogQuery, Smartlock};

/// Async client for the Nuki Web API.
#[derive(Debug, Clone)]
pub struct NukiClient {
    dispatcher: Dispatcher,
    credential: Credential,
}

impl NukiClient {
    /// Create a client using the default `reqwest` transport.
    ///
    /// Fails with `InvalidServerUrl` if `server_url` does not parse.
    pub fn new(server_url: &str, api_token: Option<String>) -> Result<Self> {
        Self::with_transport(server_url, api_token, Arc::new(ReqwestTransport::new()))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.server_url, config.api_token.clone())
    }

    pub fn with_transport(
        server_url: &str,
        api_token: Option<String>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let base_url = Url::parse(server_url)?;
        let credential = Credential::new(api_token);
        let middlewares: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(AuthMiddleware::new(credential.clone())),
            Arc::new(LoggingMiddleware),
        ];
        let dispatcher = Dispatcher::new(base_url, middlewares, transport)?;
        Ok(Self {
            dispatcher,
            credential,
        })
    }

    /// Replace the API token used by subsequent requests.
    pub fn set_credential(&self, token: impl Into<String>) {
        self.credential.set(Some(token.into()));
    }

    /// Send subsequent requests without an `Authorization` header.
    pub fn clear_credential(&self) {
        self.credential.set(None);
    }

    pub fn credential(&self) -> Option<String> {
        self.credential.get()
    }

    pub fn server_url(&self) -> &Url {
        self.dispatcher.base_url()
    }

    /// The underlying dispatcher, e.g. for `build_request` in host-does-IO
    /// setups.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run any endpoint whose success body is JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: RequestParams,
    ) -> Result<T> {
        let response = self.dispatcher.dispatch(endpoint, params).await?;
        resolve_json(endpoint, response)
    }

    /// Run any endpoint whose success carries no content.
    pub async fn call_no_content(&self, endpoint: &Endpoint, params: RequestParams) -> Result<()> {
        let response = self.dispatcher.dispatch(endpoint, params).await?;
        resolve_no_content(endpoint, response)
    }

    /// List the account's smart locks, optionally only those visible to the
    /// given authorization ids. An empty filter is treated as no filter.
    pub async fn list_smartlocks(&self, auth_ids: Option<&[i64]>) -> Result<Vec<Smartlock>> {
        let auth_ids = auth_ids.filter(|ids| !ids.is_empty()).map(|ids| {
            ids.iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(",")
        });
        let params = RequestParams::new().query_opt("authIds", auth_ids);
        self.call_json(&LIST_SMARTLOCKS, params).await
    }

    pub async fn get_smartlock(&self, smartlock_id: i64) -> Result<Smartlock> {
        self.call_json(&GET_SMARTLOCK, RequestParams::new().path(smartlock_id))
            .await
    }

    pub async fn update_smartlock(&self, smartlock_id: i64, smartlock: &Smartlock) -> Result<()> {
        let params = RequestParams::new().path(smartlock_id).json(smartlock)?;
        self.call_no_content(&UPDATE_SMARTLOCK, params).await
    }

    pub async fn send_lock_action(
        &self,
        smartlock_id: i64,
        action: &LockActionRequest,
    ) -> Result<()> {
        let params = RequestParams::new().path(smartlock_id).json(action)?;
        self.call_no_content(&SEND_LOCK_ACTION, params).await
    }

    pub async fn lock(&self, smartlock_id: i64) -> Result<()> {
        self.send_lock_action(smartlock_id, &LockAction::Lock.into())
            .await
    }

    pub async fn unlock(&self, smartlock_id: i64) -> Result<()> {
        self.send_lock_action(smartlock_id, &LockAction::Unlock.into())
            .await
    }

    pub async fn get_smartlock_logs(
        &self,
        smartlock_id: i64,
        query: &LogQuery,
    ) -> Result<Vec<LogEntry>> {
        let timestamp = |d: &chrono::DateTime<chrono::Utc>| d.to_rfc3339_opts(SecondsFormat::Millis, true);
        let params = RequestParams::new()
            .path(smartlock_id)
            .query_opt("accountUserId", query.account_user_id)
            .query_opt("fromDate", query.from_date.as_ref().map(timestamp))
            .query_opt("toDate", query.to_date.as_ref().map(timestamp))
            .query_opt("action", query.action)
            .query_opt("id", query.id.as_deref())
            .query_opt("limit", query.limit);
        self.call_json(&GET_SMARTLOCK_LOGS, params).await
    }

    pub async fn get_account(&self) -> Result<Account> {
        self.call_json(&GET_ACCOUNT, RequestParams::new()).await
    }
}

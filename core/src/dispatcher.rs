//! Turns an endpoint descriptor plus caller parameters into an HTTP exchange.
//!
//! # Design
//! `build_request` is pure: it resolves the path template against the base
//! URL, drops unset and undeclared query parameters, and attaches the JSON
//! body. `dispatch` pushes the built request through the middleware chain.
//! Keeping the two apart lets a caller execute `build_request` output with
//! its own HTTP stack and still use the shared resolver on the result.
//!
//! Path values are not validated; they are percent-encoded as single path
//! segments and the server decides whether they are acceptable.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info_span, warn, Instrument};
use url::Url;

use crate::endpoint::{is_placeholder, Endpoint};
use crate::error::{NukiError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::middleware::{Middleware, Next};
use crate::transport::Transport;

/// Caller-supplied values for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    path: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<String>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next positional path parameter.
    pub fn path(mut self, value: impl ToString) -> Self {
        self.path.push(value.to_string());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when `value` is set.
    pub fn query_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(name, v),
            None => self,
        }
    }

    /// Serialize `body` as the JSON request payload.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let encoded =
            serde_json::to_string(body).map_err(|e| NukiError::Serialization(e.to_string()))?;
        self.body = Some(encoded);
        Ok(self)
    }
}

/// Builds requests for endpoints and runs them through the middleware chain.
#[derive(Clone)]
pub struct Dispatcher {
    base_url: Url,
    middlewares: Arc<[Arc<dyn Middleware>]>,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    /// Fails if `base_url` cannot carry a path (e.g. `mailto:`).
    pub fn new(
        base_url: Url,
        middlewares: Vec<Arc<dyn Middleware>>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(NukiError::InvalidServerUrl(format!(
                "{base_url} cannot be used as a base url"
            )));
        }
        Ok(Self {
            base_url,
            middlewares: middlewares.into(),
            transport,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn build_request(&self, endpoint: &Endpoint, params: RequestParams) -> HttpRequest {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            let mut values = params.path.iter();
            for segment in endpoint.path.split('/').filter(|s| !s.is_empty()) {
                if !is_placeholder(segment) {
                    segments.push(segment);
                    continue;
                }
                match values.next() {
                    Some(value) => {
                        segments.push(value);
                    }
                    None => {
                        debug!(operation = endpoint.operation_id, placeholder = segment, "missing path parameter");
                        segments.push(segment);
                    }
                }
            }
            let surplus = values.count();
            if surplus > 0 {
                debug!(operation = endpoint.operation_id, surplus, "ignoring extra path parameters");
            }
        }

        let mut query = Vec::with_capacity(params.query.len());
        for (name, value) in params.query {
            if endpoint.allows_query(&name) {
                query.push((name, value));
            } else {
                warn!(operation = endpoint.operation_id, param = %name, "dropping undeclared query parameter");
            }
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut request = HttpRequest::new(endpoint.method, url);
        request.set_header("accept", "application/json");
        if let Some(body) = params.body {
            request.set_header("content-type", "application/json");
            request.body = Some(body);
        }
        debug!(operation = endpoint.operation_id, url = %request.url, "built request");
        request
    }

    /// Build the request and send it through the middleware chain.
    pub async fn dispatch(&self, endpoint: &Endpoint, params: RequestParams) -> Result<HttpResponse> {
        let request = self.build_request(endpoint, params);
        let span = info_span!("nuki_request", operation = endpoint.operation_id);
        Next::new(&self.middlewares, self.transport.as_ref())
            .run(request)
            .instrument(span)
            .await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url.as_str())
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::endpoint::{GET_ACCOUNT, GET_SMARTLOCK, GET_SMARTLOCK_LOGS, LIST_SMARTLOCKS, SEND_LOCK_ACTION};
    use crate::http::HttpMethod;
    use crate::types::{LockAction, LockActionRequest};

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse::new(200, "[]"))
        }
    }

    fn dispatcher(base: &str) -> Dispatcher {
        Dispatcher::new(Url::parse(base).unwrap(), Vec::new(), Arc::new(Recorder::default())).unwrap()
    }

    #[test]
    fn substitutes_path_parameters() {
        let req = dispatcher("https://api.nuki.io").build_request(&GET_SMARTLOCK, RequestParams::new().path(17));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url.as_str(), "https://api.nuki.io/smartlock/17");
        assert!(req.body.is_none());
    }

    #[test]
    fn keeps_base_path_prefix() {
        let req = dispatcher("http://localhost:8080/v1/").build_request(&GET_ACCOUNT, RequestParams::new());
        assert_eq!(req.url.as_str(), "http://localhost:8080/v1/account");
    }

    #[test]
    fn path_values_are_sent_as_is_but_encoded() {
        let req = dispatcher("https://api.nuki.io").build_request(&GET_SMARTLOCK, RequestParams::new().path("a/b c"));
        assert_eq!(req.path(), "/smartlock/a%2Fb%20c");
    }

    #[test]
    fn unset_query_parameters_are_omitted() {
        let req = dispatcher("https://api.nuki.io").build_request(
            &GET_SMARTLOCK_LOGS,
            RequestParams::new()
                .path(17)
                .query_opt("limit", Some(20))
                .query_opt("action", None::<u8>),
        );
        assert_eq!(req.url.as_str(), "https://api.nuki.io/smartlock/17/log?limit=20");
    }

    #[test]
    fn no_query_string_when_nothing_set() {
        let req = dispatcher("https://api.nuki.io").build_request(
            &LIST_SMARTLOCKS,
            RequestParams::new().query_opt("authIds", None::<String>),
        );
        assert_eq!(req.url.query(), None);
    }

    #[test]
    fn undeclared_query_parameters_are_dropped() {
        let req = dispatcher("https://api.nuki.io").build_request(
            &LIST_SMARTLOCKS,
            RequestParams::new().query("authIds", "1,2").query("debug", true),
        );
        assert_eq!(req.query(), vec![("authIds".to_string(), "1,2".to_string())]);
    }

    #[test]
    fn json_body_sets_content_type() {
        let params = RequestParams::new()
            .path(17)
            .json(&LockActionRequest::new(LockAction::Lock))
            .unwrap();
        let req = dispatcher("https://api.nuki.io").build_request(&SEND_LOCK_ACTION, params);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"action":2}"#));
    }

    #[test]
    fn missing_path_parameter_leaves_placeholder() {
        let req = dispatcher("https://api.nuki.io").build_request(&GET_SMARTLOCK, RequestParams::new());
        assert_eq!(req.path(), "/smartlock/%7BsmartlockId%7D");
    }

    #[test]
    fn rejects_cannot_be_a_base_url() {
        let err = Dispatcher::new(
            Url::parse("mailto:ops@nuki.io").unwrap(),
            Vec::new(),
            Arc::new(Recorder::default()),
        )
        .unwrap_err();
        assert!(matches!(err, NukiError::InvalidServerUrl(_)));
    }

    #[tokio::test]
    async fn dispatch_sends_built_request_to_transport() {
        let transport = Arc::new(Recorder::default());
        let dispatcher = Dispatcher::new(
            Url::parse("https://api.nuki.io").unwrap(),
            Vec::new(),
            transport.clone(),
        )
        .unwrap();

        let response = dispatcher.dispatch(&LIST_SMARTLOCKS, RequestParams::new()).await.unwrap();

        assert_eq!(response.status, 200);
        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path(), "/smartlock");
    }
}

//! Host-does-IO flow against the live mock server.
//!
//! # Design
//! Builds requests with `Dispatcher::build_request`, executes them with ureq
//! outside the client's middleware chain, and feeds the responses to the
//! shared resolver. Confirms the request builder and resolver work without
//! the async transport.

use nuki_core::endpoint::{GET_ACCOUNT, GET_SMARTLOCK, LIST_SMARTLOCKS, SEND_LOCK_ACTION};
use nuki_core::resolver::{resolve_json, resolve_no_content};
use nuki_core::{
    Account, HttpMethod, HttpRequest, HttpResponse, LockAction, LockActionRequest, NukiClient,
    NukiError, RequestParams, Smartlock,
};

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the resolver
/// handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let url = req.url.as_str();
    let body = req.body.clone().unwrap_or_default();
    let mut response = match req.method {
        HttpMethod::Get => with_headers(agent.get(url), &req.headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(url), &req.headers).call(),
        HttpMethod::Post => with_headers(agent.post(url), &req.headers).send(body.as_bytes()),
        HttpMethod::Put => with_headers(agent.put(url), &req.headers).send(body.as_bytes()),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse::new(status, body)
}

fn authorize(mut req: HttpRequest) -> HttpRequest {
    req.set_header("authorization", format!("Bearer {}", mock_server::DEFAULT_TOKEN));
    req
}

#[test]
fn host_executes_built_requests() {
    // Step 1: start mock server on a random port.
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    let client = NukiClient::new(&format!("http://{addr}"), None).unwrap();
    let dispatcher = client.dispatcher();

    // Step 2: without the auth middleware the host must add the header itself.
    let req = dispatcher.build_request(&GET_ACCOUNT, RequestParams::new());
    let err = resolve_json::<Account>(&GET_ACCOUNT, execute(req)).unwrap_err();
    assert_eq!(err, NukiError::AuthenticationRequired);

    // Step 3: account.
    let req = authorize(dispatcher.build_request(&GET_ACCOUNT, RequestParams::new()));
    let account: Account = resolve_json(&GET_ACCOUNT, execute(req)).unwrap();
    assert_eq!(account.name, "Alice");

    // Step 4: list with a filter.
    let params = RequestParams::new().query("authIds", "100");
    let req = authorize(dispatcher.build_request(&LIST_SMARTLOCKS, params));
    let locks: Vec<Smartlock> = resolve_json(&LIST_SMARTLOCKS, execute(req)).unwrap();
    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].smartlock_id, 17);

    // Step 5: lock action with a JSON body.
    let params = RequestParams::new()
        .path(18)
        .json(&LockActionRequest::new(LockAction::Lock))
        .unwrap();
    let req = authorize(dispatcher.build_request(&SEND_LOCK_ACTION, params));
    resolve_no_content(&SEND_LOCK_ACTION, execute(req)).unwrap();

    // Step 6: the lock reports the new state.
    let req = authorize(dispatcher.build_request(&GET_SMARTLOCK, RequestParams::new().path(18)));
    let lock: Smartlock = resolve_json(&GET_SMARTLOCK, execute(req)).unwrap();
    assert_eq!(lock.state.unwrap().state, 1);

    // Step 7: missing lock.
    let req = authorize(dispatcher.build_request(&GET_SMARTLOCK, RequestParams::new().path(4040)));
    let err = resolve_json::<Smartlock>(&GET_SMARTLOCK, execute(req)).unwrap_err();
    assert_eq!(err, NukiError::NotFound);
}

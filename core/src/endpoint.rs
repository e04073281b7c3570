//! Static descriptors for the Nuki Web API operations this crate wraps.
//!
//! # Design
//! An `Endpoint` carries everything the dispatcher and resolver need to know
//! about one operation: method, path template, accepted query parameters, the
//! success status, and which error statuses the API documents. Adding an
//! operation means adding a descriptor here; the request/response machinery
//! is shared.

use crate::error::ErrorKind;
use crate::http::HttpMethod;

/// Immutable metadata describing one API operation.
///
/// Path templates use `{name}` placeholders that are filled positionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub operation_id: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub query: &'static [&'static str],
    pub success: u16,
    pub errors: &'static [(u16, ErrorKind)],
}

impl Endpoint {
    /// The named error this endpoint maps `status` to, if documented.
    pub fn error_for(&self, status: u16) -> Option<ErrorKind> {
        self.errors
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, kind)| *kind)
    }

    pub fn allows_query(&self, name: &str) -> bool {
        self.query.contains(&name)
    }

    /// Number of `{name}` placeholders in the path template.
    pub fn path_param_count(&self) -> usize {
        self.path
            .split('/')
            .filter(|segment| is_placeholder(segment))
            .count()
    }
}

pub(crate) fn is_placeholder(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}')
}

pub const LIST_SMARTLOCKS: Endpoint = Endpoint {
    operation_id: "listSmartlocks",
    method: HttpMethod::Get,
    path: "/smartlock",
    query: &["authIds"],
    success: 200,
    errors: &[(401, ErrorKind::AuthenticationRequired)],
};

pub const GET_SMARTLOCK: Endpoint = Endpoint {
    operation_id: "getSmartlock",
    method: HttpMethod::Get,
    path: "/smartlock/{smartlockId}",
    query: &[],
    success: 200,
    errors: &[
        (401, ErrorKind::AuthenticationRequired),
        (403, ErrorKind::Forbidden),
        (404, ErrorKind::NotFound),
    ],
};

pub const UPDATE_SMARTLOCK: Endpoint = Endpoint {
    operation_id: "updateSmartlock",
    method: HttpMethod::Post,
    path: "/smartlock/{smartlockId}",
    query: &[],
    success: 204,
    errors: &[(401, ErrorKind::AuthenticationRequired)],
};

pub const SEND_LOCK_ACTION: Endpoint = Endpoint {
    operation_id: "sendLockAction",
    method: HttpMethod::Post,
    path: "/smartlock/{smartlockId}/action",
    query: &[],
    success: 204,
    errors: &[
        (400, ErrorKind::BadRequest),
        (401, ErrorKind::AuthenticationRequired),
        (422, ErrorKind::InvalidRequest),
    ],
};

pub const GET_SMARTLOCK_LOGS: Endpoint = Endpoint {
    operation_id: "getSmartlockLogs",
    method: HttpMethod::Get,
    path: "/smartlock/{smartlockId}/log",
    query: &["accountUserId", "fromDate", "toDate", "action", "id", "limit"],
    success: 200,
    errors: &[
        (400, ErrorKind::BadRequest),
        (401, ErrorKind::AuthenticationRequired),
    ],
};

pub const GET_ACCOUNT: Endpoint = Endpoint {
    operation_id: "getAccount",
    method: HttpMethod::Get,
    path: "/account",
    query: &[],
    success: 200,
    errors: &[(401, ErrorKind::AuthenticationRequired)],
};

/// Every descriptor defined in this module.
pub const ALL: &[Endpoint] = &[
    LIST_SMARTLOCKS,
    GET_SMARTLOCK,
    UPDATE_SMARTLOCK,
    SEND_LOCK_ACTION,
    GET_SMARTLOCK_LOGS,
    GET_ACCOUNT,
];

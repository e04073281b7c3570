//! Client configuration.
//!
//! Defaults target the public Nuki Web API without a token. `from_env` lets
//! binaries and tests point the client elsewhere via `NUKI_API_URL` and
//! supply a token via `NUKI_API_TOKEN`; empty values count as unset.

use std::fmt;

pub const DEFAULT_SERVER_URL: &str = "https://api.nuki.io";
pub const SERVER_URL_ENV: &str = "NUKI_API_URL";
pub const API_TOKEN_ENV: &str = "NUKI_API_TOKEN";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: String,
    pub api_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_token: None,
        }
    }
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            server_url: non_empty(SERVER_URL_ENV).unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            api_token: non_empty(API_TOKEN_ENV),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_url", &self.server_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

//! In-memory test doubles for the client capability set.
//!
//! [`StubTransport`] records every request it is handed and answers each one
//! with the same canned status and body. [`StubClient`] pairs it with fixed
//! credentials.

use std::sync::{Mutex, PoisonError};

use reqwest::header::HeaderMap;
use reqwest::{Method, Request, Response};
use url::Url;

use crate::client::{user_agent, RedashClient};
use crate::error::{AuthError, ConfigError, Error};
use crate::options::Options;
use crate::transport::Transport;

/// Snapshot of a request seen by [`StubTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body parsed as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(self.body.as_deref().unwrap_or_default())
    }
}

#[derive(Debug)]
pub struct StubTransport {
    status: u16,
    body: Vec<u8>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubTransport {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers `200 OK` with `body`.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests().pop()
    }

    fn respond(&self, request: Request) -> Result<Response, Error> {
        let recorded = RecordedRequest {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: request.headers().clone(),
            body: request.body().and_then(|b| b.as_bytes()).map(<[u8]>::to_vec),
        };
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(recorded);

        let response = http::Response::builder()
            .status(self.status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(self.body.clone())
            .map_err(|e| Error::InvalidRequest(e.to_string()))?;
        Ok(Response::from(response))
    }
}

impl Transport for StubTransport {
    async fn execute(&self, request: Request) -> Result<Response, Error> {
        self.respond(request)
    }
}

/// Client with fixed credentials over a [`StubTransport`].
#[derive(Debug)]
pub struct StubClient {
    base_url: Result<Url, ConfigError>,
    api_key: String,
    transport: StubTransport,
}

impl StubClient {
    /// An unparsable `base_url` surfaces as a [`ConfigError`] on use.
    pub fn new(base_url: &str, api_key: &str, transport: StubTransport) -> Self {
        Self {
            base_url: Url::parse(base_url).map_err(|e| ConfigError::new(e.to_string())),
            api_key: api_key.to_string(),
            transport,
        }
    }

    /// A client whose URL resolution always fails.
    pub fn without_url(api_key: &str, transport: StubTransport) -> Self {
        Self {
            base_url: Err(ConfigError::new("no url configured")),
            api_key: api_key.to_string(),
            transport,
        }
    }
}

impl RedashClient for StubClient {
    type Transport = StubTransport;

    fn base_url(&self) -> Result<Url, ConfigError> {
        self.base_url.clone()
    }

    fn api_key(&self) -> Result<String, AuthError> {
        if self.api_key.is_empty() {
            return Err(AuthError::new("empty API key"));
        }
        Ok(self.api_key.clone())
    }

    fn transport(&self) -> &StubTransport {
        &self.transport
    }

    fn default_options(&self) -> Options {
        Options::with_user_agent(user_agent())
    }
}

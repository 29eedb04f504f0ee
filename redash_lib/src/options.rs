//! Per-request option bundle.

use std::collections::HashMap;

/// Query parameters, headers and an optional body for one request.
///
/// An `Options` value belongs to exactly one request. The builder consumes it,
/// merges the computed `Authorization` header into it and then applies every
/// header onto the outgoing request. Reusing one value for several calls
/// would leak one caller's parameters into the next call, so the request
/// functions take it by value; get a fresh one from
/// [`RedashClient::default_options`](crate::RedashClient::default_options)
/// per call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Becomes the URL query string.
    pub params: HashMap<String, String>,
    /// Applied onto the request, keyed by lowercase name so the last write
    /// wins per header whatever its spelling. Go through
    /// [`Options::set_header`] rather than inserting directly.
    pub headers: HashMap<String, String>,
    /// Request payload, only set for writes.
    pub body: Option<Vec<u8>>,
}

impl Options {
    /// Options carrying only a `User-Agent` header.
    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        let mut opts = Self::default();
        opts.set_header(reqwest::header::USER_AGENT.as_str(), user_agent);
        opts
    }

    /// Merge `params` into the query parameters, overwriting existing keys.
    pub fn merge_params<K, V>(&mut self, params: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in params {
            self.params.insert(k.into(), v.into());
        }
    }

    /// Set a header, replacing an earlier value with the same name in any case.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let mut name = name.into();
        name.make_ascii_lowercase();
        self.headers.insert(name, value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_only() {
        let opts = Options::with_user_agent("redash-client/test");
        assert_eq!(opts.headers.len(), 1);
        assert_eq!(
            opts.headers.get("user-agent").map(String::as_str),
            Some("redash-client/test")
        );
        assert!(opts.params.is_empty());
        assert!(opts.body.is_none());
    }

    #[test]
    fn merge_params_overwrites() {
        let mut opts = Options::default();
        opts.merge_params([("page", "1"), ("q", "a")]);
        opts.merge_params([("page", "2")]);
        assert_eq!(opts.params.get("page").map(String::as_str), Some("2"));
        assert_eq!(opts.params.get("q").map(String::as_str), Some("a"));
    }

    #[test]
    fn set_header_ignores_name_case() {
        let mut opts = Options::with_user_agent("redash-client/test");
        opts.set_header("User-Agent", "custom/1");
        opts.set_header("content-type", "application/json");
        opts.set_header("Content-Type", "text/plain");
        assert_eq!(opts.headers.len(), 2);
        assert_eq!(opts.headers.get("user-agent").map(String::as_str), Some("custom/1"));
        assert_eq!(opts.headers.get("content-type").map(String::as_str), Some("text/plain"));
    }
}

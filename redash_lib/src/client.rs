//! Client capability set and its concrete implementations.

use std::fmt;

use url::Url;

use crate::config::{Config, API_KEY_ENV, URL_ENV};
use crate::endpoints::{Jobs, QueryResults, Queries};
use crate::error::{AuthError, ConfigError};
use crate::helpers::mask_key;
use crate::options::Options;
use crate::transport::{shared_http, Transport};

/// What the request pipeline needs from a client.
///
/// Implement this to plug in another credential source, a different
/// transport or a test double; the builder, executor and endpoint catalog
/// only ever talk to a client through these four methods.
pub trait RedashClient: Send + Sync {
    type Transport: Transport;

    /// Server base URL. Sub-paths are joined onto its path.
    fn base_url(&self) -> Result<Url, ConfigError>;

    /// API key sent as `Authorization: Key <api key>`.
    fn api_key(&self) -> Result<String, AuthError>;

    fn transport(&self) -> &Self::Transport;

    /// A new [`Options`] per call; never a shared instance.
    fn default_options(&self) -> Options;

    fn queries(&self) -> Queries<'_, Self>
    where
        Self: Sized,
    {
        Queries::new(self)
    }

    fn query_results(&self) -> QueryResults<'_, Self>
    where
        Self: Sized,
    {
        QueryResults::new(self)
    }

    fn jobs(&self) -> Jobs<'_, Self>
    where
        Self: Sized,
    {
        Jobs::new(self)
    }
}

/// `User-Agent` sent by the bundled clients.
pub fn user_agent() -> String {
    format!("redash-client/{}", crate::VERSION)
}

fn parse_base_url(raw: Option<&str>) -> Result<Url, ConfigError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::new(format!("{} is not set", URL_ENV)))?;
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::new(format!("invalid {} {:?}: {}", URL_ENV, raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::new(format!(
            "{} {:?} cannot be used as a base URL",
            URL_ENV, raw
        )));
    }
    Ok(url)
}

/// Client backed by `REDASH_URL` / `REDASH_APIKEY` and the shared transport.
///
/// Both values are resolved once, when the client is built; the parse
/// outcome of the URL is kept either way and later changes to the
/// environment are not observed.
#[derive(Clone)]
pub struct DefaultClient {
    base_url: Result<Url, ConfigError>,
    api_key: Option<String>,
}

impl DefaultClient {
    pub fn new(config: &Config) -> Self {
        let base_url = parse_base_url(config.url.as_deref());
        match &base_url {
            Ok(u) => tracing::debug!(url = %u, "set url"),
            Err(e) => tracing::debug!(error = %e, "no usable url"),
        }
        let api_key = config.api_key.clone().filter(|k| !k.is_empty());
        Self { base_url, api_key }
    }

    /// Build from the process environment.
    pub fn from_env() -> Self {
        Self::new(&Config::from_env())
    }
}

impl fmt::Debug for DefaultClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_deref().map(mask_key))
            .finish()
    }
}

impl RedashClient for DefaultClient {
    type Transport = reqwest::Client;

    fn base_url(&self) -> Result<Url, ConfigError> {
        self.base_url.clone()
    }

    fn api_key(&self) -> Result<String, AuthError> {
        match &self.api_key {
            Some(k) => {
                tracing::debug!(api_key = %mask_key(k), "resolved api key");
                Ok(k.clone())
            }
            None => Err(AuthError::new(format!(
                "API key not found. Set {} or configure a secret backend.",
                API_KEY_ENV
            ))),
        }
    }

    fn transport(&self) -> &reqwest::Client {
        shared_http()
    }

    fn default_options(&self) -> Options {
        Options::with_user_agent(user_agent())
    }
}

/// Client with explicit credentials and its own transport.
#[derive(Clone)]
pub struct StaticClient<T> {
    base_url: Url,
    api_key: String,
    transport: T,
}

impl<T: Transport> StaticClient<T> {
    pub fn new(base_url: &str, api_key: impl Into<String>, transport: T) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(Some(base_url))?,
            api_key: api_key.into(),
            transport,
        })
    }
}

impl<T> fmt::Debug for StaticClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &mask_key(&self.api_key))
            .finish_non_exhaustive()
    }
}

impl<T: Transport> RedashClient for StaticClient<T> {
    type Transport = T;

    fn base_url(&self) -> Result<Url, ConfigError> {
        Ok(self.base_url.clone())
    }

    fn api_key(&self) -> Result<String, AuthError> {
        if self.api_key.is_empty() {
            return Err(AuthError::new("empty API key"));
        }
        Ok(self.api_key.clone())
    }

    fn transport(&self) -> &T {
        &self.transport
    }

    fn default_options(&self) -> Options {
        Options::with_user_agent(user_agent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_client_resolves_config() {
        let client = DefaultClient::new(&Config::new("http://test.local/redash", "k1"));
        assert_eq!(
            client.base_url().unwrap().as_str(),
            "http://test.local/redash"
        );
        assert_eq!(client.api_key().unwrap(), "k1");
        assert!(std::ptr::eq(client.transport(), shared_http()));
    }

    #[test]
    fn missing_url_is_config_error() {
        let client = DefaultClient::new(&Config::default());
        let err = client.base_url().unwrap_err();
        assert!(err.message.contains("REDASH_URL"));
        // the failed outcome is cached, not re-read
        assert_eq!(client.base_url().unwrap_err(), err);
    }

    #[test]
    fn unparsable_url_is_config_error() {
        let client = DefaultClient::new(&Config::new("not a url", "k1"));
        assert!(client.base_url().is_err());
        let client = DefaultClient::new(&Config::new("mailto:ops@example.com", "k1"));
        assert!(client.base_url().is_err());
    }

    #[test]
    fn missing_key_is_auth_error() {
        let cfg = Config {
            url: Some("http://test.local".to_string()),
            ..Config::default()
        };
        let client = DefaultClient::new(&cfg);
        assert!(client.base_url().is_ok());
        assert!(client.api_key().is_err());

        let client = DefaultClient::new(&Config::new("http://test.local", ""));
        assert!(client.api_key().is_err());
    }

    #[test]
    fn default_options_are_fresh() {
        let client = DefaultClient::new(&Config::new("http://test.local", "k1"));
        let mut a = client.default_options();
        let b = client.default_options();
        assert_eq!(a, b);
        a.set_header("Authorization", "Key k1");
        a.merge_params([("q", "hello")]);
        assert_eq!(b.headers.len(), 1);
        assert!(b.params.is_empty());
        assert_eq!(
            b.headers.get("user-agent").map(String::as_str),
            Some(user_agent().as_str())
        );
    }

    #[test]
    fn debug_masks_key() {
        let client = DefaultClient::new(&Config::new("http://test.local", "secretkey"));
        let out = format!("{:?}", client);
        assert!(out.contains("secr****"));
        assert!(!out.contains("secretkey"));
    }

    #[test]
    fn static_client_rejects_bad_url() {
        assert!(StaticClient::new("", "k1", reqwest::Client::new()).is_err());
        let client = StaticClient::new("http://test.local", "", reqwest::Client::new()).unwrap();
        assert!(client.api_key().is_err());
    }
}

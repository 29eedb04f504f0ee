//! Connection settings read from the environment.

use std::fmt;

use crate::helpers::{mask_key, resolve_api_key, ApiKeySource};

/// Environment variable holding the Redash server URL.
pub const URL_ENV: &str = "REDASH_URL";
/// Environment variable holding the Redash API key.
pub const API_KEY_ENV: &str = "REDASH_APIKEY";

/// Raw connection settings. Nothing is validated here; the client turns
/// missing or malformed values into errors when they are used.
#[derive(Clone, Default)]
pub struct Config {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub api_key_source: Option<ApiKeySource>,
}

impl Config {
    /// Read `REDASH_URL` and the API key (env var or secret backend).
    pub fn from_env() -> Self {
        Self::from_lookup(&|name: &str| std::env::var(name).ok())
    }

    /// Like [`Config::from_env`], but an `api_key` given here is used as is
    /// and the secret backends are never consulted.
    pub fn from_env_with_key(api_key: Option<String>) -> Self {
        Self::from_lookup_with_key(&|name: &str| std::env::var(name).ok(), api_key)
    }

    /// Same as [`Config::from_env`] against an arbitrary lookup.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        Self::from_lookup_with_key(lookup, None)
    }

    pub fn from_lookup_with_key(
        lookup: &dyn Fn(&str) -> Option<String>,
        api_key: Option<String>,
    ) -> Self {
        let url = lookup(URL_ENV).filter(|u| !u.trim().is_empty());
        let resolved = match api_key {
            Some(key) => Some((key, ApiKeySource::Explicit)),
            None => resolve_api_key(lookup),
        };
        let (api_key, api_key_source) = match resolved {
            Some((key, source)) => (Some(key), Some(source)),
            None => (None, None),
        };
        Self {
            url,
            api_key,
            api_key_source,
        }
    }

    /// Explicit settings, e.g. from CLI flags.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            api_key: Some(api_key.into()),
            api_key_source: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_deref().map(mask_key))
            .field("api_key_source", &self.api_key_source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_lookup_reads_both() {
        let cfg = Config::from_lookup(&|k: &str| match k {
            "REDASH_URL" => Some("http://test.local".to_string()),
            "REDASH_APIKEY" => Some("k1".to_string()),
            _ => None,
        });
        assert_eq!(cfg.url.as_deref(), Some("http://test.local"));
        assert_eq!(cfg.api_key.as_deref(), Some("k1"));
        assert_eq!(cfg.api_key_source, Some(ApiKeySource::Env));
    }

    #[test]
    fn explicit_key_skips_secret_backends() {
        let asked = std::cell::RefCell::new(Vec::new());
        let cfg = Config::from_lookup_with_key(
            &|k: &str| {
                asked.borrow_mut().push(k.to_string());
                match k {
                    "REDASH_URL" => Some("http://test.local".to_string()),
                    "REDASH_OP_ENTRY_PATH" => Some("op://Vault/Redash".to_string()),
                    _ => None,
                }
            },
            Some("cli-key".to_string()),
        );
        assert_eq!(cfg.api_key.as_deref(), Some("cli-key"));
        assert_eq!(cfg.api_key_source, Some(ApiKeySource::Explicit));
        assert_eq!(*asked.borrow(), vec!["REDASH_URL".to_string()]);
    }

    #[test]
    fn blank_url_is_missing() {
        let cfg = Config::from_lookup(&|k: &str| (k == "REDASH_URL").then(|| "  ".to_string()));
        assert!(cfg.url.is_none());
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn debug_masks_key() {
        let cfg = Config::new("http://test.local", "secretkey");
        let out = format!("{:?}", cfg);
        assert!(out.contains("secr****"));
        assert!(!out.contains("secretkey"));
    }
}

//! Helpers for API key resolution, key masking and Redash URL parsing.

use url::Url;

use crate::secret::{self, Lookup};

/// Source from which the API key was obtained (for diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Passed in directly, e.g. `--api-key`.
    Explicit,
    Env,
    OnePassword,
    Bitwarden,
    Keepassxc,
}

/// Resolve the API key: `REDASH_APIKEY` first, then the secret backends in
/// order (1Password, Bitwarden, KeePassXC).
pub fn resolve_api_key(lookup: Lookup<'_>) -> Option<(String, ApiKeySource)> {
    if let Some(k) = lookup(crate::config::API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
        return Some((k.trim().to_string(), ApiKeySource::Env));
    }
    if let Some(k) = secret::one_password(lookup) {
        return Some((k, ApiKeySource::OnePassword));
    }
    if let Some(k) = secret::bitwarden(lookup) {
        return Some((k, ApiKeySource::Bitwarden));
    }
    secret::keepassxc(lookup).map(|k| (k, ApiKeySource::Keepassxc))
}

/// Mask an API key for logs: first four characters, then `****`.
pub fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    if prefix.chars().count() < 4 {
        "********".to_string()
    } else {
        format!("{}****", prefix)
    }
}

/// Parsed Redash web URL resource type.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedashUrlType {
    Query,
    Dashboard,
    Unknown,
}

/// Result of parsing a Redash web URL.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ParsedRedashUrl {
    pub url_type: RedashUrlType,
    /// Scheme, host and port; usable as `REDASH_URL`.
    pub base_url: String,
    pub query_id: Option<u64>,
    pub visualization_id: Option<u64>,
    pub dashboard_slug: Option<String>,
}

/// Parse a Redash web URL, e.g. `https://redash.example.com/queries/12/source#34`.
pub fn parse_redash_url(url: &str) -> Result<ParsedRedashUrl, String> {
    let parsed = Url::parse(url).map_err(|e| e.to_string())?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let after = |name: &str| {
        segments
            .iter()
            .position(|s| *s == name)
            .and_then(|i| segments.get(i + 1).copied())
    };

    let query_id = after("queries").and_then(|s| s.parse::<u64>().ok());
    let dashboard_slug = after("dashboards").map(str::to_string);
    let url_type = if query_id.is_some() {
        RedashUrlType::Query
    } else if dashboard_slug.is_some() {
        RedashUrlType::Dashboard
    } else {
        RedashUrlType::Unknown
    };
    let visualization_id = query_id
        .and(parsed.fragment())
        .and_then(|f| f.parse::<u64>().ok());

    Ok(ParsedRedashUrl {
        url_type,
        base_url: parsed.origin().ascii_serialization(),
        query_id,
        visualization_id,
        dashboard_slug,
    })
}

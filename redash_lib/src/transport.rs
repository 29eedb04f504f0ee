//! HTTP transport capability.

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use reqwest::{Request, Response};

use crate::error::Error;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Executes a fully built request.
///
/// Only transport-level failures are errors; a 4xx/5xx answer is a
/// successful [`Response`] whose status the caller inspects.
pub trait Transport: Send + Sync {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response, Error>> + Send;
}

impl Transport for reqwest::Client {
    async fn execute(&self, request: Request) -> Result<Response, Error> {
        Ok(reqwest::Client::execute(self, request).await?)
    }
}

/// Process-wide transport shared by every [`DefaultClient`](crate::DefaultClient).
pub fn shared_http() -> &'static reqwest::Client {
    static HTTP: OnceLock<reqwest::Client> = OnceLock::new();
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to reqwest defaults");
                reqwest::Client::new()
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_http_is_shared() {
        assert!(std::ptr::eq(shared_http(), shared_http()));
    }
}

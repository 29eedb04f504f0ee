//! Typed wrappers over the request pipeline, one per resource/verb pair.
//!
//! Sub-paths are relative to the server base URL and start with `api/`.
//! Non-2xx answers become [`Error::Api`]; the core pipeline leaves status
//! codes alone.

mod jobs;
mod queries;
mod query_results;

pub use jobs::Jobs;
pub use queries::Queries;
pub use query_results::QueryResults;

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, Error};

/// Read the body, turning a non-2xx status into [`ApiError`].
async fn read_body(response: Response) -> Result<Vec<u8>, Error> {
    let status = response.status();
    let body = response.bytes().await?.to_vec();
    if !status.is_success() {
        let message = serde_json::from_slice::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("API request failed")
                    .to_string()
            });
        tracing::warn!(status = status.as_u16(), %message, "api error");
        return Err(ApiError::new(message, status.as_u16(), body).into());
    }
    Ok(body)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let body = read_body(response).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Check that `value` fits in a single path segment.
fn segment<'v>(what: &str, value: &'v str) -> Result<&'v str, Error> {
    let dots = value == "." || value == "..";
    if value.is_empty() || dots || value.contains(['/', '\\', '?', '#']) {
        return Err(Error::InvalidRequest(format!(
            "{} {:?} is not a valid path segment",
            what, value
        )));
    }
    Ok(value)
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    Ok(serde_json::to_vec(value)?)
}

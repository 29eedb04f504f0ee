//! Request construction and execution.
//!
//! Every call goes through [`build_request`] and [`execute`]; the verb
//! helpers only prepare [`Options`] the way each verb needs them.

use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Body, Method, Request, Response};
use tracing::{debug, info};

use crate::client::RedashClient;
use crate::error::{AuthError, Error};
use crate::options::Options;
use crate::transport::Transport;

/// Join `sub` onto `base`, segment-wise, without empty segments.
fn join_path(base: &str, sub: &str) -> String {
    let segments: Vec<&str> = base
        .split('/')
        .chain(sub.split('/'))
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    format!("/{}", segments.join("/"))
}

/// Build the outgoing request for `method` on `sub_path`.
///
/// Steps, stopping at the first failure:
/// 1. resolve the base URL and join `sub_path` onto its path;
/// 2. encode `options.params` as the query string;
/// 3. attach `options.body`;
/// 4. resolve the API key and set `Authorization: Key <api key>`;
/// 5. apply `options.headers`, overwriting by name.
///
/// Step 5 comes last, so an `Authorization` entry in `options.headers`
/// replaces the computed one.
pub fn build_request<C: RedashClient>(
    client: &C,
    method: Method,
    sub_path: &str,
    options: Options,
) -> Result<Request, Error> {
    let mut url = client.base_url()?;
    let path = join_path(url.path(), sub_path);
    url.set_path(&path);
    if options.params.is_empty() {
        url.set_query(None);
    } else {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &options.params {
            pairs.append_pair(k, v);
        }
    }
    debug!(%method, url = %url, "built url");

    let mut request = Request::new(method, url);
    if let Some(body) = options.body {
        *request.body_mut() = Some(Body::from(body));
    }

    let api_key = client.api_key()?;
    let auth = HeaderValue::from_str(&format!("Key {}", api_key))
        .map_err(|_| AuthError::new("API key is not a valid header value"))?;
    let headers = request.headers_mut();
    headers.insert(AUTHORIZATION, auth);

    for (name, value) in &options.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::InvalidRequest(format!("header name {:?}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::InvalidRequest(format!("header {}: {}", name, e)))?;
        headers.insert(name, value);
    }
    Ok(request)
}

/// Build the request and hand it to the client's transport.
///
/// Build errors are returned without touching the transport. The response
/// is returned whatever its status.
pub async fn execute<C: RedashClient>(
    client: &C,
    method: Method,
    sub_path: &str,
    options: Options,
) -> Result<Response, Error> {
    info!(%method, sub_path, "do");
    let request = build_request(client, method, sub_path, options)?;
    client.transport().execute(request).await
}

/// GET `sub_path` with `params` merged into the default options.
pub async fn get<C: RedashClient>(
    client: &C,
    sub_path: &str,
    params: &[(&str, &str)],
) -> Result<Response, Error> {
    let mut opts = client.default_options();
    opts.merge_params(params.iter().copied());
    execute(client, Method::GET, sub_path, opts).await
}

/// POST a JSON document to `sub_path`.
pub async fn post<C: RedashClient>(
    client: &C,
    sub_path: &str,
    json_body: Vec<u8>,
) -> Result<Response, Error> {
    let mut opts = client.default_options();
    opts.set_header(CONTENT_TYPE.as_str(), "application/json");
    opts.body = Some(json_body);
    execute(client, Method::POST, sub_path, opts).await
}

/// DELETE `sub_path` with `params` merged into the default options.
pub async fn delete<C: RedashClient>(
    client: &C,
    sub_path: &str,
    params: &[(&str, &str)],
) -> Result<Response, Error> {
    let mut opts = client.default_options();
    opts.merge_params(params.iter().copied());
    execute(client, Method::DELETE, sub_path, opts).await
}

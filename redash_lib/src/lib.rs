//! Redash API client library.
//!
//! Builds authenticated requests against a Redash server and wraps the
//! queries, query-results and jobs endpoints with typed calls.
//!
//! Anything implementing [`RedashClient`] can drive the pipeline:
//! [`DefaultClient`] reads `REDASH_URL` / `REDASH_APIKEY`, [`StaticClient`]
//! takes explicit settings and a transport, and [`stub::StubClient`]
//! records requests for tests.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod helpers;
pub mod models;
pub mod options;
pub mod request;
pub mod secret;
pub mod stub;
pub mod transport;

pub use client::{DefaultClient, RedashClient, StaticClient};
pub use config::Config;
pub use error::{ApiError, AuthError, ConfigError, Error};
pub use helpers::{mask_key, parse_redash_url, ApiKeySource};
pub use models::{
    AdhocQuery, Column, Job, JobStatus, NewQuery, Query, QueryPage, QueryResult, Submission,
};
pub use options::Options;
pub use request::{build_request, delete, execute, get, post};
pub use transport::Transport;

/// Library version for User-Agent and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

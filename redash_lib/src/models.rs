//! Request and response shapes of the Redash API.
//!
//! Response types default every field, so partial payloads decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A saved query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub query: String,
    pub query_hash: Option<String>,
    pub schedule: Option<Value>,
    pub api_key: Option<String>,
    pub is_archived: bool,
    pub is_draft: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub data_source_id: Option<u64>,
    pub options: Value,
    pub version: u64,
    pub user: Option<User>,
    pub last_modified_by_id: Option<u64>,
    pub latest_query_data_id: Option<u64>,
    pub retrieved_at: Option<DateTime<Utc>>,
    pub runtime: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// One page of a query listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryPage {
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub results: Vec<Query>,
}

/// Body for creating or updating a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuery {
    pub data_source_id: u64,
    pub query: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl NewQuery {
    pub fn new(name: impl Into<String>, data_source_id: u64, query: impl Into<String>) -> Self {
        Self {
            data_source_id,
            query: query.into(),
            name: name.into(),
            description: None,
            schedule: None,
            options: None,
        }
    }
}

/// Body and answer of `POST queries/format`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedQuery {
    #[serde(default)]
    pub query: String,
}

/// Ad-hoc query submitted to `POST query_results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdhocQuery {
    pub query: String,
    pub max_age: u64,
    pub data_source_id: u64,
}

/// A materialized result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryResult {
    pub id: u64,
    pub query_hash: Option<String>,
    pub query: String,
    pub data: ResultData,
    pub data_source_id: Option<u64>,
    pub runtime: f64,
    pub retrieved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultData {
    pub columns: Vec<Column>,
    pub rows: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    pub name: String,
    pub friendly_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Lifecycle state of an async job, as reported by the numeric `status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum JobStatus {
    #[default]
    Pending,
    Started,
    Success,
    Failure,
    Cancelled,
    Unknown(u8),
}

impl JobStatus {
    /// No further status change will happen.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Success | Self::Failure | Self::Cancelled)
    }
}

impl From<u8> for JobStatus {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Pending,
            2 => Self::Started,
            3 => Self::Success,
            4 => Self::Failure,
            5 => Self::Cancelled,
            n => Self::Unknown(n),
        }
    }
}

impl From<JobStatus> for u8 {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Pending => 1,
            JobStatus::Started => 2,
            JobStatus::Success => 3,
            JobStatus::Failure => 4,
            JobStatus::Cancelled => 5,
            JobStatus::Unknown(n) => n,
        }
    }
}

/// An async unit of work, e.g. a query execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub error: Option<String>,
    pub query_result_id: Option<u64>,
    pub updated_at: f64,
}

impl Job {
    /// The error text, if the server reported a non-empty one.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Answer of `POST query_results`: a job to poll, or a cached result.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Job(Job),
    Cached(QueryResult),
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobEnvelope {
    pub job: Job,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResultEnvelope {
    pub query_result: QueryResult,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SubmissionEnvelope {
    Job(JobEnvelope),
    Cached(QueryResultEnvelope),
}

impl From<SubmissionEnvelope> for Submission {
    fn from(envelope: SubmissionEnvelope) -> Self {
        match envelope {
            SubmissionEnvelope::Job(e) => Submission::Job(e.job),
            SubmissionEnvelope::Cached(e) => Submission::Cached(e.query_result),
        }
    }
}

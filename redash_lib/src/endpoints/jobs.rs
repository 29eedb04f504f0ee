//! `api/jobs` endpoints.

use super::{decode, read_body, segment};
use crate::client::RedashClient;
use crate::error::Error;
use crate::models::{Job, JobEnvelope};
use crate::request::{delete, get};

/// Async job polling and cancellation.
pub struct Jobs<'a, C> {
    client: &'a C,
}

impl<'a, C: RedashClient> Jobs<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &str) -> Result<Job, Error> {
        let sub = format!("api/jobs/{}", segment("job id", id)?);
        let envelope: JobEnvelope = decode(get(self.client, &sub, &[]).await?).await?;
        Ok(envelope.job)
    }

    pub async fn cancel(&self, id: &str) -> Result<(), Error> {
        let sub = format!("api/jobs/{}", segment("job id", id)?);
        read_body(delete(self.client, &sub, &[]).await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use super::*;
    use crate::models::JobStatus;
    use crate::stub::{StubClient, StubTransport};

    const JOB: &str = r#"{
      "job": {
        "status": 3,
        "error": "",
        "id": "d856637d-9387-4874-a944-9c93ac45c688",
        "query_result_id": 1,
        "updated_at": 0
      }
    }"#;

    #[tokio::test]
    async fn get_polls_job() {
        let c = StubClient::new("http://test.local", "k1", StubTransport::ok(JOB));
        let job = c.jobs().get("d856637d-9387-4874-a944-9c93ac45c688").await.unwrap();
        assert_eq!(job.status, JobStatus::Success);
        assert_eq!(job.query_result_id, Some(1));
        let sent = c.transport().last_request().unwrap();
        assert_eq!(sent.method, Method::GET);
        assert_eq!(
            sent.url.path(),
            "/api/jobs/d856637d-9387-4874-a944-9c93ac45c688"
        );
    }

    #[tokio::test]
    async fn cancel_sends_delete() {
        let c = StubClient::new("http://test.local", "k1", StubTransport::ok(""));
        c.jobs().cancel("abc").await.unwrap();
        let sent = c.transport().last_request().unwrap();
        assert_eq!(sent.method, Method::DELETE);
        assert_eq!(sent.url.path(), "/api/jobs/abc");
    }

    #[tokio::test]
    async fn slash_in_job_id_is_rejected() {
        let c = StubClient::new("http://test.local", "k1", StubTransport::ok(JOB));
        let err = c.jobs().get("abc/../../queries/1").await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        let err = c.jobs().cancel("a/b").await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(c.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn cancel_reports_server_error() {
        let c = StubClient::new("http://test.local", "k1", StubTransport::new(500, ""));
        match c.jobs().cancel("abc").await {
            Err(Error::Api(e)) => {
                assert_eq!(e.status_code, 500);
                assert_eq!(e.message, "Internal Server Error");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }
}

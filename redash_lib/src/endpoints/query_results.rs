//! `api/query_results` endpoints.

use super::{decode, encode};
use crate::client::RedashClient;
use crate::error::Error;
use crate::models::{AdhocQuery, QueryResult, QueryResultEnvelope, Submission, SubmissionEnvelope};
use crate::request::{get, post};

/// Ad-hoc execution and result-set retrieval.
pub struct QueryResults<'a, C> {
    client: &'a C,
}

impl<'a, C: RedashClient> QueryResults<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Submit SQL for execution against a data source.
    ///
    /// A result younger than `max_age` seconds may be answered from cache.
    pub async fn submit(&self, query: &AdhocQuery) -> Result<Submission, Error> {
        let body = encode(query)?;
        let envelope: SubmissionEnvelope =
            decode(post(self.client, "api/query_results", body).await?).await?;
        Ok(envelope.into())
    }

    pub async fn get(&self, id: u64) -> Result<QueryResult, Error> {
        let envelope: QueryResultEnvelope =
            decode(get(self.client, &format!("api/query_results/{}", id), &[]).await?).await?;
        Ok(envelope.query_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{StubClient, StubTransport};

    const RESULT: &str = r#"{
      "query_result": {
        "retrieved_at": "2017-07-16T11:49:35.033971+00:00",
        "query_hash": "31d0721311ab1bcccc07504e61aa20dc",
        "query": "select * from hello;",
        "runtime": 0.00354194641113281,
        "data": {
          "rows": [{"id": 1, "name": "test1"}, {"id": 2, "name": "test2"}],
          "columns": [
            {"friendly_name": "id", "type": "integer", "name": "id"},
            {"friendly_name": "name", "type": null, "name": "name"}
          ]
        },
        "id": 2,
        "data_source_id": 1
      }
    }"#;

    #[tokio::test]
    async fn get_decodes_rows_and_columns() {
        let c = StubClient::new("http://test.local", "k1", StubTransport::ok(RESULT));
        let result = c.query_results().get(2).await.unwrap();
        assert_eq!(result.id, 2);
        assert_eq!(result.data.rows.len(), 2);
        assert_eq!(result.data.rows[1]["name"], "test2");
        assert_eq!(result.data.columns[0].kind.as_deref(), Some("integer"));
        assert_eq!(result.data.columns[1].kind, None);
        assert_eq!(
            c.transport().last_request().unwrap().url.path(),
            "/api/query_results/2"
        );
    }

    #[tokio::test]
    async fn submit_sends_adhoc_body() {
        let c = StubClient::new(
            "http://test.local",
            "k1",
            StubTransport::ok(r#"{"job": {"id": "d856", "status": 2, "error": ""}}"#),
        );
        let submitted = c
            .query_results()
            .submit(&AdhocQuery {
                query: "select 1".to_string(),
                max_age: 0,
                data_source_id: 1,
            })
            .await
            .unwrap();
        assert!(matches!(submitted, Submission::Job(ref j) if j.id == "d856"));

        let sent = c.transport().last_request().unwrap();
        assert_eq!(sent.url.path(), "/api/query_results");
        assert_eq!(
            sent.json().unwrap(),
            serde_json::json!({"query": "select 1", "max_age": 0, "data_source_id": 1})
        );
    }

    #[tokio::test]
    async fn submit_may_answer_from_cache() {
        let c = StubClient::new("http://test.local", "k1", StubTransport::ok(RESULT));
        let submitted = c
            .query_results()
            .submit(&AdhocQuery {
                query: "select * from hello;".to_string(),
                max_age: 3600,
                data_source_id: 1,
            })
            .await
            .unwrap();
        assert!(matches!(submitted, Submission::Cached(ref r) if r.id == 2));
    }
}

//! `api/queries` endpoints.

use super::{decode, encode, read_body, segment};
use crate::client::RedashClient;
use crate::error::Error;
use crate::models::{FormattedQuery, Job, JobEnvelope, NewQuery, Query, QueryPage};
use crate::request::{delete, get, post};

fn path(sub: &str) -> String {
    format!("api/queries/{}", sub)
}

/// Saved-query operations.
pub struct Queries<'a, C> {
    client: &'a C,
}

impl<'a, C: RedashClient> Queries<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Search queries by text.
    pub async fn search(&self, q: &str) -> Result<Vec<Query>, Error> {
        decode(get(self.client, &path("search"), &[("q", q)]).await?).await
    }

    /// Recently viewed queries.
    pub async fn recent(&self) -> Result<Vec<Query>, Error> {
        decode(get(self.client, &path("recent"), &[]).await?).await
    }

    /// Queries owned by the API key's user.
    pub async fn my(&self, page_size: u32, page: u32) -> Result<QueryPage, Error> {
        let (page_size, page) = (page_size.to_string(), page.to_string());
        let params = [("page_size", page_size.as_str()), ("page", page.as_str())];
        decode(get(self.client, &path("my"), &params).await?).await
    }

    /// All queries, paginated.
    pub async fn list(&self, page_size: u32, page: u32) -> Result<QueryPage, Error> {
        let (page_size, page) = (page_size.to_string(), page.to_string());
        let params = [("page_size", page_size.as_str()), ("page", page.as_str())];
        decode(get(self.client, &path(""), &params).await?).await
    }

    pub async fn create(&self, query: &NewQuery) -> Result<Query, Error> {
        let body = encode(query)?;
        decode(post(self.client, &path(""), body).await?).await
    }

    pub async fn get(&self, id: u64) -> Result<Query, Error> {
        decode(get(self.client, &path(&id.to_string()), &[]).await?).await
    }

    pub async fn update(&self, id: u64, query: &NewQuery) -> Result<Query, Error> {
        let body = encode(query)?;
        decode(post(self.client, &path(&id.to_string()), body).await?).await
    }

    /// Archive a query.
    pub async fn delete(&self, id: u64) -> Result<(), Error> {
        read_body(delete(self.client, &path(&id.to_string()), &[]).await?).await?;
        Ok(())
    }

    /// Pretty-print SQL server-side; returns the formatted text.
    pub async fn format(&self, sql: &str) -> Result<String, Error> {
        let body = encode(&FormattedQuery {
            query: sql.to_string(),
        })?;
        let formatted: FormattedQuery = decode(post(self.client, &path("format"), body).await?).await?;
        Ok(formatted.query)
    }

    /// Schedule a fresh execution; returns the job to poll.
    pub async fn refresh(&self, id: u64) -> Result<Job, Error> {
        let envelope: JobEnvelope =
            decode(post(self.client, &path(&format!("{}/refresh", id)), Vec::new()).await?).await?;
        Ok(envelope.job)
    }

    /// Duplicate a query; returns the copy.
    pub async fn fork(&self, id: u64) -> Result<Query, Error> {
        decode(post(self.client, &path(&format!("{}/fork", id)), Vec::new()).await?).await
    }

    /// A stored result in the given file extension (`csv`, `json`, `xlsx`).
    pub async fn result_file(&self, id: u64, result_id: u64, ext: &str) -> Result<Vec<u8>, Error> {
        let ext = segment("extension", ext)?;
        let sub = path(&format!("{}/results/{}.{}", id, result_id, ext));
        read_body(get(self.client, &sub, &[]).await?).await
    }

    /// The latest result in the given file extension.
    pub async fn latest_result_file(&self, id: u64, ext: &str) -> Result<Vec<u8>, Error> {
        let ext = segment("extension", ext)?;
        let sub = path(&format!("{}/results.{}", id, ext));
        read_body(get(self.client, &sub, &[]).await?).await
    }
}

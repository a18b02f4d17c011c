use axum::body::Bytes;
use reqwest::{header::ACCEPT, Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::IgnoredAny;
use thiserror::Error;
use url::Url;

/// Reasons an upstream call is not relayed. Transport errors have their URL
/// stripped because the query string carries the service key.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("upstream responded with status {0}")]
    Status(StatusCode),
    #[error("upstream body is not valid JSON: {0}")]
    MalformedBody(#[source] serde_json::Error),
}

/// Client for the third-party article API. Holds the only copy of the
/// service key; it never leaves this type except in the outgoing query.
pub struct UpstreamClient {
    http: Client,
    endpoint: Url,
    service_key: SecretString,
}

impl UpstreamClient {
    pub fn new(endpoint: Url, service_key: SecretString) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            service_key,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches one page and returns the upstream body untouched once it is
    /// known to be JSON.
    pub async fn fetch_page(
        &self,
        page_no: &str,
        num_of_rows: &str,
    ) -> Result<Bytes, UpstreamError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .query(&[
                ("serviceKey", self.service_key.expose_secret()),
                ("pageNo", page_no),
                ("numOfRows", num_of_rows),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url()))?;
        serde_json::from_slice::<IgnoredAny>(&body).map_err(UpstreamError::MalformedBody)?;
        Ok(body)
    }
}

#[cfg(test)]
#[path = "tests/upstream_tests.rs"]
mod tests;

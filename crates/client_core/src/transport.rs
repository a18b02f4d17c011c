use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{articles_route, PageRequest, UpstreamEnvelope};
use url::Url;

use crate::{error::FetchError, normalize::parse_envelope};

/// Where the page controller gets envelopes from.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_page(
        &self,
        page_no: u32,
        num_of_rows: u32,
    ) -> Result<UpstreamEnvelope, FetchError>;
}

/// Talks to the article proxy over HTTP.
pub struct HttpArticleSource {
    http: Client,
    endpoint: Url,
}

impl HttpArticleSource {
    pub fn new(server_url: &str) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(server_url)?.join(articles_route())?;
        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ArticleSource for HttpArticleSource {
    async fn fetch_page(
        &self,
        page_no: u32,
        num_of_rows: u32,
    ) -> Result<UpstreamEnvelope, FetchError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&PageRequest {
                page_no,
                num_of_rows,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        parse_envelope(&bytes)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;

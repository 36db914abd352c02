//! Calls to the upstream catalog API.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use super::config::ProxyConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("Request failed with status code {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
}

impl UpstreamError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(*status),
            Self::Transport(_) => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::Transport(err.to_string()),
        }
    }
}

/// A file body still arriving from upstream.
pub struct DownloadStream {
    pub content_type: Option<String>,
    pub body: BoxStream<'static, Result<Bytes, UpstreamError>>,
}

#[async_trait]
pub trait CatalogUpstream: Send + Sync {
    /// `GET {base}{endpoint}` with the catalog credentials.
    async fn get_json(&self, endpoint: &str, query: &[(&str, &str)])
        -> Result<Value, UpstreamError>;

    /// Opens an arbitrary media URL for streaming.
    async fn download(&self, url: &str) -> Result<DownloadStream, UpstreamError>;
}

pub struct RadioJavanClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    request_timeout: Duration,
    download_timeout: Duration,
}

impl RadioJavanClient {
    pub fn new(config: &ProxyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.upstream_base_url.trim_end_matches('/').to_string(),
            token: config
                .api_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
            request_timeout: config.request_timeout(),
            download_timeout: config.download_timeout(),
        }
    }
}

#[async_trait]
impl CatalogUpstream for RadioJavanClient {
    async fn get_json(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, UpstreamError> {
        let mut request = self
            .client
            .get(format!("{}{endpoint}", self.base_url))
            .header(ACCEPT, "*/*")
            .query(query)
            .timeout(self.request_timeout);
        if let Some(token) = &self.token {
            request = request.header("one-api-token", token);
        }

        let response = request.send().await?.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }

    async fn download(&self, url: &str) -> Result<DownloadStream, UpstreamError> {
        let response = self
            .client
            .get(url)
            .timeout(self.download_timeout)
            .send()
            .await?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(UpstreamError::from))
            .boxed();

        Ok(DownloadStream { content_type, body })
    }
}

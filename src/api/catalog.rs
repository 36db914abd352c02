use crate::api::models::*;
use crate::media::MediaItem;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use thiserror::Error;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

pub const API_PREFIX: &str = "/api/radiojavan";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("{error} (HTTP {status})")]
    Http {
        status: u16,
        error: String,
        message: Option<String>,
    },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("\"{0}\" has no downloadable source")]
    NoDownloadSource(String),
}

impl CatalogError {
    fn from_status(status: u16, body: Option<ApiErrorBody>) -> Self {
        match body {
            Some(body) => Self::Http {
                status,
                error: body.error,
                message: body.message,
            },
            None => Self::Http {
                status,
                error: "Request failed".to_string(),
                message: None,
            },
        }
    }

    /// Network failures and server-side errors are worth another attempt;
    /// client errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            Self::Decode(_) | Self::NoDownloadSource(_) => false,
        }
    }

    /// Text for the retry card.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http {
                message: Some(message),
                error,
                ..
            } => format!("{error}: {message}"),
            Self::Transport(_) => "Please check your connection and try again.".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (zero based), doubling each time.
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        self.base_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms)
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn retry_delay_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

#[cfg(target_arch = "wasm32")]
async fn retry_delay_ms(ms: u64) {
    gloo_timers::future::TimeoutFuture::new(ms.min(u32::MAX as u64) as u32).await;
}

/// A fetched file ready to hand to the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

/// Client for the proxy's catalog routes.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogClient {
    base_url: String,
    retry: RetryPolicy,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The proxy that served the page.
    #[cfg(target_arch = "wasm32")]
    pub fn same_origin() -> Self {
        let origin = web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .unwrap_or_default();
        Self::new(origin)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn same_origin() -> Self {
        Self::new("http://127.0.0.1:5000")
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url)
    }

    pub fn download_url(&self, source: &str) -> String {
        self.url(&format!("/download?url={}", urlencoding::encode(source)))
    }

    pub async fn home(&self) -> Result<HomeResponse, CatalogError> {
        self.get_json("/home").await
    }

    /// Blank queries never reach the network.
    pub async fn search(&self, query: &str) -> Result<Option<SearchResponse>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        let path = format!("/search?q={}", urlencoding::encode(query));
        self.get_json(&path).await.map(Some)
    }

    pub async fn playlist(&self, id: &str) -> Result<PlaylistDetail, CatalogError> {
        self.detail(DetailKind::Playlist, id).await
    }

    pub async fn detail<T: DeserializeOwned>(
        &self,
        kind: DetailKind,
        id: &str,
    ) -> Result<T, CatalogError> {
        let path = format!("/{}/{}", kind.path_segment(), urlencoding::encode(id));
        self.get_json(&path).await
    }

    /// Fetches the file behind `item` through the proxy. Not retried.
    pub async fn download(&self, item: &MediaItem) -> Result<DownloadedFile, CatalogError> {
        let source = item
            .download_source()
            .ok_or_else(|| CatalogError::NoDownloadSource(item.title.clone()))?;
        let response = HTTP_CLIENT
            .get(self.download_url(source))
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ApiErrorBody>().await.ok();
            return Err(CatalogError::from_status(status.as_u16(), body));
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        Ok(DownloadedFile {
            bytes: bytes.to_vec(),
            content_type,
            file_name: crate::media::download_file_name(item),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.url(path);
        let mut attempt = 0;
        loop {
            match self.fetch_json(&url).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.retry.retries => {
                    let delay = self.retry.delay_ms(attempt);
                    tracing::warn!(%url, attempt, delay_ms = delay, "catalog request failed, retrying: {err}");
                    retry_delay_ms(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!(%url, "catalog request failed: {err}");
                    return Err(err);
                }
            }
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let response = HTTP_CLIENT
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ApiErrorBody>().await.ok();
            return Err(CatalogError::from_status(status.as_u16(), body));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

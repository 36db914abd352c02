/// Catalog proxy handlers
use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::error::{ProxyError, Result};
use super::AppState;
use crate::api::{DetailKind, HealthStatus};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    pub url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

// A query string that fails to parse (repeated keys, bad encoding) counts
// as a missing parameter so the error body stays JSON.
fn query_value<T, F>(params: std::result::Result<Query<T>, QueryRejection>, field: F) -> Option<String>
where
    F: FnOnce(T) -> Option<String>,
{
    match params {
        Ok(Query(params)) => non_empty(field(params)),
        Err(rejection) => {
            tracing::debug!(%rejection, "unparseable query string");
            None
        }
    }
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        service: "Behimelobot API".to_string(),
        token_configured: state.token_configured,
    })
}

/// GET /api/radiojavan/home
pub async fn home(State(state): State<AppState>) -> Result<Json<Value>> {
    state
        .upstream
        .get_json("/home", &[])
        .await
        .map(Json)
        .map_err(|e| ProxyError::upstream("Failed to fetch home content", e))
}

/// GET /api/radiojavan/search?q=
pub async fn search(
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Value>> {
    let q = query_value(params, |params| params.q)
        .ok_or(ProxyError::BadRequest("Search query is required"))?;

    state
        .upstream
        .get_json("/search", &[("q", q.as_str())])
        .await
        .map(Json)
        .map_err(|e| ProxyError::upstream("Failed to search", e))
}

/// GET /api/radiojavan/{kind}/:id
pub async fn detail(state: AppState, kind: DetailKind, id: String) -> Result<Json<Value>> {
    let endpoint = format!("/{}/{}", kind.path_segment(), urlencoding::encode(&id));

    state
        .upstream
        .get_json(&endpoint, &[])
        .await
        .map(Json)
        .map_err(|e| ProxyError::upstream(format!("Failed to fetch {}", kind.path_segment()), e))
}

/// GET /api/radiojavan/download?url=
///
/// Streams the file back as an attachment.
pub async fn download(
    State(state): State<AppState>,
    params: std::result::Result<Query<DownloadParams>, QueryRejection>,
) -> Result<Response> {
    let url = query_value(params, |params| params.url)
        .ok_or(ProxyError::BadRequest("Download URL is required"))?;

    let file = state
        .upstream
        .download(&url)
        .await
        .map_err(|e| ProxyError::upstream("Failed to download file", e))?;

    let content_type = file
        .content_type
        .unwrap_or_else(|| "audio/mpeg".to_string());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, "attachment".to_string()),
        ],
        Body::from_stream(file.body),
    )
        .into_response())
}

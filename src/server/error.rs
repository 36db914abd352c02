/// Proxy error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::upstream::UpstreamError;
use crate::api::ApiErrorBody;

pub type Result<T> = std::result::Result<T, ProxyError>;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// A required query parameter was absent or empty.
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{label}: {source}")]
    Upstream {
        label: String,
        #[source]
        source: UpstreamError,
    },
}

impl ProxyError {
    pub fn upstream(label: impl Into<String>, source: UpstreamError) -> Self {
        Self::Upstream {
            label: label.into(),
            source,
        }
    }

    fn body(&self) -> ApiErrorBody {
        match self {
            ProxyError::BadRequest(label) => ApiErrorBody {
                status: StatusCode::BAD_REQUEST.as_u16(),
                error: (*label).to_string(),
                message: None,
            },
            ProxyError::Upstream { label, source } => ApiErrorBody {
                status: source
                    .status()
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
                error: label.clone(),
                message: Some(source.to_string()),
            },
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        if let ProxyError::Upstream { ref label, ref source } = self {
            tracing::error!("{}: {}", label, source);
        }

        let body = self.body();
        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_mirrored() {
        let err = ProxyError::upstream("Failed to fetch song", UpstreamError::Status(404));
        assert_eq!(
            err.body(),
            ApiErrorBody {
                status: 404,
                error: "Failed to fetch song".into(),
                message: Some("Request failed with status code 404".into()),
            }
        );
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn transport_failures_default_to_500() {
        let err = ProxyError::upstream(
            "Failed to search",
            UpstreamError::Transport("operation timed out".into()),
        );
        assert_eq!(err.body().status, 500);
        assert_eq!(err.body().message.as_deref(), Some("operation timed out"));
    }
}

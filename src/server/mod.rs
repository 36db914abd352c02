//! HTTP proxy in front of the catalog API.

pub mod config;
pub mod error;
pub mod routes;
pub mod upstream;

use axum::{
    extract::{Path, State},
    http::{header, Method},
    routing::get,
    Router,
};
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use upstream::{CatalogUpstream, DownloadStream, RadioJavanClient, UpstreamError};

use crate::api::DetailKind;

#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn CatalogUpstream>,
    pub token_configured: bool,
    /// Built web client. Unknown paths fall back to its `index.html`.
    pub web_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(upstream: Arc<dyn CatalogUpstream>, token_configured: bool) -> Self {
        Self {
            upstream,
            token_configured,
            web_dir: None,
        }
    }

    pub fn with_web_dir(mut self, dir: impl AsRef<FsPath>) -> Self {
        self.web_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        let state = Self::new(
            Arc::new(RadioJavanClient::new(config)),
            config.token_configured(),
        );
        match &config.web_dir {
            Some(dir) => state.with_web_dir(dir),
            None => state,
        }
    }
}

fn catalog_routes() -> Router<AppState> {
    let mut api = Router::new()
        .route("/home", get(routes::home))
        .route("/search", get(routes::search))
        .route("/download", get(routes::download));

    for kind in DetailKind::ALL {
        api = api.route(
            &format!("/{}/:id", kind.path_segment()),
            get(
                move |State(state): State<AppState>, Path(id): Path<String>| {
                    routes::detail(state, kind, id)
                },
            ),
        );
    }

    api
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app = Router::new()
        .nest("/api/radiojavan", catalog_routes())
        .route("/api/health", get(routes::health));

    if let Some(dir) = &state.web_dir {
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).fallback(index));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

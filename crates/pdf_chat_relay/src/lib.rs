//! HTTP relay: repackages client requests and forwards them to the upstream
//! inference backend, streaming chat responses back to the caller.

pub mod error;
pub mod relay;

use axum::{routing::post, Router};

pub use error::{RelayError, Result};

/// Cap on incoming multipart bodies (message plus attached PDF).
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Shared handler state: one HTTP client and the validated upstream base URL.
#[derive(Clone)]
pub struct AppState {
    pub(crate) http: reqwest::Client,
    upstream_url: String,
}

impl AppState {
    /// `upstream_url` is the backend base address, already validated at startup.
    pub fn new(upstream_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            upstream_url: upstream_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn upstream_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.upstream_url, path)
    }
}

/// Build the relay router: `POST /chat` and `POST /upload`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(relay::forward_chat))
        .route("/upload", post(relay::forward_upload))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

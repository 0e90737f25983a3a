//! Relay error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Required `file` field missing from an upload request.
    #[error("File not provided")]
    MissingFile,

    /// Incoming multipart payload could not be parsed.
    #[error("invalid multipart payload: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// Invalid request data.
    #[error("{message}")]
    BadRequest { message: String },

    /// The upstream backend could not be reached or failed mid-transfer.
    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    /// The upstream backend replied with something we cannot interpret.
    #[error("invalid upstream response: {0}")]
    UpstreamProtocol(String),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingFile | RelayError::Multipart(_) | RelayError::BadRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            RelayError::Upstream(_) | RelayError::UpstreamProtocol(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// User-safe message for the JSON body; upstream detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            RelayError::MissingFile => "File not provided".to_string(),
            RelayError::Multipart(e) => format!("invalid multipart payload: {e}"),
            RelayError::BadRequest { message } => message.clone(),
            RelayError::Upstream(_) => "upstream unavailable".to_string(),
            RelayError::UpstreamProtocol(_) => "invalid upstream response".to_string(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            RelayError::Upstream(e) => tracing::error!(error = %e, "upstream request failed"),
            RelayError::UpstreamProtocol(detail) => {
                tracing::error!(%detail, "invalid upstream response")
            }
            RelayError::MissingFile | RelayError::Multipart(_) | RelayError::BadRequest { .. } => {
                tracing::debug!("client error: {}", self)
            }
        }

        let body = Json(serde_json::json!({ "error": self.user_message() }));
        (self.status_code(), body).into_response()
    }
}

//! Relay handlers: repackage multipart ingress, forward upstream, stream back.

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};

use crate::error::{RelayError, Result};
use crate::AppState;

/// `POST /chat`: forward message + optional PDF, stream the reply back.
///
/// Every incoming form field is repackaged verbatim (names, file names and
/// part content types preserved) and sent to the upstream `/chat` endpoint
/// with an event-stream `Accept` header. The upstream body is relayed as a
/// live stream, never buffered in full.
pub async fn forward_chat(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut form = reqwest::multipart::Form::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                form = form.part(name, file_part(data.to_vec(), file_name, content_type)?);
            }
            None => {
                let text = field.text().await?;
                form = form.text(name, text);
            }
        }
    }

    let upstream = state
        .http
        .post(state.upstream_endpoint("/chat"))
        .header(header::ACCEPT, "text/event-stream")
        .multipart(form)
        .send()
        .await
        .map_err(RelayError::Upstream)?;

    Ok(relay_streamed(upstream))
}

/// `POST /upload`: forward a single required file, re-emit the upstream verdict.
///
/// Responds 400 without any outbound call when no file is attached. On
/// success only the upstream JSON's `result` field survives; everything
/// else is dropped.
pub async fn forward_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let mut file: Option<reqwest::multipart::Part> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        // A plain text value named `file` is not a file.
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;
        file = Some(file_part(data.to_vec(), file_name, content_type)?);
    }
    let file = file.ok_or(RelayError::MissingFile)?;

    let form = reqwest::multipart::Form::new().part("file", file);
    let upstream = state
        .http
        .post(state.upstream_endpoint("/upload"))
        .multipart(form)
        .send()
        .await
        .map_err(RelayError::Upstream)?;

    let body: serde_json::Value = upstream.json().await.map_err(|e| {
        if e.is_decode() {
            RelayError::UpstreamProtocol(format!("body is not JSON: {e}"))
        } else {
            RelayError::Upstream(e)
        }
    })?;

    let result = body
        .get("result")
        .cloned()
        .ok_or_else(|| RelayError::UpstreamProtocol("missing `result` field".to_string()))?;

    Ok(Json(serde_json::json!({ "result": result })))
}

fn file_part(
    data: Vec<u8>,
    file_name: String,
    content_type: Option<String>,
) -> Result<reqwest::multipart::Part> {
    let mut part = reqwest::multipart::Part::bytes(data).file_name(file_name);
    if let Some(ct) = content_type {
        part = part.mime_str(&ct).map_err(|e| RelayError::BadRequest {
            message: format!("invalid part content type: {e}"),
        })?;
    }
    Ok(part)
}

/// Pass the upstream response through as a live stream, echoing its status
/// and content type (defaulting to event-stream data when unreported).
fn relay_streamed(upstream: reqwest::Response) -> Response {
    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| HeaderValue::from_str(s).ok())
        .unwrap_or_else(|| HeaderValue::from_static("text/event-stream"));

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    response
}

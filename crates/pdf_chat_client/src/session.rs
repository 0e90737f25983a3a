//! Chat session: submit message + optional PDF, consume the streamed reply.

use futures_util::StreamExt;
use reqwest::header;
use std::path::Path;

use crate::stream::StreamBuffer;
use crate::transcript::{Role, Transcript};

/// Events reported while a submission streams in.
///
/// `Progress` carries the running concatenation of everything received so
/// far in this request, not just the latest chunk. `Complete` fires exactly
/// once, with the final accumulated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Progress(String),
    Complete(String),
}

/// Lifecycle of one submission. `Failed` is terminal for that exchange;
/// the next submission is permitted from `Failed` exactly as from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Sending,
    Streaming,
    Failed,
}

/// A file to attach to a submission. Expected to be a PDF; not validated.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Read an attachment from disk, taking the file name from the path.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file.pdf".to_string());
        let bytes = std::fs::read(path)?;
        Ok(Self { file_name, bytes })
    }
}

/// Session error.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("relay returned status {status}: {message}")]
    Relay { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

struct Inner {
    state: SessionState,
    transcript: Transcript,
}

/// Chat session against a relay.
///
/// Holds the finalized transcript and the per-submission state machine
/// (`Idle → Sending → Streaming → Idle`). Submissions are serialized:
/// a new submit while one is in flight is rejected, never queued.
pub struct Session {
    http: reqwest::Client,
    chat_url: String,
    inner: tokio::sync::Mutex<Inner>,
}

impl Session {
    /// Create a session against `relay_url` (e.g. `http://127.0.0.1:8080`).
    pub fn new(relay_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            chat_url: format!("{}/chat", relay_url.trim_end_matches('/')),
            inner: tokio::sync::Mutex::new(Inner {
                state: SessionState::Idle,
                transcript: Transcript::new(),
            }),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    /// Snapshot of the finalized transcript.
    pub async fn transcript(&self) -> Transcript {
        self.inner.lock().await.transcript.clone()
    }

    /// Submit a message with an optional attachment and stream the reply.
    ///
    /// `observe` receives `Progress(accumulated)` for every chunk and
    /// `Complete(final)` once the stream ends; the completed exchange is
    /// then appended to the transcript. On failure the in-progress buffer
    /// is discarded and the transcript is left untouched.
    pub async fn submit(
        &self,
        message: &str,
        attachment: Option<Attachment>,
        mut observe: impl FnMut(StreamEvent),
    ) -> Result<String, SessionError> {
        let mut form = reqwest::multipart::Form::new().text("message", message.to_string());
        if let Some(att) = attachment {
            let part = reqwest::multipart::Part::bytes(att.bytes)
                .file_name(att.file_name)
                .mime_str("application/pdf")?;
            form = form.part("file", part);
        }

        {
            let mut inner = self.inner.lock().await;
            match inner.state {
                SessionState::Sending | SessionState::Streaming => {
                    return Err(SessionError::SubmissionInFlight)
                }
                SessionState::Idle | SessionState::Failed => inner.state = SessionState::Sending,
            }
        }

        let response = match self
            .http
            .post(&self.chat_url)
            .header(header::ACCEPT, "text/event-stream")
            .multipart(form)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                self.fail().await;
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            // The relay reports errors as JSON {"error": message}.
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_else(|| "relay request failed".to_string());
            self.fail().await;
            return Err(SessionError::Relay {
                status: status.as_u16(),
                message,
            });
        }

        // Strictly sequential pull loop: one chunk read outstanding at a time.
        let mut stream = response.bytes_stream();
        let mut buffer = StreamBuffer::new();
        let mut first = true;
        while let Some(next) = stream.next().await {
            let bytes = match next {
                Ok(b) => b,
                Err(e) => {
                    self.fail().await;
                    return Err(e.into());
                }
            };
            if first {
                self.set_state(SessionState::Streaming).await;
                first = false;
            }
            buffer.push(&bytes);
            observe(StreamEvent::Progress(buffer.text().to_string()));
        }

        let final_text = buffer.finish();
        observe(StreamEvent::Complete(final_text.clone()));

        let mut inner = self.inner.lock().await;
        inner.transcript.push(Role::User, message);
        inner.transcript.push(Role::Assistant, final_text.clone());
        inner.state = SessionState::Idle;
        Ok(final_text)
    }

    async fn set_state(&self, state: SessionState) {
        self.inner.lock().await.state = state;
    }

    async fn fail(&self) {
        self.set_state(SessionState::Failed).await;
    }
}

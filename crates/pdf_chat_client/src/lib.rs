//! Shared PDF chat client library (config, streaming session, transcript).
//! Used by the pdf-chat TUI; the relay server reuses the config schema.

pub mod config;
pub mod session;
pub mod stream;
pub mod transcript;

pub use config::{default_config_path, ClientSection, Config, ConfigError, RelaySection};
pub use session::{Attachment, Session, SessionError, SessionState, StreamEvent};
pub use stream::StreamBuffer;
pub use transcript::{Role, Transcript, Turn};

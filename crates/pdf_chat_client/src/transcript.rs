//! Append-only transcript of completed exchanges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One finalized turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Ordered record of completed exchanges. Turns are only ever appended,
/// and only once a streamed response has fully completed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, text: impl Into<String>) {
        self.turns.push(Turn {
            role,
            text: text.into(),
            at: Utc::now(),
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render the transcript as labeled Markdown text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            let label = match turn.role {
                Role::User => "**You:**",
                Role::Assistant => "**LLM:**",
            };
            out.push_str("\n\n");
            out.push_str(label);
            out.push(' ');
            out.push_str(&turn.text);
            out.push_str("\n\n");
        }
        out
    }
}

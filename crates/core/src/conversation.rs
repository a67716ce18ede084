//! Conversation log — the ordered, append-only record of one research run.
//!
//! The first entry, when present, is the original task under the
//! [`HUMAN_ROLE`] tag; every later entry carries the director agent's name
//! as its role. Entries are never edited, removed, or reordered, and the
//! log is never truncated automatically — repeated runs against the same
//! orchestrator accumulate monotonically.

use serde::{Deserialize, Serialize};

/// Role tag used for the seeded task entry.
pub const HUMAN_ROLE: &str = "human";

/// A single (role, content) turn in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Who produced this turn — `"human"` or a director agent name
    pub role: String,

    /// The text content
    pub content: String,
}

/// An ordered sequence of conversation entries, owned by one orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationLog {
    entries: Vec<Entry>,
}

impl ConversationLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Entries can only ever be added, never removed.
    pub fn add(&mut self, role: impl Into<String>, content: impl Into<String>) {
        self.entries.push(Entry {
            role: role.into(),
            content: content.into(),
        });
    }

    /// The full ordered history as a read-only view.
    pub fn history(&self) -> &[Entry] {
        &self.entries
    }

    /// The content of the most recent entry, or `""` for an empty log.
    pub fn final_message(&self) -> &str {
        self.entries.last().map(|e| e.content.as_str()).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

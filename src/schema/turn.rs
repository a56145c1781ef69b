use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who spoke a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Character,
}

/// One exchange unit in a conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: u64,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a turn stamped with the current time.
    pub fn new(id: u64, sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id,
            sender,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Hour and minute of the timestamp, e.g. "09:41".
    pub fn clock_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

use serde::{Deserialize, Serialize};

/// A resident of an era the visitor can talk to.
///
/// `responses` is the character's response pool: the lines the dialogue
/// policy falls back to when no keyword rule fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub topics: Vec<String>,
    pub responses: Vec<String>,
}

impl Character {
    /// First letter of the display name, used for avatars.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }

    /// The first `limit` topic hints, in authored order.
    pub fn suggested_topics(&self, limit: usize) -> &[String] {
        &self.topics[..limit.min(self.topics.len())]
    }

    /// "Role • Status", or just the role when no status is set.
    pub fn byline(&self) -> String {
        if self.status.is_empty() {
            self.role.clone()
        } else {
            format!("{} • {}", self.role, self.status)
        }
    }
}

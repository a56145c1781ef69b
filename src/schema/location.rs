use serde::{Deserialize, Serialize};

/// A place within an era the visitor can explore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Long-form scene description shown in the scene viewer.
    #[serde(default)]
    pub scene: String,
    #[serde(default)]
    pub sounds: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    /// Path of the ambient loop played while the scene is open.
    #[serde(default)]
    pub ambient_audio: Option<String>,
}

impl Location {
    /// Description cut to at most `max_chars` characters with a trailing
    /// ellipsis, for location lists.
    pub fn teaser(&self, max_chars: usize) -> String {
        if self.description.chars().count() <= max_chars {
            return self.description.clone();
        }
        let cut: String = self.description.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

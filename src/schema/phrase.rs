use serde::{Deserialize, Serialize};

/// A Latin phrase with its English gloss and where you would hear it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatinPhrase {
    pub latin: String,
    pub english: String,
    #[serde(default)]
    pub context: String,
}

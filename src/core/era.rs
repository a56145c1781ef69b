//! Era data: everything one era ships: cast, rules, phrases, places.
//!
//! An era directory holds `characters.ron` (required), plus `rules.ron`,
//! `phrases.ron` and `locations.ron`, each optional.

use std::path::Path;
use thiserror::Error;

use crate::core::characters::{CharacterError, CharacterTable};
use crate::core::locations::{LocationCatalog, LocationError};
use crate::core::phrasebook::{PhraseBook, PhraseError};
use crate::core::policy::{DialoguePolicy, PolicyError};
use crate::core::rules::{RuleError, RuleSet};

pub const CHARACTERS_FILE: &str = "characters.ron";
pub const RULES_FILE: &str = "rules.ron";
pub const PHRASES_FILE: &str = "phrases.ron";
pub const LOCATIONS_FILE: &str = "locations.ron";

#[derive(Debug, Error)]
pub enum EraError {
    #[error("characters: {0}")]
    Characters(#[from] CharacterError),
    #[error("rules: {0}")]
    Rules(#[from] RuleError),
    #[error("phrases: {0}")]
    Phrases(#[from] PhraseError),
    #[error("locations: {0}")]
    Locations(#[from] LocationError),
    #[error("policy: {0}")]
    Policy(#[from] PolicyError),
    #[error("era directory not found: {0}")]
    NotFound(String),
}

/// Raw RON sources for one era, e.g. from `include_str!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EraSources<'a> {
    pub characters: &'a str,
    pub rules: Option<&'a str>,
    pub phrases: Option<&'a str>,
    pub locations: Option<&'a str>,
}

/// A fully loaded era.
#[derive(Debug, Clone)]
pub struct EraData {
    pub name: String,
    pub policy: DialoguePolicy,
    pub phrases: PhraseBook,
    pub locations: LocationCatalog,
}

impl EraData {
    /// Load an era from a directory; its name is the directory's name.
    pub fn load_dir(dir: &Path) -> Result<EraData, EraError> {
        if !dir.is_dir() {
            return Err(EraError::NotFound(dir.display().to_string()));
        }
        let name = dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let policy = DialoguePolicy::builder().era_dir(dir).build()?;

        let phrases_path = dir.join(PHRASES_FILE);
        let phrases = if phrases_path.exists() {
            PhraseBook::load_from_ron(&phrases_path)?
        } else {
            PhraseBook::default()
        };

        let locations_path = dir.join(LOCATIONS_FILE);
        let locations = if locations_path.exists() {
            LocationCatalog::load_from_ron(&locations_path)?
        } else {
            LocationCatalog::default()
        };

        let era = EraData {
            name,
            policy,
            phrases,
            locations,
        };
        era.log_loaded();
        Ok(era)
    }

    /// Build an era from in-memory RON sources.
    pub fn parse(name: &str, sources: EraSources<'_>) -> Result<EraData, EraError> {
        let characters = CharacterTable::parse_ron(sources.characters)?;
        let rules = match sources.rules {
            Some(src) => RuleSet::parse_ron(src)?,
            None => RuleSet::default(),
        };
        let phrases = match sources.phrases {
            Some(src) => PhraseBook::parse_ron(src)?,
            None => PhraseBook::default(),
        };
        let locations = match sources.locations {
            Some(src) => LocationCatalog::parse_ron(src)?,
            None => LocationCatalog::default(),
        };

        let era = EraData {
            name: name.to_string(),
            policy: DialoguePolicy::new(characters, rules),
            phrases,
            locations,
        };
        era.log_loaded();
        Ok(era)
    }

    fn log_loaded(&self) {
        tracing::info!(
            era = %self.name,
            characters = self.policy.characters().len(),
            rules = self.policy.rules().len(),
            phrase_categories = self.phrases.len(),
            locations = self.locations.len(),
            "loaded era data"
        );
    }
}

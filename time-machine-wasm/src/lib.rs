//! WASM bindings for time-machine: powers the browser chat widget,
//! phrase browser and scene viewer.

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use time_machine::core::catalog::EraCatalog;
use time_machine::core::era::{EraData, EraSources};
use time_machine::core::phrasebook::DEFAULT_CATEGORY;
use time_machine::core::session::{Conversation, SUGGESTED_TOPICS};
use time_machine::schema::turn::Turn;

// ---------------------------------------------------------------------------
// Embedded era data, compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const ERA_CATALOG: &str = include_str!("../../era_data/eras.ron");
    pub const POMPEII_CHARACTERS: &str = include_str!("../../era_data/pompeii/characters.ron");
    pub const POMPEII_RULES: &str = include_str!("../../era_data/pompeii/rules.ron");
    pub const POMPEII_PHRASES: &str = include_str!("../../era_data/pompeii/phrases.ron");
    pub const POMPEII_LOCATIONS: &str = include_str!("../../era_data/pompeii/locations.ron");
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct CharacterInfo<'a> {
    id: &'a str,
    name: &'a str,
    role: &'a str,
    status: &'a str,
    initial: String,
    topics: &'a [String],
}

#[derive(serde::Serialize)]
struct CategoryInfo<'a> {
    key: &'a str,
    name: String,
    count: usize,
}

#[derive(serde::Serialize)]
struct SceneInfo<'a> {
    id: &'a str,
    description: &'a str,
    sounds: &'a [String],
    activities: &'a [String],
    ambient_audio: Option<&'a str>,
}

fn era_sources(era: &str) -> Option<EraSources<'static>> {
    match era {
        "pompeii" => Some(EraSources {
            characters: data::POMPEII_CHARACTERS,
            rules: Some(data::POMPEII_RULES),
            phrases: Some(data::POMPEII_PHRASES),
            locations: Some(data::POMPEII_LOCATIONS),
        }),
        _ => None,
    }
}

fn catalog() -> Result<EraCatalog, String> {
    EraCatalog::parse_ron(data::ERA_CATALOG).map_err(|e| format!("Era catalog error: {e}"))
}

/// Open an era by id: it must be listed as ready and have embedded data.
fn load_era(id: &str) -> Result<EraData, String> {
    let catalog = catalog()?;
    let info = catalog.resolve(id).map_err(|e| e.to_string())?;
    let sources =
        era_sources(&info.id).ok_or_else(|| format!("No data bundled for era: {}", info.id))?;
    EraData::parse(&info.id, sources).map_err(|e| format!("Era data error: {e}"))
}

/// JSON array of catalog entries, optionally only the ready ones.
fn catalog_json(only_available: bool) -> Result<String, String> {
    let catalog = catalog()?;
    let list: Vec<_> = catalog
        .iter()
        .filter(|e| !only_available || e.is_available())
        .collect();
    serde_json::to_string(&list).map_err(|e| format!("Serialization error: {e}"))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// EraChat, the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct EraChat {
    era: EraData,
    conversation: Conversation,
    rng: StdRng,
}

#[wasm_bindgen]
impl EraChat {
    /// Open a conversation with `character_id` in the given era.
    ///
    /// A `seed` of zero draws replies from OS entropy.
    #[wasm_bindgen(constructor)]
    pub fn new(era: &str, character_id: &str, seed: u64) -> Result<EraChat, JsError> {
        let era = load_era(era).map_err(|e| JsError::new(&e))?;
        let conversation = Conversation::new(&era.policy, character_id);
        let rng = if seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(seed)
        };
        Ok(EraChat {
            era,
            conversation,
            rng,
        })
    }

    /// JSON array of the eras that can be opened now.
    pub fn available_eras() -> Result<String, JsError> {
        catalog_json(true).map_err(|e| JsError::new(&e))
    }

    /// JSON array of every era in the catalog, whatever its status.
    pub fn eras() -> Result<String, JsError> {
        catalog_json(false).map_err(|e| JsError::new(&e))
    }

    /// Send the visitor's message. Returns the character's reply turn as JSON.
    pub fn send(&mut self, text: &str) -> Result<String, JsError> {
        let reply = self
            .conversation
            .submit(&self.era.policy, text, &mut self.rng)
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_json(reply)
    }

    /// JSON array of every turn so far.
    pub fn history(&self) -> Result<String, JsError> {
        let turns: &[Turn] = self.conversation.turns();
        to_json(&turns)
    }

    /// Text of the most recent turn, for "speak last message".
    pub fn last_message(&self) -> String {
        self.conversation
            .last_turn()
            .map(|t| t.content.clone())
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.conversation.clear();
    }

    /// Switch to another character, starting a fresh conversation.
    pub fn switch_character(&mut self, character_id: &str) {
        self.conversation = Conversation::new(&self.era.policy, character_id);
    }

    /// JSON description of the current character, or `null` if unknown.
    pub fn character(&self) -> Result<String, JsError> {
        let info = self
            .conversation
            .character(&self.era.policy)
            .map(|c| CharacterInfo {
                id: &c.id,
                name: &c.name,
                role: &c.role,
                status: &c.status,
                initial: c.initial().map(String::from).unwrap_or_default(),
                topics: c.suggested_topics(SUGGESTED_TOPICS),
            });
        to_json(&info)
    }

    /// JSON array of all characters in the era.
    pub fn characters(&self) -> Result<String, JsError> {
        let list: Vec<CharacterInfo<'_>> = self
            .era
            .policy
            .characters()
            .iter()
            .map(|c| CharacterInfo {
                id: &c.id,
                name: &c.name,
                role: &c.role,
                status: &c.status,
                initial: c.initial().map(String::from).unwrap_or_default(),
                topics: &c.topics,
            })
            .collect();
        to_json(&list)
    }

    /// JSON array of phrase categories with display names.
    pub fn phrase_categories(&self) -> Result<String, JsError> {
        let list: Vec<CategoryInfo<'_>> = self
            .era
            .phrases
            .categories()
            .iter()
            .map(|c| CategoryInfo {
                key: &c.key,
                name: c.display_name(),
                count: c.phrases.len(),
            })
            .collect();
        to_json(&list)
    }

    /// JSON array of phrases in a category; an empty key means the default.
    pub fn phrases(&self, category: &str) -> Result<String, JsError> {
        let key = if category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            category
        };
        to_json(&self.era.phrases.phrases(key))
    }

    /// JSON scene details for a location; unknown ids get the placeholder text.
    pub fn scene(&self, location_id: &str) -> Result<String, JsError> {
        let location = self.era.locations.get(location_id);
        let info = SceneInfo {
            id: location_id,
            description: self.era.locations.scene_description(location_id),
            sounds: location.map(|l| l.sounds.as_slice()).unwrap_or_default(),
            activities: location.map(|l| l.activities.as_slice()).unwrap_or_default(),
            ambient_audio: self.era.locations.ambient_audio(location_id),
        };
        to_json(&info)
    }
}

//! Character table: the cast of an era and their response pools.
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::schema::character::Character;

#[derive(Debug, Error)]
pub enum CharacterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("character with a blank id: {0:?}")]
    BlankId(String),
    #[error("duplicate character id: {0}")]
    Duplicate(String),
    #[error("character '{0}' has an empty response pool")]
    EmptyPool(String),
    #[error("character '{0}' has a blank response line")]
    BlankResponse(String),
    #[error("the default response pool is empty")]
    EmptyDefaultPool,
    #[error("the default response pool contains a blank line")]
    BlankDefaultResponse,
    #[error("the era greeting is blank")]
    BlankGreeting,
}

/// Registry of an era's characters, keyed by id, plus the shared default
/// pool used for ids that resolve to nobody.
///
/// Every pool in a table is non-empty and holds no blank lines; the
/// constructors enforce it so the dialogue policy can always answer.
#[derive(Debug, Clone)]
pub struct CharacterTable {
    greeting: String,
    default_pool: Vec<String>,
    characters: Vec<Character>,
    index: FxHashMap<String, usize>,
}

#[derive(Debug, Deserialize)]
struct RonCharacterTable {
    greeting: String,
    default_pool: Vec<String>,
    #[serde(default)]
    characters: Vec<Character>,
}

impl CharacterTable {
    pub fn new(
        greeting: impl Into<String>,
        default_pool: Vec<String>,
    ) -> Result<Self, CharacterError> {
        let greeting = greeting.into();
        if greeting.trim().is_empty() {
            return Err(CharacterError::BlankGreeting);
        }
        if default_pool.is_empty() {
            return Err(CharacterError::EmptyDefaultPool);
        }
        if default_pool.iter().any(|line| line.trim().is_empty()) {
            return Err(CharacterError::BlankDefaultResponse);
        }
        Ok(Self {
            greeting,
            default_pool,
            characters: Vec::new(),
            index: FxHashMap::default(),
        })
    }

    /// Add a character. Ids are unique within a table.
    pub fn register(&mut self, character: Character) -> Result<(), CharacterError> {
        if character.id.trim().is_empty() {
            return Err(CharacterError::BlankId(character.name));
        }
        if self.index.contains_key(&character.id) {
            return Err(CharacterError::Duplicate(character.id));
        }
        if character.responses.is_empty() {
            return Err(CharacterError::EmptyPool(character.id));
        }
        if character.responses.iter().any(|line| line.trim().is_empty()) {
            return Err(CharacterError::BlankResponse(character.id));
        }
        self.index
            .insert(character.id.clone(), self.characters.len());
        self.characters.push(character);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Character> {
        self.index.get(id).map(|&i| &self.characters[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// The line that opens every conversation.
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn default_pool(&self) -> &[String] {
        &self.default_pool
    }

    /// Characters in authored order.
    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Load a character table from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Self, CharacterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a character table from a RON string.
    pub fn parse_ron(input: &str) -> Result<Self, CharacterError> {
        let raw: RonCharacterTable = ron::from_str(input)?;
        let mut table = Self::new(raw.greeting, raw.default_pool)?;
        for character in raw.characters {
            table.register(character)?;
        }
        Ok(table)
    }
}

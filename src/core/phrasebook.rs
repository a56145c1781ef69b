//! Phrase book: an era's Latin phrases grouped into ordered categories.
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::schema::phrase::LatinPhrase;

/// Category opened when the phrase browser first shows.
pub const DEFAULT_CATEGORY: &str = "common_greetings";

#[derive(Debug, Error)]
pub enum PhraseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("duplicate phrase category: {0}")]
    DuplicateCategory(String),
}

/// A named group of phrases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseCategory {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    pub phrases: Vec<LatinPhrase>,
}

impl PhraseCategory {
    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => humanize_key(&self.key),
        }
    }
}

/// "market_phrases" → "market phrases".
pub fn humanize_key(key: &str) -> String {
    key.replace('_', " ")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseBook {
    categories: Vec<PhraseCategory>,
}

impl PhraseBook {
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    pub fn add(&mut self, category: PhraseCategory) -> Result<(), PhraseError> {
        if self.category(&category.key).is_some() {
            return Err(PhraseError::DuplicateCategory(category.key));
        }
        self.categories.push(category);
        Ok(())
    }

    pub fn category(&self, key: &str) -> Option<&PhraseCategory> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Category keys in authored order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.key.as_str())
    }

    pub fn categories(&self) -> &[PhraseCategory] {
        &self.categories
    }

    /// Phrases of a category; empty for an unknown key.
    pub fn phrases(&self, key: &str) -> &[LatinPhrase] {
        self.category(key)
            .map(|c| c.phrases.as_slice())
            .unwrap_or_default()
    }

    /// Label for a category key, humanized when the key is unknown or unlabeled.
    pub fn display_name(&self, key: &str) -> String {
        self.category(key)
            .map(PhraseCategory::display_name)
            .unwrap_or_else(|| humanize_key(key))
    }

    /// Find phrases whose Latin or English text contains `query`,
    /// ignoring case, across all categories.
    pub fn search(&self, query: &str) -> Vec<(&str, &LatinPhrase)> {
        let needle = query.to_lowercase();
        self.categories
            .iter()
            .flat_map(|c| c.phrases.iter().map(move |p| (c.key.as_str(), p)))
            .filter(|(_, p)| {
                p.latin.to_lowercase().contains(&needle)
                    || p.english.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Load a phrase book from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<PhraseBook, PhraseError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a phrase book from a RON list of categories.
    pub fn parse_ron(input: &str) -> Result<PhraseBook, PhraseError> {
        let raw: Vec<PhraseCategory> = ron::from_str(input)?;
        let mut book = PhraseBook::new();
        for category in raw {
            book.add(category)?;
        }
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK_RON: &str = r#"[
        (
            key: "common_greetings",
            label: Some("Common Greetings"),
            phrases: [
                (latin: "Salve!", english: "Hello!", context: "Street greeting"),
                (latin: "Vale!", english: "Goodbye!", context: "Parting"),
            ],
        ),
        (
            key: "market_phrases_extra",
            phrases: [
                (latin: "Quanti constat?", english: "How much does it cost?"),
            ],
        ),
    ]"#;

    #[test]
    fn parse_book() {
        let book = PhraseBook::parse_ron(BOOK_RON).unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(
            book.keys().collect::<Vec<_>>(),
            vec!["common_greetings", "market_phrases_extra"]
        );
        assert_eq!(book.phrases(DEFAULT_CATEGORY).len(), 2);
        assert!(book.phrases("market_phrases_extra")[0].context.is_empty());
    }

    #[test]
    fn unknown_category_is_empty() {
        let book = PhraseBook::parse_ron(BOOK_RON).unwrap();
        assert!(book.phrases("curses").is_empty());
        assert!(book.category("curses").is_none());
    }

    #[test]
    fn display_names() {
        let book = PhraseBook::parse_ron(BOOK_RON).unwrap();
        assert_eq!(book.display_name("common_greetings"), "Common Greetings");
        assert_eq!(book.display_name("market_phrases_extra"), "market phrases extra");
        assert_eq!(book.display_name("time_and_weather"), "time and weather");
    }

    #[test]
    fn duplicate_category_rejected() {
        let input = r#"[
            (key: "philosophical", phrases: []),
            (key: "philosophical", phrases: []),
        ]"#;
        assert!(matches!(
            PhraseBook::parse_ron(input),
            Err(PhraseError::DuplicateCategory(k)) if k == "philosophical"
        ));
    }

    #[test]
    fn search_latin_and_english() {
        let book = PhraseBook::parse_ron(BOOK_RON).unwrap();
        let hits = book.search("salve");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "common_greetings");
        let hits = book.search("COST");
        assert_eq!(hits[0].1.latin, "Quanti constat?");
        assert!(book.search("gladius").is_empty());
    }

    #[test]
    fn load_pompeii_phrases() {
        let path = std::path::PathBuf::from("era_data/pompeii/phrases.ron");
        let book = PhraseBook::load_from_ron(&path).unwrap();
        assert_eq!(book.len(), 6);
        assert_eq!(book.keys().next(), Some(DEFAULT_CATEGORY));
        assert_eq!(book.display_name("food_and_drink"), "Food & Drink");
    }
}

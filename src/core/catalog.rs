//! Era catalog: every historical era the app knows, with its readiness.
use rustc_hash::FxHashMap;
use std::path::Path;
use thiserror::Error;

use crate::schema::era::EraInfo;

/// Era selected when nothing else is asked for.
pub const DEFAULT_ERA: &str = "pompeii";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("era with a blank id: {0:?}")]
    BlankId(String),
    #[error("duplicate era id: {0}")]
    Duplicate(String),
    #[error("unknown era: {0}")]
    UnknownEra(String),
    #[error("era '{0}' is not available yet ({1})")]
    Unavailable(String, &'static str),
}

#[derive(Debug, Clone, Default)]
pub struct EraCatalog {
    eras: Vec<EraInfo>,
    index: FxHashMap<String, usize>,
}

impl EraCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, era: EraInfo) -> Result<(), CatalogError> {
        if era.id.trim().is_empty() {
            return Err(CatalogError::BlankId(era.name));
        }
        if self.index.contains_key(&era.id) {
            return Err(CatalogError::Duplicate(era.id));
        }
        self.index.insert(era.id.clone(), self.eras.len());
        self.eras.push(era);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&EraInfo> {
        self.index.get(id).map(|&i| &self.eras[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Eras in display order.
    pub fn iter(&self) -> impl Iterator<Item = &EraInfo> {
        self.eras.iter()
    }

    /// Eras that can be opened right now.
    pub fn available(&self) -> impl Iterator<Item = &EraInfo> {
        self.eras.iter().filter(|e| e.is_available())
    }

    /// Look up an era that is about to be opened. Unknown ids and eras
    /// that are not ready are errors.
    pub fn resolve(&self, id: &str) -> Result<&EraInfo, CatalogError> {
        let era = self
            .get(id)
            .ok_or_else(|| CatalogError::UnknownEra(id.to_string()))?;
        if !era.is_available() {
            return Err(CatalogError::Unavailable(era.id.clone(), era.status.label()));
        }
        Ok(era)
    }

    pub fn len(&self) -> usize {
        self.eras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eras.is_empty()
    }

    /// Load a catalog from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<EraCatalog, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a catalog from a RON list of eras.
    pub fn parse_ron(input: &str) -> Result<EraCatalog, CatalogError> {
        let raw: Vec<EraInfo> = ron::from_str(input)?;
        let mut catalog = EraCatalog::new();
        for era in raw {
            catalog.add(era)?;
        }
        tracing::debug!(eras = catalog.len(), "loaded era catalog");
        Ok(catalog)
    }
}

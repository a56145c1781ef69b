//! Location catalog: an era's places and their scene descriptions.
use std::path::Path;
use thiserror::Error;

use crate::schema::location::Location;

/// Shown by the scene viewer when no known location is selected.
pub const NO_SCENE: &str = "Select a location to view the scene.";

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("duplicate location id: {0}")]
    Duplicate(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationCatalog {
    locations: Vec<Location>,
}

impl LocationCatalog {
    pub fn new() -> Self {
        Self {
            locations: Vec::new(),
        }
    }

    pub fn add(&mut self, location: Location) -> Result<(), LocationError> {
        if self.get(&location.id).is_some() {
            return Err(LocationError::Duplicate(location.id));
        }
        self.locations.push(location);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// The first location, which the explorer opens on.
    pub fn first(&self) -> Option<&Location> {
        self.locations.first()
    }

    /// Scene text for a location, or `NO_SCENE` when there is none.
    pub fn scene_description(&self, id: &str) -> &str {
        match self.get(id) {
            Some(location) if !location.scene.is_empty() => &location.scene,
            _ => NO_SCENE,
        }
    }

    pub fn ambient_audio(&self, id: &str) -> Option<&str> {
        self.get(id)?.ambient_audio.as_deref()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Load a catalog from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<LocationCatalog, LocationError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a catalog from a RON list of locations.
    pub fn parse_ron(input: &str) -> Result<LocationCatalog, LocationError> {
        let raw: Vec<Location> = ron::from_str(input)?;
        let mut catalog = LocationCatalog::new();
        for location in raw {
            catalog.add(location)?;
        }
        Ok(catalog)
    }
}

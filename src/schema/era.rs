use serde::{Deserialize, Serialize};

/// How far along an era's content is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all(serialize = "kebab-case"))]
pub enum EraStatus {
    Ready,
    ComingSoon,
    Planned,
}

impl EraStatus {
    /// Badge text for era lists.
    pub fn label(&self) -> &'static str {
        match self {
            EraStatus::Ready => "Ready",
            EraStatus::ComingSoon => "Coming soon",
            EraStatus::Planned => "Planned",
        }
    }
}

/// One entry in the catalog of historical eras.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Download size of the era's assets, e.g. "450MB".
    #[serde(default)]
    pub model_size: String,
    pub status: EraStatus,
    /// Places and activities the era offers, in display order.
    #[serde(default)]
    pub features: Vec<String>,
}

impl EraInfo {
    /// Only ready eras can be opened.
    pub fn is_available(&self) -> bool {
        self.status == EraStatus::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coming_soon_era_parses() {
        let era: EraInfo = ron::from_str(
            r#"(
                id: "medieval",
                name: "Medieval Paris, 1350",
                description: "Walk through medieval streets",
                status: ComingSoon,
            )"#,
        )
        .unwrap();
        assert_eq!(era.status, EraStatus::ComingSoon);
        assert!(!era.is_available());
        assert!(era.features.is_empty());
        assert!(era.model_size.is_empty());
    }

    #[test]
    fn ready_is_available() {
        let era = EraInfo {
            id: "pompeii".to_string(),
            name: "Pompeii, 79 AD".to_string(),
            description: "Roman life before the eruption".to_string(),
            model_size: "450MB".to_string(),
            status: EraStatus::Ready,
            features: vec!["Baths".to_string()],
        };
        assert!(era.is_available());
        assert_eq!(era.status.label(), "Ready");
        assert_eq!(EraStatus::Planned.label(), "Planned");
    }
}

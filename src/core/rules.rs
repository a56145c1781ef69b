//! Keyword rules: ordered trigger-set overrides checked before any pool.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("rule #{0} has no triggers")]
    NoTriggers(usize),
    #[error("rule #{0} has a blank trigger")]
    BlankTrigger(usize),
    #[error("rule #{0} has a blank response")]
    BlankResponse(usize),
}

/// A trigger set mapped to one fixed response.
///
/// Triggers are stored lower-cased and match by substring containment
/// against a lower-cased utterance, so "shake" also fires on "shaken".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    triggers: Vec<String>,
    response: String,
}

impl KeywordRule {
    /// Build a rule. `position` is only used to label errors.
    pub fn new<I, S>(
        position: usize,
        triggers: I,
        response: impl Into<String>,
    ) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let triggers: Vec<String> = triggers
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .collect();
        if triggers.is_empty() {
            return Err(RuleError::NoTriggers(position));
        }
        if triggers.iter().any(|t| t.trim().is_empty()) {
            return Err(RuleError::BlankTrigger(position));
        }
        let response = response.into();
        if response.trim().is_empty() {
            return Err(RuleError::BlankResponse(position));
        }
        Ok(Self { triggers, response })
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    /// The first trigger found in `normalized` (already lower-cased).
    pub fn matched_trigger(&self, normalized: &str) -> Option<&str> {
        self.triggers
            .iter()
            .find(|t| normalized.contains(t.as_str()))
            .map(String::as_str)
    }

    pub fn matches(&self, normalized: &str) -> bool {
        self.matched_trigger(normalized).is_some()
    }
}

/// An ordered list of keyword rules; earlier rules win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<KeywordRule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "Rule")]
struct RonRule {
    triggers: Vec<String>,
    response: String,
}

impl RuleSet {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule at the lowest priority.
    pub fn push(&mut self, rule: KeywordRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Scan top to bottom and return the first rule that fires, with its
    /// position. `normalized` must already be lower-cased.
    pub fn first_match(&self, normalized: &str) -> Option<(usize, &KeywordRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(normalized))
    }

    /// Load a rule set from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<RuleSet, RuleError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a rule set from a RON string: a list of
    /// `Rule(triggers: [..], response: "..")` entries in priority order.
    pub fn parse_ron(input: &str) -> Result<RuleSet, RuleError> {
        let raw: Vec<RonRule> = ron::from_str(input)?;
        let mut set = RuleSet::new();
        for (position, rule) in raw.into_iter().enumerate() {
            set.push(KeywordRule::new(position, rule.triggers, rule.response)?);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES_RON: &str = r#"[
        Rule(triggers: ["earthquake", "shake"], response: "The earth trembles."),
        Rule(triggers: ["vesuvius", "smoke"], response: "The mountain smokes."),
        Rule(triggers: ["food", "eat"], response: "Try the stew."),
    ]"#;

    #[test]
    fn parse_keeps_order() {
        let set = RuleSet::parse_ron(RULES_RON).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.rules()[0].triggers(), &["earthquake", "shake"]);
        assert_eq!(set.rules()[2].response(), "Try the stew.");
    }

    #[test]
    fn first_match_wins() {
        let set = RuleSet::parse_ron(RULES_RON).unwrap();
        let (pos, rule) = set.first_match("is there smoke near the food?").unwrap();
        assert_eq!(pos, 1);
        assert_eq!(rule.response(), "The mountain smokes.");
    }

    #[test]
    fn substring_matching_inside_words() {
        let set = RuleSet::parse_ron(RULES_RON).unwrap();
        assert_eq!(set.first_match("i was shaken").unwrap().0, 0);
        assert_eq!(set.first_match("earthquakes again?").unwrap().0, 0);
        // "eat" hides inside "great"
        assert_eq!(set.first_match("great city").unwrap().0, 2);
    }

    #[test]
    fn no_match() {
        let set = RuleSet::parse_ron(RULES_RON).unwrap();
        assert!(set.first_match("what's life like?").is_none());
        assert!(set.first_match("").is_none());
    }

    #[test]
    fn triggers_lowercased_on_load() {
        let set = RuleSet::parse_ron(r#"[Rule(triggers: ["Vesuvius"], response: "Smoke.")]"#)
            .unwrap();
        assert_eq!(set.rules()[0].triggers(), &["vesuvius"]);
        assert!(set.first_match("tell me about vesuvius").is_some());
    }

    #[test]
    fn matched_trigger_reports_first_member() {
        let rule = KeywordRule::new(0, ["earthquake", "shake"], "Trembling.").unwrap();
        assert_eq!(rule.matched_trigger("does the ground shake?"), Some("shake"));
        assert_eq!(rule.matched_trigger("calm day"), None);
    }

    #[test]
    fn invalid_rules_rejected() {
        assert!(matches!(
            KeywordRule::new(4, Vec::<String>::new(), "x"),
            Err(RuleError::NoTriggers(4))
        ));
        assert!(matches!(
            KeywordRule::new(1, ["ok", " "], "x"),
            Err(RuleError::BlankTrigger(1))
        ));
        assert!(matches!(
            KeywordRule::new(2, ["ok"], ""),
            Err(RuleError::BlankResponse(2))
        ));
        assert!(matches!(
            RuleSet::parse_ron(r#"[Rule(triggers: [""], response: "x")]"#),
            Err(RuleError::BlankTrigger(0))
        ));
    }

    #[test]
    fn load_pompeii_rules() {
        let path = std::path::PathBuf::from("era_data/pompeii/rules.ron");
        let set = RuleSet::load_from_ron(&path).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.rules()[3].triggers(), &["money", "price"]);
    }
}

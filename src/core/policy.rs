//! The dialogue policy: (character id, utterance) → one line of dialogue.
//!
//! Keyword rules are checked first, in order; when none fires the line is
//! drawn from the character's response pool, or from the shared default
//! pool when the id resolves to nobody. The policy never fails.

use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::characters::{CharacterError, CharacterTable};
use crate::core::era::{CHARACTERS_FILE, RULES_FILE};
use crate::core::rules::{RuleError, RuleSet};

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("character error: {0}")]
    Characters(#[from] CharacterError),
    #[error("rule error: {0}")]
    Rules(#[from] RuleError),
    #[error("no character table provided and none found at {0:?}")]
    MissingCharacters(Option<PathBuf>),
}

/// Source of the pool index used when no keyword rule fires.
pub trait IndexSource {
    /// Pick an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl IndexSource for StdRng {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

impl IndexSource for ThreadRng {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Always picks the same index (wrapped to the pool length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedIndex(pub usize);

impl IndexSource for FixedIndex {
    fn pick(&mut self, len: usize) -> usize {
        self.0 % len
    }
}

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A keyword rule fired; `rule` is its position in the rule set.
    Keyword { rule: usize },
    /// Drawn from the character's own pool.
    Persona { index: usize },
    /// Drawn from the default pool because the id is unknown.
    Default { index: usize },
}

/// One selected line and how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply<'a> {
    pub text: &'a str,
    pub origin: Origin,
}

/// Every line the policy could return for a given input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidates<'a> {
    /// A keyword rule fires, so only its response is possible.
    Fixed(&'a str),
    /// Any line of the resolved pool.
    Pool(&'a [String]),
}

impl Candidates<'_> {
    pub fn contains(&self, text: &str) -> bool {
        match self {
            Candidates::Fixed(line) => *line == text,
            Candidates::Pool(pool) => pool.iter().any(|line| line == text),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Candidates::Fixed(_) => 1,
            Candidates::Pool(pool) => pool.len(),
        }
    }

    /// Always false: pools are validated non-empty at load.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rule-based dialogue policy over an era's character and rule tables.
///
/// Holds only immutable tables; randomness is passed in per call, so one
/// policy can serve any number of sessions concurrently.
#[derive(Debug, Clone)]
pub struct DialoguePolicy {
    characters: CharacterTable,
    rules: RuleSet,
}

impl DialoguePolicy {
    pub fn new(characters: CharacterTable, rules: RuleSet) -> Self {
        Self { characters, rules }
    }

    pub fn builder() -> DialoguePolicyBuilder {
        DialoguePolicyBuilder {
            era_dir: None,
            characters: None,
            rules: None,
        }
    }

    pub fn characters(&self) -> &CharacterTable {
        &self.characters
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Select the reply to `utterance` for `character_id`.
    pub fn respond<S>(&self, character_id: &str, utterance: &str, source: &mut S) -> Reply<'_>
    where
        S: IndexSource + ?Sized,
    {
        let normalized = utterance.to_lowercase();

        if let Some((position, rule)) = self.rules.first_match(&normalized) {
            tracing::debug!(
                character_id,
                rule = position,
                trigger = rule.matched_trigger(&normalized).unwrap_or_default(),
                "keyword rule matched"
            );
            return Reply {
                text: rule.response(),
                origin: Origin::Keyword { rule: position },
            };
        }

        match self.characters.get(character_id) {
            Some(character) => {
                let index = source.pick(character.responses.len());
                Reply {
                    text: &character.responses[index],
                    origin: Origin::Persona { index },
                }
            }
            None => {
                tracing::debug!(character_id, "unknown character, using default pool");
                let pool = self.characters.default_pool();
                let index = source.pick(pool.len());
                Reply {
                    text: &pool[index],
                    origin: Origin::Default { index },
                }
            }
        }
    }

    /// The fixed set of lines `respond` can return for this input.
    pub fn candidates(&self, character_id: &str, utterance: &str) -> Candidates<'_> {
        let normalized = utterance.to_lowercase();
        if let Some((_, rule)) = self.rules.first_match(&normalized) {
            return Candidates::Fixed(rule.response());
        }
        match self.characters.get(character_id) {
            Some(character) => Candidates::Pool(&character.responses),
            None => Candidates::Pool(self.characters.default_pool()),
        }
    }
}

/// Builder for a `DialoguePolicy`.
///
/// Tables given directly take precedence over files in `era_dir`.
pub struct DialoguePolicyBuilder {
    era_dir: Option<PathBuf>,
    characters: Option<CharacterTable>,
    rules: Option<RuleSet>,
}

impl DialoguePolicyBuilder {
    /// Directory holding `characters.ron` and optionally `rules.ron`.
    pub fn era_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.era_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Provide the character table directly (for testing without files).
    pub fn with_characters(mut self, characters: CharacterTable) -> Self {
        self.characters = Some(characters);
        self
    }

    /// Provide the rule set directly (for testing without files).
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn build(self) -> Result<DialoguePolicy, PolicyError> {
        let characters = match self.characters {
            Some(table) => table,
            None => {
                let path = self.era_dir.as_ref().map(|dir| dir.join(CHARACTERS_FILE));
                match path {
                    Some(p) if p.exists() => CharacterTable::load_from_ron(&p)?,
                    other => return Err(PolicyError::MissingCharacters(other)),
                }
            }
        };

        let rules = match self.rules {
            Some(rules) => rules,
            None => match self.era_dir {
                Some(ref dir) if dir.join(RULES_FILE).exists() => {
                    RuleSet::load_from_ron(&dir.join(RULES_FILE))?
                }
                _ => RuleSet::default(),
            },
        };

        Ok(DialoguePolicy::new(characters, rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn build_test_policy() -> DialoguePolicy {
        let characters = CharacterTable::parse_ron(
            r#"(
                greeting: "Salve!",
                default_pool: ["D0", "D1", "D2"],
                characters: [
                    (id: "banker", name: "Lucius", role: "Banker", responses: ["B0", "B1"]),
                ],
            )"#,
        )
        .unwrap();
        let rules = RuleSet::parse_ron(
            r#"[
                Rule(triggers: ["earthquake", "shake"], response: "QUAKE"),
                Rule(triggers: ["vesuvius", "smoke"], response: "VOLCANO"),
                Rule(triggers: ["money", "price"], response: "MONEY"),
            ]"#,
        )
        .unwrap();
        DialoguePolicy::builder()
            .with_characters(characters)
            .with_rules(rules)
            .build()
            .unwrap()
    }

    #[test]
    fn keyword_rule_overrides_pool() {
        let policy = build_test_policy();
        let reply = policy.respond("banker", "Did you feel the EARTHQUAKE?", &mut FixedIndex(0));
        assert_eq!(reply.text, "QUAKE");
        assert_eq!(reply.origin, Origin::Keyword { rule: 0 });
    }

    #[test]
    fn keyword_rule_ignores_character() {
        let policy = build_test_policy();
        let a = policy.respond("banker", "price of wine", &mut FixedIndex(0));
        let b = policy.respond("stranger", "price of wine", &mut FixedIndex(0));
        assert_eq!(a.text, "MONEY");
        assert_eq!(b.text, "MONEY");
    }

    #[test]
    fn earlier_rule_takes_priority() {
        let policy = build_test_policy();
        let reply = policy.respond("banker", "money for smoke and shaken ground", &mut FixedIndex(0));
        assert_eq!(reply.text, "QUAKE");
        let reply = policy.respond("banker", "money and smoke", &mut FixedIndex(0));
        assert_eq!(reply.text, "VOLCANO");
        // "shaking" does not contain "shake", so money is the first rule to fire
        let reply = policy.respond("banker", "money for shaking hands", &mut FixedIndex(0));
        assert_eq!(reply.text, "MONEY");
        assert_eq!(reply.origin, Origin::Keyword { rule: 2 });
    }

    #[test]
    fn fixed_index_pins_persona_line() {
        let policy = build_test_policy();
        let reply = policy.respond("banker", "Tell me about yourself", &mut FixedIndex(1));
        assert_eq!(reply.text, "B1");
        assert_eq!(reply.origin, Origin::Persona { index: 1 });
    }

    #[test]
    fn fixed_index_wraps() {
        let policy = build_test_policy();
        let reply = policy.respond("banker", "hello", &mut FixedIndex(5));
        assert_eq!(reply.text, "B1");
    }

    #[test]
    fn unknown_character_uses_default_pool() {
        let policy = build_test_policy();
        let reply = policy.respond("nobody", "hello", &mut FixedIndex(2));
        assert_eq!(reply.text, "D2");
        assert_eq!(reply.origin, Origin::Default { index: 2 });
    }

    #[test]
    fn empty_utterance_still_answers() {
        let policy = build_test_policy();
        let reply = policy.respond("", "", &mut FixedIndex(0));
        assert_eq!(reply.text, "D0");
    }

    #[test]
    fn random_replies_stay_in_candidates() {
        let policy = build_test_policy();
        let candidates = policy.candidates("banker", "how are you");
        assert_eq!(candidates, Candidates::Pool(&["B0".to_string(), "B1".to_string()]));
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let reply = policy.respond("banker", "how are you", &mut rng);
            assert!(candidates.contains(reply.text), "unexpected reply {}", reply.text);
        }
    }

    #[test]
    fn random_replies_cover_pool() {
        let policy = build_test_policy();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(policy.respond("nobody", "hi", &mut rng).text);
        }
        assert_eq!(seen.len(), 3, "expected all default lines, got {:?}", seen);
    }

    #[test]
    fn candidates_for_keyword_is_fixed() {
        let policy = build_test_policy();
        let candidates = policy.candidates("anyone", "Vesuvius!");
        assert_eq!(candidates, Candidates::Fixed("VOLCANO"));
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn thread_rng_source() {
        let policy = build_test_policy();
        let mut rng = rand::thread_rng();
        let reply = policy.respond("banker", "hi", &mut rng);
        assert!(reply.text == "B0" || reply.text == "B1");
    }

    #[test]
    fn dyn_index_source() {
        let policy = build_test_policy();
        let mut fixed = FixedIndex(1);
        let source: &mut dyn IndexSource = &mut fixed;
        assert_eq!(policy.respond("banker", "hi", source).text, "B1");
    }

    #[test]
    fn builder_without_characters_fails() {
        assert!(matches!(
            DialoguePolicy::builder().build(),
            Err(PolicyError::MissingCharacters(None))
        ));
        assert!(matches!(
            DialoguePolicy::builder().era_dir("era_data/atlantis").build(),
            Err(PolicyError::MissingCharacters(Some(_)))
        ));
    }

    #[test]
    fn builder_loads_era_dir() {
        let policy = DialoguePolicy::builder()
            .era_dir("era_data/pompeii")
            .build()
            .unwrap();
        assert_eq!(policy.characters().len(), 5);
        assert_eq!(policy.rules().len(), 4);
    }

    #[test]
    fn builder_direct_rules_override_era_dir() {
        let policy = DialoguePolicy::builder()
            .era_dir("era_data/pompeii")
            .with_rules(RuleSet::new())
            .build()
            .unwrap();
        assert!(policy.rules().is_empty());
        let reply = policy.respond("helena", "earthquake", &mut FixedIndex(3));
        assert_eq!(
            reply.text,
            "The earthquake last week damaged my loom. I'm still repairing it."
        );
    }

    #[test]
    fn policy_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DialoguePolicy>();
    }
}

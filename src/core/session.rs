//! Conversation session: one chat's append-only turn history.
use thiserror::Error;

use crate::core::policy::{DialoguePolicy, IndexSource, Origin};
use crate::schema::character::Character;
use crate::schema::turn::{Sender, Turn};

/// Number of topic hints offered under the chat input.
pub const SUGGESTED_TOPICS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("utterance is empty")]
    EmptyUtterance,
}

/// A conversation with one character.
///
/// Starts with the era's greeting. Each accepted submission appends the
/// visitor's turn followed by exactly one character turn. The policy is
/// passed per call so a session can be stored next to it.
#[derive(Debug, Clone)]
pub struct Conversation {
    character_id: String,
    greeting: String,
    turns: Vec<Turn>,
    next_id: u64,
    last_origin: Option<Origin>,
}

impl Conversation {
    pub fn new(policy: &DialoguePolicy, character_id: impl Into<String>) -> Self {
        let mut conversation = Self {
            character_id: character_id.into(),
            greeting: policy.characters().greeting().to_string(),
            turns: Vec::new(),
            next_id: 1,
            last_origin: None,
        };
        conversation.clear();
        conversation
    }

    pub fn character_id(&self) -> &str {
        &self.character_id
    }

    /// The character this session talks to, if the id is registered.
    pub fn character<'p>(&self, policy: &'p DialoguePolicy) -> Option<&'p Character> {
        policy.characters().get(&self.character_id)
    }

    /// Topic hints for the input box; empty for unknown characters.
    pub fn suggested_topics<'p>(&self, policy: &'p DialoguePolicy) -> &'p [String] {
        self.character(policy)
            .map(|c| c.suggested_topics(SUGGESTED_TOPICS))
            .unwrap_or_default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent turn, whoever spoke it.
    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// How the most recent reply was chosen; `None` until the first
    /// submission after a start or `clear`.
    pub fn last_origin(&self) -> Option<Origin> {
        self.last_origin
    }

    /// Record the visitor's utterance and the character's reply.
    ///
    /// Whitespace-only input is rejected and leaves the history untouched.
    /// The stored user turn keeps the text exactly as typed.
    pub fn submit<S>(
        &mut self,
        policy: &DialoguePolicy,
        utterance: &str,
        source: &mut S,
    ) -> Result<&Turn, SessionError>
    where
        S: IndexSource + ?Sized,
    {
        if utterance.trim().is_empty() {
            return Err(SessionError::EmptyUtterance);
        }
        let reply = policy.respond(&self.character_id, utterance, source);
        tracing::debug!(
            character_id = %self.character_id,
            origin = ?reply.origin,
            "reply selected"
        );
        self.last_origin = Some(reply.origin);
        let reply = reply.text.to_string();
        self.push(Sender::User, utterance.to_string());
        Ok(self.push(Sender::Character, reply))
    }

    /// Drop the history back to a single fresh greeting turn.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.next_id = 1;
        self.last_origin = None;
        let greeting = self.greeting.clone();
        self.push(Sender::Character, greeting);
    }

    fn push(&mut self, sender: Sender, content: String) -> &Turn {
        let turn = Turn::new(self.next_id, sender, content);
        self.next_id += 1;
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::characters::CharacterTable;
    use crate::core::policy::FixedIndex;
    use crate::core::rules::RuleSet;

    fn build_test_policy() -> DialoguePolicy {
        let characters = CharacterTable::parse_ron(
            r#"(
                greeting: "Salve! What would you like to know?",
                default_pool: ["Generic."],
                characters: [
                    (
                        id: "baker",
                        name: "Marcus",
                        role: "Baker",
                        topics: ["Bread", "Ovens", "Grain", "Customers"],
                        responses: ["I bake before dawn.", "Wheat from Egypt."],
                    ),
                ],
            )"#,
        )
        .unwrap();
        let rules = RuleSet::parse_ron(
            r#"[Rule(triggers: ["earthquake"], response: "The earth trembles.")]"#,
        )
        .unwrap();
        DialoguePolicy::new(characters, rules)
    }

    #[test]
    fn starts_with_greeting() {
        let policy = build_test_policy();
        let chat = Conversation::new(&policy, "baker");
        assert_eq!(chat.turns().len(), 1);
        let greeting = &chat.turns()[0];
        assert_eq!(greeting.id, 1);
        assert_eq!(greeting.sender, Sender::Character);
        assert_eq!(greeting.content, "Salve! What would you like to know?");
    }

    #[test]
    fn submit_appends_two_turns() {
        let policy = build_test_policy();
        let mut chat = Conversation::new(&policy, "baker");
        let reply = chat
            .submit(&policy, "  When do you START?  ", &mut FixedIndex(0))
            .unwrap();
        assert_eq!(reply.content, "I bake before dawn.");
        assert_eq!(reply.sender, Sender::Character);

        let turns = chat.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1].sender, Sender::User);
        assert_eq!(turns[1].content, "  When do you START?  ");
        assert_eq!(
            turns.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn keyword_reply_through_session() {
        let policy = build_test_policy();
        let mut chat = Conversation::new(&policy, "baker");
        let reply = chat
            .submit(&policy, "Another EARTHQUAKE?", &mut FixedIndex(1))
            .unwrap();
        assert_eq!(reply.content, "The earth trembles.");
    }

    #[test]
    fn blank_input_rejected() {
        let policy = build_test_policy();
        let mut chat = Conversation::new(&policy, "baker");
        assert_eq!(
            chat.submit(&policy, "   \n", &mut FixedIndex(0)).unwrap_err(),
            SessionError::EmptyUtterance
        );
        assert_eq!(chat.turns().len(), 1);
    }

    #[test]
    fn clear_resets_to_greeting() {
        let policy = build_test_policy();
        let mut chat = Conversation::new(&policy, "baker");
        chat.submit(&policy, "hello", &mut FixedIndex(0)).unwrap();
        chat.submit(&policy, "again", &mut FixedIndex(1)).unwrap();
        assert_eq!(chat.turns().len(), 5);

        chat.clear();
        assert_eq!(chat.turns().len(), 1);
        assert_eq!(chat.turns()[0].id, 1);
        assert_eq!(chat.turns()[0].content, "Salve! What would you like to know?");

        chat.submit(&policy, "hello", &mut FixedIndex(0)).unwrap();
        assert_eq!(chat.last_turn().unwrap().id, 3);
    }

    #[test]
    fn unknown_character_session() {
        let policy = build_test_policy();
        let mut chat = Conversation::new(&policy, "ghost");
        assert!(chat.character(&policy).is_none());
        assert!(chat.suggested_topics(&policy).is_empty());
        let reply = chat.submit(&policy, "hello", &mut FixedIndex(0)).unwrap();
        assert_eq!(reply.content, "Generic.");
    }

    #[test]
    fn suggested_topics_first_three() {
        let policy = build_test_policy();
        let chat = Conversation::new(&policy, "baker");
        assert_eq!(chat.suggested_topics(&policy), &["Bread", "Ovens", "Grain"]);
        assert_eq!(chat.character(&policy).unwrap().name, "Marcus");
    }

    #[test]
    fn last_origin_follows_each_reply() {
        let policy = build_test_policy();
        let mut chat = Conversation::new(&policy, "baker");
        assert_eq!(chat.last_origin(), None);

        chat.submit(&policy, "earthquake!", &mut FixedIndex(0)).unwrap();
        assert_eq!(chat.last_origin(), Some(Origin::Keyword { rule: 0 }));

        chat.submit(&policy, "bread?", &mut FixedIndex(1)).unwrap();
        assert_eq!(chat.last_origin(), Some(Origin::Persona { index: 1 }));

        chat.submit(&policy, "   ", &mut FixedIndex(0)).unwrap_err();
        assert_eq!(chat.last_origin(), Some(Origin::Persona { index: 1 }));

        chat.clear();
        assert_eq!(chat.last_origin(), None);

        let mut stranger = Conversation::new(&policy, "ghost");
        stranger.submit(&policy, "hello", &mut FixedIndex(0)).unwrap();
        assert_eq!(stranger.last_origin(), Some(Origin::Default { index: 0 }));
    }

    #[test]
    fn last_turn_is_latest_reply() {
        let policy = build_test_policy();
        let mut chat = Conversation::new(&policy, "baker");
        assert_eq!(chat.last_turn().unwrap().sender, Sender::Character);
        chat.submit(&policy, "bread?", &mut FixedIndex(1)).unwrap();
        assert_eq!(chat.last_turn().unwrap().content, "Wheat from Egypt.");
    }
}

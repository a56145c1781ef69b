//! Pompeii tour: a scripted walk through the era's data.
//!
//! Visits a location, greets a few residents, asks them questions that
//! trip keyword rules and questions that fall back to their own lines,
//! then opens the phrase book.
//!
//! Run with: cargo run --example pompeii_tour

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

use time_machine::core::era::EraData;
use time_machine::core::policy::Origin;
use time_machine::core::session::Conversation;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("time_machine=debug")),
        )
        .init();

    let era = EraData::load_dir(Path::new("era_data/pompeii"))
        .expect("Failed to load Pompeii era data");
    let mut rng = StdRng::seed_from_u64(79);

    // --- Scene ---
    let forum = era.locations.first().expect("Pompeii has locations");
    println!("=== {} ===\n", forum.name);
    println!("{}\n", era.locations.scene_description(&forum.id));

    // --- Conversations ---
    let script: &[(&str, &[&str])] = &[
        (
            "lucius_caecilius_iucundus",
            &["What's life like?", "Did you feel the earthquake?", "What is the price of a loan?"],
        ),
        ("aulus_umbricius_scaurus", &["Tell me about your work", "Is that smoke on Vesuvius?"]),
        ("diocles", &["Who are you?", "Where can I find food?"]),
        ("a_passing_stranger", &["Good morning!"]),
    ];

    for (character_id, questions) in script {
        let mut chat = Conversation::new(&era.policy, *character_id);
        let name = chat
            .character(&era.policy)
            .map(|c| format!("{} ({})", c.name, c.byline()))
            .unwrap_or_else(|| "A passer-by".to_string());
        println!("--- {} ---", name);

        println!("  Resident  {}", chat.turns()[0].content);
        for question in *questions {
            let reply = match chat.submit(&era.policy, question, &mut rng) {
                Ok(turn) => turn.content.clone(),
                Err(e) => {
                    eprintln!("ERROR: {}", e);
                    continue;
                }
            };
            let tag = match chat.last_origin() {
                Some(Origin::Keyword { rule }) => format!("rule #{}", rule),
                Some(Origin::Persona { .. }) => "own pool".to_string(),
                Some(Origin::Default { .. }) => "default pool".to_string(),
                None => String::new(),
            };
            println!("  Visitor   {}", question);
            println!("  Resident  {}  [{}]", reply, tag);
        }
        println!();
    }

    // --- Phrase book ---
    println!("=== Latin phrases ===\n");
    for category in era.phrases.categories() {
        println!("{}:", category.display_name());
        for phrase in category.phrases.iter().take(2) {
            println!("  {:<26} {}", phrase.latin, phrase.english);
        }
    }
}

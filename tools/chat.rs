//! Chat: interactive terminal session with an era's residents.
//!
//! Usage: chat [--era-dir <path>] [--catalog <path>] [--character <id>] [--seed <n>]
//!
//! Anything typed that is not a command is sent to the current character.
//! Commands:
//!   /eras                   list the era catalog and each era's status
//!   /who                    list characters
//!   /as <id>                switch character (starts a new conversation)
//!   /topics                 suggested topics for the current character
//!   /history                print the conversation so far
//!   /clear                  reset the conversation to its greeting
//!   /phrases [category]     list phrase categories, or a category's phrases
//!   /scene <location>       show a location's scene description
//!   /seed <n>               reseed the reply picker
//!   /bulk <n> <text>        send text n times and show reply variety
//!   /help                   list commands
//!   /quit                   exit

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use time_machine::core::catalog::EraCatalog;
use time_machine::core::era::EraData;
use time_machine::core::phrasebook::DEFAULT_CATEGORY;
use time_machine::core::session::Conversation;
use time_machine::schema::turn::Sender;

#[derive(Parser)]
#[command(name = "chat", version, about = "Talk to the residents of a historical era")]
struct Cli {
    /// Era data directory
    #[arg(long, env = "TIME_MACHINE_ERA_DIR", default_value = "era_data/pompeii")]
    era_dir: PathBuf,

    /// Era catalog file
    #[arg(long, env = "TIME_MACHINE_ERA_CATALOG", default_value = "era_data/eras.ron")]
    catalog: PathBuf,

    /// Character to talk to (defaults to the first in the era)
    #[arg(long)]
    character: Option<String>,

    /// Seed for reply selection
    #[arg(long, default_value_t = 79)]
    seed: u64,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("time_machine=info")),
        )
        .init();

    let era = match EraData::load_dir(&cli.era_dir) {
        Ok(era) => era,
        Err(e) => {
            eprintln!("ERROR: Failed to load era from {}: {}", cli.era_dir.display(), e);
            process::exit(1);
        }
    };

    let catalog = if cli.catalog.exists() {
        match EraCatalog::load_from_ron(&cli.catalog) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!("ERROR: Failed to load era catalog {}: {}", cli.catalog.display(), e);
                process::exit(1);
            }
        }
    } else {
        tracing::warn!(path = %cli.catalog.display(), "no era catalog found");
        EraCatalog::new()
    };
    if !catalog.is_empty() {
        if let Err(e) = catalog.resolve(&era.name) {
            tracing::warn!(era = %era.name, error = %e, "era is not listed as ready in the catalog");
        }
    }

    let character_id = cli
        .character
        .or_else(|| era.policy.characters().iter().next().map(|c| c.id.clone()))
        .unwrap_or_default();

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let mut chat = Conversation::new(&era.policy, character_id);

    println!("Era: {}", era.name);
    print_character_header(&era, &chat);
    println!("Type /help for commands.\n");
    print_turn(chat.turns()[0].sender, &chat.turns()[0].content, &era, &chat);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("you> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        if !line.starts_with('/') {
            match chat.submit(&era.policy, line, &mut rng) {
                Ok(reply) => {
                    let content = reply.content.clone();
                    print_turn(Sender::Character, &content, &era, &chat);
                }
                Err(e) => println!("ERROR: {}", e),
            }
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "/quit" | "/exit" | "/q" => {
                println!("Vale!");
                break;
            }
            "/help" | "/h" | "/?" => {
                print_help();
            }
            "/eras" => {
                if catalog.is_empty() {
                    println!("No era catalog loaded.");
                    continue;
                }
                for info in catalog.iter() {
                    let marker = if info.id == era.name { "*" } else { " " };
                    println!(
                        " {} {:<12} {:<22} [{}] {}",
                        marker,
                        info.id,
                        info.name,
                        info.status.label(),
                        info.model_size
                    );
                    println!("   {:<12} {}", "", info.description);
                    if !info.features.is_empty() {
                        println!("   {:<12} {}", "", info.features.join(", "));
                    }
                }
            }
            "/who" => {
                for character in era.policy.characters().iter() {
                    let marker = if character.id == chat.character_id() { "*" } else { " " };
                    println!(
                        " {} {:<28} {} ({})",
                        marker,
                        character.id,
                        character.name,
                        character.byline()
                    );
                }
            }
            "/as" => {
                if parts.len() < 2 {
                    println!("Usage: /as <character_id>");
                    continue;
                }
                chat = Conversation::new(&era.policy, parts[1]);
                if chat.character(&era.policy).is_none() {
                    println!("No character '{}'; replies will come from the default pool.", parts[1]);
                }
                print_character_header(&era, &chat);
                print_turn(chat.turns()[0].sender, &chat.turns()[0].content, &era, &chat);
            }
            "/topics" => {
                let topics = chat.suggested_topics(&era.policy);
                if topics.is_empty() {
                    println!("No topic hints for this character.");
                } else {
                    println!("Try asking about: {}", topics.join(" • "));
                }
            }
            "/history" => {
                for turn in chat.turns() {
                    let who = match turn.sender {
                        Sender::User => "you".to_string(),
                        Sender::Character => speaker_name(&era, &chat),
                    };
                    println!("[{}] #{} {}: {}", turn.clock_label(), turn.id, who, turn.content);
                }
            }
            "/clear" => {
                chat.clear();
                println!("Conversation cleared.");
                print_turn(chat.turns()[0].sender, &chat.turns()[0].content, &era, &chat);
            }
            "/phrases" => {
                if era.phrases.is_empty() {
                    println!("This era has no phrase book.");
                    continue;
                }
                let key = parts.get(1).copied().unwrap_or(DEFAULT_CATEGORY);
                println!("Categories:");
                for k in era.phrases.keys() {
                    let marker = if k == key { "*" } else { " " };
                    println!(" {} {:<20} {}", marker, k, era.phrases.display_name(k));
                }
                println!("\n--- {} ---", era.phrases.display_name(key));
                let phrases = era.phrases.phrases(key);
                if phrases.is_empty() {
                    println!("(no phrases)");
                }
                for phrase in phrases {
                    println!("  {:<28} {}", phrase.latin, phrase.english);
                    if !phrase.context.is_empty() {
                        println!("  {:<28} Context: {}", "", phrase.context);
                    }
                }
                println!();
            }
            "/scene" => {
                let id = match parts.get(1) {
                    Some(id) => *id,
                    None => {
                        println!("Usage: /scene <location>");
                        for location in era.locations.iter() {
                            println!("  {:<16} {}", location.id, location.teaser(60));
                        }
                        continue;
                    }
                };
                println!("\n{}", era.locations.scene_description(id));
                if let Some(location) = era.locations.get(id) {
                    println!("Sounds: {}", location.sounds.join(", "));
                    println!("Activities: {}", location.activities.join(", "));
                }
                if let Some(audio) = era.locations.ambient_audio(id) {
                    println!("Ambient audio: {}", audio);
                }
                println!();
            }
            "/seed" => {
                if parts.len() < 2 {
                    println!("Usage: /seed <n>");
                    continue;
                }
                match parts[1].parse::<u64>() {
                    Ok(s) => {
                        rng = StdRng::seed_from_u64(s);
                        println!("Seed set to {}", s);
                    }
                    Err(_) => println!("Invalid seed: {}", parts[1]),
                }
            }
            "/bulk" => {
                if parts.len() < 3 {
                    println!("Usage: /bulk <n> <text>");
                    continue;
                }
                let count: usize = match parts[1].parse() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        println!("Invalid count: {}", parts[1]);
                        continue;
                    }
                };
                let text = parts[2..].join(" ");
                let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
                for _ in 0..count {
                    let reply = era.policy.respond(chat.character_id(), &text, &mut rng);
                    *tally.entry(reply.text).or_default() += 1;
                }
                let candidates = era.policy.candidates(chat.character_id(), &text);
                println!(
                    "\n{} replies, {} distinct of {} possible:",
                    count,
                    tally.len(),
                    candidates.len()
                );
                for (line, n) in &tally {
                    println!("  {:>4}  {}", n, line);
                }
                println!();
            }
            _ => {
                println!("Unknown command: {}. Type /help for commands.", cmd);
            }
        }
    }
}

fn speaker_name(era: &EraData, chat: &Conversation) -> String {
    chat.character(&era.policy)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "resident".to_string())
}

fn print_character_header(era: &EraData, chat: &Conversation) {
    match chat.character(&era.policy) {
        Some(c) => println!("Talking to {}, {}", c.name, c.byline()),
        None => println!("Talking to an unknown resident ({})", chat.character_id()),
    }
}

fn print_turn(sender: Sender, content: &str, era: &EraData, chat: &Conversation) {
    match sender {
        Sender::User => println!("you> {}", content),
        Sender::Character => println!("{}> {}\n", speaker_name(era, chat), content),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /eras                 List eras and their status");
    println!("  /who                  List characters");
    println!("  /as <id>              Switch character (new conversation)");
    println!("  /topics               Suggested topics");
    println!("  /history              Show the conversation");
    println!("  /clear                Reset to the greeting");
    println!("  /phrases [category]   Browse the phrase book");
    println!("  /scene <location>     Show a location's scene");
    println!("  /seed <n>             Reseed reply selection");
    println!("  /bulk <n> <text>      Send text n times, show reply variety");
    println!("  /help                 This message");
    println!("  /quit                 Exit");
    println!("Anything else is said to the current character.");
}

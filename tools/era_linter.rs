//! Era Linter: validates an era's dialogue data.
//!
//! Usage: era_linter <era_dir> [--min-topics <n>]

use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process;

use time_machine::core::characters::CharacterTable;
use time_machine::core::era::EraData;
use time_machine::core::rules::RuleSet;

#[derive(Parser)]
#[command(name = "era_linter", version, about = "Check an era's characters, rules and phrases")]
struct Cli {
    /// Era data directory
    #[arg(env = "TIME_MACHINE_ERA_DIR")]
    era_dir: PathBuf,

    /// Minimum topic hints expected per character
    #[arg(long, default_value_t = 3)]
    min_topics: usize,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("time_machine=warn")),
        )
        .init();

    let era = match EraData::load_dir(&cli.era_dir) {
        Ok(era) => era,
        Err(e) => {
            eprintln!("ERROR: Failed to load era: {}", e);
            process::exit(1);
        }
    };

    println!(
        "Loaded era '{}': {} characters, {} rules, {} phrase categories, {} locations",
        era.name,
        era.policy.characters().len(),
        era.policy.rules().len(),
        era.phrases.len(),
        era.locations.len()
    );

    let (errors, warnings) = lint_era(&era, cli.min_topics);

    println!("\n=== Era Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_era(era: &EraData, min_topics: usize) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    lint_rules(era.policy.rules(), &mut errors, &mut warnings);
    lint_characters(era.policy.characters(), min_topics, &mut warnings);

    if era.policy.characters().is_empty() {
        errors.push("Era has no characters; every reply will come from the default pool".to_string());
    }

    for category in era.phrases.categories() {
        if category.phrases.is_empty() {
            warnings.push(format!("Phrase category '{}' is empty", category.key));
        }
    }

    (errors, warnings)
}

fn lint_rules(rules: &RuleSet, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for (i, rule) in rules.rules().iter().enumerate() {
        for trigger in rule.triggers() {
            if let Some(&earlier) = first_seen.get(trigger.as_str()) {
                warnings.push(format!(
                    "Trigger '{}' in rule #{} already appears in rule #{}",
                    trigger, i, earlier
                ));
            } else {
                first_seen.insert(trigger.as_str(), i);
            }
        }

        // A rule is dead when every one of its triggers contains a trigger
        // of an earlier rule: any text it would match, the earlier one takes.
        let shadowed_by: Vec<usize> = rule
            .triggers()
            .iter()
            .filter_map(|t| {
                rules.rules()[..i]
                    .iter()
                    .position(|earlier| earlier.matches(t))
            })
            .collect();
        if shadowed_by.len() == rule.triggers().len() {
            errors.push(format!(
                "Rule #{} can never fire: shadowed by rule(s) {:?}",
                i, shadowed_by
            ));
        }
    }
}

fn lint_characters(table: &CharacterTable, min_topics: usize, warnings: &mut Vec<String>) {
    let mut owners: HashMap<&str, &str> = HashMap::new();

    for character in table.iter() {
        if character.topics.len() < min_topics {
            warnings.push(format!(
                "Character '{}' has only {} topic hints (minimum {} recommended)",
                character.id,
                character.topics.len(),
                min_topics
            ));
        }
        if character.responses.len() < 3 {
            warnings.push(format!(
                "Character '{}' has only {} responses (minimum 3 recommended)",
                character.id,
                character.responses.len()
            ));
        }
        for line in &character.responses {
            if let Some(owner) = owners.insert(line.as_str(), character.id.as_str()) {
                warnings.push(format!(
                    "Response \"{}\" is shared by '{}' and '{}'",
                    line, owner, character.id
                ));
            }
        }
    }
}

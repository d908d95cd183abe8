use anyhow::Context;
use clap::{Arg, Command};
use log::LevelFilter;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::process;
use thread_classifier::components::rule_evaluator::RuleEvaluator;
use thread_classifier::{
    BatchClassifier, ClassificationEngine, ClassificationResult, ClassificationStats,
    ClassifierConfig, Conversation, FilterRule, Lead,
};
use uuid::Uuid;

#[derive(Serialize)]
struct ClassifiedThread<'a> {
    conversation_id: Uuid,
    thread_id: &'a str,
    participant_name: &'a str,
    result: &'a ClassificationResult,
}

fn main() {
    let matches = Command::new("thread-classifier")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Classify messaging threads as professional, personal or unclassified")
        .long_about(
            "Evaluates an exported snapshot of conversations against a user's filter rules \
             and lead roster, printing one JSON classification result per conversation.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Classifier configuration file (YAML); built-in defaults when omitted"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the default configuration to FILE and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the configuration and rules, then exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("rules")
                .long("rules")
                .value_name("FILE")
                .help("JSON array of filter rules"),
        )
        .arg(
            Arg::new("leads")
                .long("leads")
                .value_name("FILE")
                .help("JSON array of leads"),
        )
        .arg(
            Arg::new("conversations")
                .long("conversations")
                .value_name("FILE")
                .help("JSON array of conversations to classify"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Print a classification summary to stderr")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging of rule and lead matches")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => match ClassifierConfig::load(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading configuration: {e:#}");
                process::exit(1);
            }
        },
        None => ClassifierConfig::default(),
    };

    let rules: Vec<FilterRule> = load_optional(matches.get_one::<String>("rules"));
    let leads: Vec<Lead> = load_optional(matches.get_one::<String>("leads"));

    if matches.get_flag("test-config") {
        println!("🔍 Testing configuration...");
        println!(
            "Phrases: {} personal, {} professional",
            config.dictionaries.personal.len(),
            config.dictionaries.professional.len()
        );
        println!(
            "Rules: {} ({} active)",
            rules.len(),
            rules.iter().filter(|r| r.is_active).count()
        );

        let warnings = RuleEvaluator::validate(&rules);
        if warnings.is_empty() {
            println!("✅ Configuration and rules are valid");
        } else {
            println!("⚠️  {} rule(s) will never match:", warnings.len());
            for warning in &warnings {
                println!("  • {warning}");
            }
        }
        return;
    }

    let Some(conversations_path) = matches.get_one::<String>("conversations") else {
        eprintln!("Nothing to classify: pass --conversations FILE");
        process::exit(2);
    };
    let conversations: Vec<Conversation> = match load_json(conversations_path) {
        Ok(conversations) => conversations,
        Err(e) => {
            eprintln!("Error loading conversations: {e:#}");
            process::exit(1);
        }
    };

    let engine = ClassificationEngine::new(&config, &rules, leads);
    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let results = BatchClassifier::new(&engine).classify_parallel(&conversations, workers);

    let output: Vec<ClassifiedThread> = conversations
        .iter()
        .filter_map(|c| {
            results.get(&c.id).map(|result| ClassifiedThread {
                conversation_id: c.id,
                thread_id: &c.thread_id,
                participant_name: &c.participant_name,
                result,
            })
        })
        .collect();

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing results: {e}");
            process::exit(1);
        }
    }

    if matches.get_flag("stats") {
        print_stats(&ClassificationStats::from_results(results.values()), &rules);
    }
}

fn load_json<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {path}"))
}

fn load_optional<T: DeserializeOwned>(path: Option<&String>) -> Vec<T> {
    let Some(path) = path else {
        return Vec::new();
    };
    match load_json(path) {
        Ok(items) => items,
        Err(e) => {
            eprintln!("Error loading {path}: {e:#}");
            process::exit(1);
        }
    }
}

fn generate_default_config(path: &str) {
    let written = ClassifierConfig::default().to_yaml().and_then(|yaml| {
        std::fs::write(path, yaml).with_context(|| format!("Failed to write {path}"))
    });
    match written {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Edit the phrase dictionaries and thresholds to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e:#}");
            process::exit(1);
        }
    }
}

fn print_stats(stats: &ClassificationStats, rules: &[FilterRule]) {
    eprintln!("📊 Classification Summary");
    eprintln!("═══════════════════════════════════════");
    eprintln!("  Total Conversations: {}", stats.total);
    eprintln!("  ├─ Professional: {}", stats.professional);
    eprintln!("  ├─ Personal: {}", stats.personal);
    eprintln!("  └─ Needs Review: {}", stats.unclassified);
    eprintln!(
        "  Decided by rule: {}, by heuristics: {}, lead matches: {}",
        stats.by_rule, stats.by_auto, stats.lead_matches
    );
    eprintln!(
        "  Auto-classification rate: {:.1}%",
        stats.auto_classification_rate() * 100.0
    );

    let unmatched = stats.unmatched_rules(rules);
    if !unmatched.is_empty() {
        eprintln!();
        eprintln!("Rules that never matched ({} total):", unmatched.len());
        for rule in unmatched {
            eprintln!(
                "  • {} {}",
                rule.rule_type,
                truncate_string(&rule.rule_value, 44)
            );
        }
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

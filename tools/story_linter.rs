/// Story Linter: validates a story file and reports chain statistics.
///
/// Usage: story_linter <story.ron> [--config <session.ron>]

use std::path::Path;
use std::process;
use struggle_narrative::core::store::NarrativeStore;
use struggle_narrative::schema::node::Channel;
use struggle_narrative::SessionConfig;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: story_linter <story.ron> [--config <session.ron>]");
        process::exit(0);
    }

    let story_path = &args[1];
    let mut config_path = None;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--config" && i + 1 < args.len() {
            i += 1;
            config_path = Some(args[i].clone());
        }
        i += 1;
    }

    // Structural errors (cycles, dangling names) stop the load outright.
    let store = match NarrativeStore::load_from_ron(Path::new(story_path)) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let config = match config_path {
        Some(ref path) => match SessionConfig::load_from_ron(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: {}: {}", path, e);
                process::exit(1);
            }
        },
        None => SessionConfig::default(),
    };

    println!(
        "Loaded {} dialogue nodes and {} player logs",
        store.dialogues().len(),
        store.player_logs().len()
    );

    let (errors, warnings) = lint_story(&store, &config);

    println!("\n=== Story Lint Report ===\n");
    print_chains(&store, &config);

    if errors.is_empty() && warnings.is_empty() {
        println!("\nAll checks passed!");
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

fn lint_story(store: &NarrativeStore, config: &SessionConfig) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let entries = store.entries();

    for channel in [Channel::Dialogue, Channel::PlayerLog] {
        for name in store.unreachable(channel) {
            warnings.push(format!("{} node '{}' is never reached", channel, name));
        }
    }

    for (id, node) in store.dialogues().iter() {
        if node.text.trim().is_empty() {
            errors.push(format!(
                "dialogue '{}' has no text",
                store.name_of(Channel::Dialogue, id).unwrap_or("?")
            ));
        }
    }

    for (id, node) in store.player_logs().iter() {
        let name = store.name_of(Channel::PlayerLog, id).unwrap_or("?");
        if node.text.trim().is_empty() {
            errors.push(format!("player log '{}' has no text", name));
        }
        if node.button_label.trim().is_empty() {
            warnings.push(format!("player log '{}' has an empty button label", name));
        }
    }

    // Main-loop dialogue stops one node short: the terminal node ends the loop.
    let main_len = store.dialogues().chain(entries.main_loop).count();
    if main_len < 2 {
        warnings.push(
            "main loop chain has a single node; the loop ends on the first pacing tick"
                .to_string(),
        );
    }

    let log_len = store.player_logs().chain(entries.player_log).count();
    let headroom = 100.0 - config.initial_meter;
    let actions_to_cap = if config.gain_per_action > 0.0 {
        (headroom / config.gain_per_action).ceil() as usize
    } else {
        usize::MAX
    };
    if log_len > 1 && log_len - 1 < actions_to_cap {
        warnings.push(format!(
            "player log chain ends after {} actions, before the meter can reach 100 ({} actions)",
            log_len - 1,
            actions_to_cap
        ));
    }

    (errors, warnings)
}

fn print_chains(store: &NarrativeStore, config: &SessionConfig) {
    let entries = store.entries();
    let dialogue_chains = [
        ("intro", entries.intro),
        ("main_loop", entries.main_loop),
        ("losing", entries.losing),
        ("retribution", entries.retribution),
        ("hero", entries.hero),
    ];

    for (label, start) in dialogue_chains {
        let len = store.dialogues().chain(start).count();
        println!("  {:<12} {:>3} dialogue nodes", label, len);
    }

    let log_len = store.player_logs().chain(entries.player_log).count();
    println!("  {:<12} {:>3} player logs", "player_log", log_len);

    let intro_len = store.dialogues().chain(entries.intro).count();
    let main_len = store.dialogues().chain(entries.main_loop).count();
    println!(
        "\n  intro runs {:.1}s, main loop at most {:.1}s",
        intro_len as f32 * config.intro_interval,
        main_len.saturating_sub(1) as f32 * config.pacing_interval
    );
    if config.decay_per_tick > 0 {
        let ticks = (config.initial_meter / config.decay_per_tick as f32).ceil();
        println!(
            "  an idle player loses after {:.1}s",
            (ticks - 1.0).max(0.0) * config.decay_interval
        );
    }
}

/// Playthrough: runs a whole session headless with a simulated player.
///
/// Usage: playthrough --story <story.ron> [--config <session.ron>] [--seed <n>]
///                    [--fps <n>] [--click-rate <p>] [--skip-intro] [--verbose]
///
/// The simulated player presses the action button with probability
/// `click-rate` on each frame and reads the ending one line per second.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::process;
use std::sync::Arc;
use struggle_narrative::schema::node::{DialogueNode, NodeId, PlayerLogNode};
use struggle_narrative::{
    Ending, NarrativeStore, Presenter, Session, SessionConfig, SessionPhase,
};

/// Frames to simulate before giving up on a session that never ends.
const MAX_FRAMES: u64 = 60 * 60 * 30;

struct StderrLogger {
    level: log::LevelFilter,
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Prints everything the session shows, stamped with the session clock.
struct ConsolePresenter {
    clock: f32,
    meter_every: f32,
    last_meter_print: f32,
}

impl ConsolePresenter {
    fn stamp(&self) -> String {
        format!("[{:>7.2}s]", self.clock)
    }
}

impl Presenter for ConsolePresenter {
    fn render_dialogue(&mut self, _id: NodeId, node: &DialogueNode) {
        let portrait = node
            .portrait
            .as_ref()
            .map(|p| format!(" <{}>", p.0))
            .unwrap_or_default();
        if node.speaker.is_empty() {
            println!("{} {}{}", self.stamp(), node.text, portrait);
        } else {
            println!("{} {}: {}{}", self.stamp(), node.speaker, node.text, portrait);
        }
    }

    fn render_player_log(&mut self, _id: NodeId, node: &PlayerLogNode) {
        let sound = node
            .sound
            .as_ref()
            .map(|s| format!(" ~{}@{:.1}", s.0, node.pitch))
            .unwrap_or_default();
        println!("{}   > {} [{}]{}", self.stamp(), node.text, node.button_label, sound);
    }

    fn render_meter(&mut self, value: f32) {
        if self.clock - self.last_meter_print >= self.meter_every || value <= 0.0 {
            self.last_meter_print = self.clock;
            let filled = (value / 5.0).round() as usize;
            println!(
                "{}   struggle {:>5.1} |{:<20}|",
                self.stamp(),
                value,
                "#".repeat(filled)
            );
        }
    }

    fn phase_changed(&mut self, phase: SessionPhase) {
        println!("\n{} === {} ===", self.stamp(), phase.name());
    }

    fn ending_selected(&mut self, ending: Ending) {
        println!("{} ending: {}", self.stamp(), ending.name());
    }

    fn session_finished(&mut self, ending: Ending) {
        println!("\n{} --- {} ending, fin ---", self.stamp(), ending.name());
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut story_path = None;
    let mut config_path = None;
    let mut seed: u64 = 42;
    let mut fps: u32 = 60;
    let mut click_rate: f64 = 0.05;
    let mut skip_intro = false;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--story" if i + 1 < args.len() => {
                i += 1;
                story_path = Some(args[i].clone());
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            "--fps" if i + 1 < args.len() => {
                i += 1;
                fps = args[i].parse::<u32>().unwrap_or(60).max(1);
            }
            "--click-rate" if i + 1 < args.len() => {
                i += 1;
                click_rate = args[i].parse::<f64>().unwrap_or(0.05).clamp(0.0, 1.0);
            }
            "--skip-intro" => skip_intro = true,
            "--verbose" | "-v" => verbose = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    if log::set_boxed_logger(Box::new(StderrLogger { level })).is_ok() {
        log::set_max_level(level);
    }

    let Some(story_path) = story_path else {
        eprintln!("--story is required");
        print_usage();
        process::exit(1);
    };

    let store = match NarrativeStore::load_from_ron(Path::new(&story_path)) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let config = match config_path {
        Some(ref path) => match SessionConfig::load_from_ron(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                process::exit(1);
            }
        },
        None => SessionConfig::default(),
    };

    println!("Seed: {}, {} fps, click rate {:.2}/frame", seed, fps, click_rate);

    let presenter = ConsolePresenter {
        clock: 0.0,
        meter_every: 5.0,
        last_meter_print: f32::NEG_INFINITY,
    };
    let mut session = Session::new(store, config, presenter);
    let mut rng = StdRng::seed_from_u64(seed);
    let dt = 1.0 / fps as f32;
    let mut ending_wait = 0.0_f32;

    if skip_intro {
        session.skip_intro();
    }

    for _ in 0..MAX_FRAMES {
        session.presenter_mut().clock += dt;
        session.tick(dt);

        match session.phase() {
            SessionPhase::MainLoop => {
                if rng.gen_bool(click_rate) {
                    session.player_action();
                }
            }
            SessionPhase::Ended => {
                ending_wait += dt;
                if ending_wait >= 1.0 {
                    ending_wait = 0.0;
                    session.next_dialogue();
                }
            }
            SessionPhase::Intro => {}
        }

        if session.is_finished() {
            break;
        }
    }

    if !session.is_finished() {
        eprintln!("Session did not finish within {} frames", MAX_FRAMES);
        process::exit(2);
    }

    if let (Some(reason), Some(meter)) = (session.end_reason(), session.final_meter()) {
        println!("\nEnded by {:?} with struggle at {:.1}", reason, meter);
    }
}

fn print_usage() {
    println!("Usage: playthrough --story <story.ron> [--config <session.ron>] [--seed <n>]");
    println!("                   [--fps <n>] [--click-rate <p>] [--skip-intro] [--verbose]");
    println!();
    println!("  --story       story file (RON)");
    println!("  --config      session tuning (RON), defaults if omitted");
    println!("  --seed        RNG seed for the simulated player (default 42)");
    println!("  --fps         simulated frame rate (default 60)");
    println!("  --click-rate  chance of pressing the action button each frame (default 0.05)");
    println!("  --skip-intro  skip the intro cutscene");
    println!("  --verbose     log session internals to stderr");
}

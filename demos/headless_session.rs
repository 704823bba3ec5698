/// Headless session example: drives the shipped story with a scripted player.
///
/// The player mashes the action button twice a second for the first half
/// minute, then walks away. All output comes from the recorded notifications.
///
/// Run with: cargo run --example headless_session

use std::path::Path;
use std::sync::Arc;

use struggle_narrative::schema::node::Channel;
use struggle_narrative::{NarrativeStore, Notification, Session, SessionConfig, SessionPhase};

fn main() {
    let store = NarrativeStore::load_from_ron(Path::new("story_data/branching_corpses/story.ron"))
        .expect("Failed to load story");
    let config =
        SessionConfig::load_from_ron(Path::new("story_data/branching_corpses/session.ron"))
            .expect("Failed to load session config");

    let store = Arc::new(store);
    let mut session = Session::new(Arc::clone(&store), config, Vec::<Notification>::new());
    session.skip_intro();

    let dt = 0.1;
    let mut clock = 0.0_f32;
    while session.phase() == SessionPhase::MainLoop && clock < 600.0 {
        clock += dt;
        session.tick(dt);
        if clock < 30.0 && (clock * 10.0).round() as u32 % 5 == 0 {
            session.player_action();
        }
    }
    while session.phase() == SessionPhase::Ended && !session.is_finished() {
        session.next_dialogue();
    }

    for notification in session.presenter() {
        match notification {
            Notification::Dialogue(id) => {
                let node = store.dialogue(*id).expect("rendered node exists");
                let name = store.name_of(Channel::Dialogue, *id).unwrap_or("?");
                println!("  [{name}] {}", node.text);
            }
            Notification::PlayerLog(id) => {
                let node = store.player_log(*id).expect("rendered node exists");
                println!("    > {} [{}]", node.text, node.button_label);
            }
            Notification::Phase(phase) => println!("\n=== {} ===", phase.name()),
            Notification::EndingSelected(ending) => println!("  -> {} ending", ending.name()),
            Notification::Finished(ending) => println!("\n--- {} ending, fin ---", ending.name()),
            Notification::Meter(_) | Notification::ActionReady(_) => {}
        }
    }

    println!(
        "\nEnded by {:?} after {:.1}s with struggle at {:.1}",
        session.end_reason(),
        clock,
        session.final_meter().unwrap_or_default()
    );
}

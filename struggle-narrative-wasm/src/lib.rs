//! WASM bindings for struggle-narrative: powers the browser build of the game.

use std::sync::Arc;
use wasm_bindgen::prelude::*;

use struggle_narrative::{NarrativeStore, Notification, Session, SessionConfig};

// ---------------------------------------------------------------------------
// Embedded story data: compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const STORY: &str = include_str!("../../story_data/branching_corpses/story.ron");
    pub const SESSION: &str = include_str!("../../story_data/branching_corpses/session.ron");
}

// ---------------------------------------------------------------------------
// JSON helper types for the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum UiEvent {
    Dialogue {
        speaker: String,
        text: String,
        portrait: Option<String>,
    },
    PlayerLog {
        text: String,
        button: String,
        sound: Option<String>,
        pitch: f32,
    },
    Meter {
        value: f32,
    },
    Phase {
        phase: &'static str,
    },
    Ending {
        ending: &'static str,
    },
    ActionReady {
        ready: bool,
    },
    Finished {
        ending: &'static str,
    },
}

fn to_ui_event(store: &NarrativeStore, notification: &Notification) -> Option<UiEvent> {
    Some(match notification {
        Notification::Dialogue(id) => {
            let node = store.dialogue(*id)?;
            UiEvent::Dialogue {
                speaker: node.speaker.clone(),
                text: node.text.clone(),
                portrait: node.portrait.as_ref().map(|p| p.0.clone()),
            }
        }
        Notification::PlayerLog(id) => {
            let node = store.player_log(*id)?;
            UiEvent::PlayerLog {
                text: node.text.clone(),
                button: node.button_label.clone(),
                sound: node.sound.as_ref().map(|s| s.0.clone()),
                pitch: node.pitch,
            }
        }
        Notification::Meter(value) => UiEvent::Meter { value: *value },
        Notification::Phase(phase) => UiEvent::Phase {
            phase: phase.name(),
        },
        Notification::EndingSelected(ending) => UiEvent::Ending {
            ending: ending.name(),
        },
        Notification::ActionReady(ready) => UiEvent::ActionReady { ready: *ready },
        Notification::Finished(ending) => UiEvent::Finished {
            ending: ending.name(),
        },
    })
}

// ---------------------------------------------------------------------------
// Game handle
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct StruggleGame {
    session: Session<Vec<Notification>>,
}

#[wasm_bindgen]
impl StruggleGame {
    /// Start a session on the embedded story. `config_ron` overrides the
    /// shipped tuning when given.
    #[wasm_bindgen(constructor)]
    pub fn new(config_ron: Option<String>) -> Result<StruggleGame, JsError> {
        let store = NarrativeStore::parse_ron(data::STORY)
            .map_err(|e| JsError::new(&format!("Story parse error: {e}")))?;
        let config = SessionConfig::parse_ron(config_ron.as_deref().unwrap_or(data::SESSION))
            .map_err(|e| JsError::new(&format!("Config parse error: {e}")))?;

        Ok(StruggleGame {
            session: Session::new(Arc::new(store), config, Vec::new()),
        })
    }

    /// Advance the session by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.session.tick(dt);
    }

    pub fn skip_intro(&mut self) {
        self.session.skip_intro();
    }

    pub fn player_action(&mut self) {
        self.session.player_action();
    }

    pub fn next_dialogue(&mut self) {
        self.session.next_dialogue();
    }

    /// Everything that happened since the last drain, as a JSON array.
    pub fn drain_events(&mut self) -> Result<String, JsError> {
        let pending = std::mem::take(self.session.presenter_mut());
        let events: Vec<UiEvent> = pending
            .iter()
            .filter_map(|n| to_ui_event(self.session.store(), n))
            .collect();
        serde_json::to_string(&events)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    pub fn phase(&self) -> String {
        self.session.phase().name().to_string()
    }

    pub fn meter(&self) -> f32 {
        self.session.meter().snapshot()
    }

    /// Fill fraction of the action button's cooldown bar.
    pub fn action_progress(&self) -> f32 {
        self.session.cooldown().progress()
    }

    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_story_loads() {
        let store = NarrativeStore::parse_ron(data::STORY).unwrap();
        assert!(store.dialogues().len() > 10);
        SessionConfig::parse_ron(data::SESSION).unwrap();
    }

    #[test]
    fn events_serialize_with_text() {
        let mut game = StruggleGame {
            session: Session::new(
                Arc::new(NarrativeStore::parse_ron(data::STORY).unwrap()),
                SessionConfig::default(),
                Vec::new(),
            ),
        };
        let json = game.drain_events().unwrap();
        assert!(json.contains("\"kind\":\"phase\""));
        assert!(json.contains("\"kind\":\"dialogue\""));
        assert_eq!(game.drain_events().unwrap(), "[]");
    }
}

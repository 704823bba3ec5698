use serde::{Deserialize, Serialize};

use super::node::{DialogueNode, NodeId, PlayerLogNode};
use super::phase::{Ending, SessionPhase};

/// The presentation boundary. A session calls into this whenever something
/// the player can see or hear changes.
///
/// Calls are made synchronously from inside the session's input and tick
/// methods. Implementations should only queue work for the next frame.
pub trait Presenter {
    fn render_dialogue(&mut self, id: NodeId, node: &DialogueNode);

    /// The host plays `node.sound` at `node.pitch` if one is set.
    fn render_player_log(&mut self, id: NodeId, node: &PlayerLogNode);

    fn render_meter(&mut self, value: f32);

    fn phase_changed(&mut self, phase: SessionPhase);

    fn ending_selected(&mut self, _ending: Ending) {}

    /// Fires on every edge of the action button's cooldown.
    fn action_ready(&mut self, _ready: bool) {}

    /// The ending chain has been read to the end.
    fn session_finished(&mut self, _ending: Ending) {}
}

/// A recorded presenter call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    Dialogue(NodeId),
    PlayerLog(NodeId),
    Meter(f32),
    Phase(SessionPhase),
    EndingSelected(Ending),
    ActionReady(bool),
    Finished(Ending),
}

impl Presenter for Vec<Notification> {
    fn render_dialogue(&mut self, id: NodeId, _node: &DialogueNode) {
        self.push(Notification::Dialogue(id));
    }

    fn render_player_log(&mut self, id: NodeId, _node: &PlayerLogNode) {
        self.push(Notification::PlayerLog(id));
    }

    fn render_meter(&mut self, value: f32) {
        self.push(Notification::Meter(value));
    }

    fn phase_changed(&mut self, phase: SessionPhase) {
        self.push(Notification::Phase(phase));
    }

    fn ending_selected(&mut self, ending: Ending) {
        self.push(Notification::EndingSelected(ending));
    }

    fn action_ready(&mut self, ready: bool) {
        self.push(Notification::ActionReady(ready));
    }

    fn session_finished(&mut self, ending: Ending) {
        self.push(Notification::Finished(ending));
    }
}

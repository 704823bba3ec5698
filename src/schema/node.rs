use serde::{Deserialize, Serialize};

/// Stable index of a node inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to a sprite or sound clip. Resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef(pub String);

/// Which cursor a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Dialogue,
    PlayerLog,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dialogue => write!(f, "dialogue"),
            Self::PlayerLog => write!(f, "player log"),
        }
    }
}

/// Anything that sits in a singly linked chain.
pub trait ChainNode {
    fn next(&self) -> Option<NodeId>;
}

/// One line of dialogue spoken by an enemy or the narrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub speaker: String,
    pub text: String,
    /// Portrait shown beside the text. `None` hides the portrait.
    pub portrait: Option<AssetRef>,
    pub next: Option<NodeId>,
}

impl ChainNode for DialogueNode {
    fn next(&self) -> Option<NodeId> {
        self.next
    }
}

/// One entry of the player's log, with the label for the action button
/// and the sound to play when it is clicked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLogNode {
    pub text: String,
    pub button_label: String,
    pub sound: Option<AssetRef>,
    /// Playback pitch in [-3, 3].
    pub pitch: f32,
    pub next: Option<NodeId>,
}

impl PlayerLogNode {
    pub const MIN_PITCH: f32 = -3.0;
    pub const MAX_PITCH: f32 = 3.0;

    pub fn pitch_in_range(pitch: f32) -> bool {
        (Self::MIN_PITCH..=Self::MAX_PITCH).contains(&pitch)
    }
}

impl ChainNode for PlayerLogNode {
    fn next(&self) -> Option<NodeId> {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_bounds_are_inclusive() {
        assert!(PlayerLogNode::pitch_in_range(-3.0));
        assert!(PlayerLogNode::pitch_in_range(3.0));
        assert!(PlayerLogNode::pitch_in_range(1.0));
        assert!(!PlayerLogNode::pitch_in_range(3.01));
        assert!(!PlayerLogNode::pitch_in_range(f32::NAN));
    }

    #[test]
    fn chain_node_reports_next() {
        let node = DialogueNode {
            speaker: "Sword".to_string(),
            text: "Hold on.".to_string(),
            portrait: Some(AssetRef("sword_idle".to_string())),
            next: Some(NodeId(4)),
        };
        assert_eq!(ChainNode::next(&node), Some(NodeId(4)));
        assert_eq!(NodeId(4).index(), 4);
        assert_eq!(NodeId(4).to_string(), "#4");
    }
}

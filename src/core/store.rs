//! Narrative node store: arenas of dialogue and player-log nodes, loading
//! from RON, and load-time validation of the chains.

use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::schema::node::{AssetRef, Channel, ChainNode, DialogueNode, NodeId, PlayerLogNode};
use crate::schema::phase::Ending;

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("{channel} node '{from}' points at unknown node '{target}'")]
    UnknownNode {
        channel: Channel,
        from: String,
        target: String,
    },
    #[error("entry '{entry}' points at unknown node '{target}'")]
    UnknownEntry { entry: &'static str, target: String },
    #[error("{channel} chain loops back through node '{node}'")]
    Cycle { channel: Channel, node: String },
    #[error("player log '{node}' has pitch {pitch}, expected a value in [-3, 3]")]
    PitchOutOfRange { node: String, pitch: f32 },
}

/// Nodes of one kind, addressed by `NodeId`.
#[derive(Debug, Clone)]
pub struct NodeArena<T> {
    nodes: Vec<T>,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T: ChainNode> NodeArena<T> {
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Walk a chain starting at `start`, inclusive.
    ///
    /// Only terminates on acyclic arenas, which every loaded store is.
    pub fn chain(&self, start: NodeId) -> ChainIter<'_, T> {
        ChainIter {
            arena: self,
            current: Some(start),
        }
    }

    /// Returns the first node found on a cycle, if any.
    fn find_cycle(&self) -> Option<NodeId> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnPath,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        let mut path = Vec::new();

        for start in 0..self.nodes.len() {
            let mut current = Some(NodeId(start as u32));
            while let Some(id) = current {
                match marks[id.index()] {
                    Mark::OnPath => return Some(id),
                    Mark::Done => break,
                    Mark::Unvisited => {
                        marks[id.index()] = Mark::OnPath;
                        path.push(id);
                        current = self.nodes[id.index()].next();
                    }
                }
            }
            for id in path.drain(..) {
                marks[id.index()] = Mark::Done;
            }
        }
        None
    }
}

pub struct ChainIter<'a, T> {
    arena: &'a NodeArena<T>,
    current: Option<NodeId>,
}

impl<'a, T: ChainNode> Iterator for ChainIter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.arena.get(id)?;
        self.current = node.next();
        Some((id, node))
    }
}

/// Resolved entry points into the chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryEntries {
    pub intro: NodeId,
    pub main_loop: NodeId,
    pub player_log: NodeId,
    pub losing: NodeId,
    pub retribution: NodeId,
    pub hero: NodeId,
    /// Player log swapped in when the session ends on a loss.
    pub losing_player_log: Option<NodeId>,
}

impl StoryEntries {
    pub fn ending(&self, ending: Ending) -> NodeId {
        match ending {
            Ending::Losing => self.losing,
            Ending::Retribution => self.retribution,
            Ending::Hero => self.hero,
        }
    }
}

// Authoring-side shapes. Nodes refer to each other by name; ids are
// assigned when the draft is resolved into a store.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueDraft {
    #[serde(default)]
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub portrait: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

fn default_pitch() -> f32 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerLogDraft {
    pub text: String,
    #[serde(default)]
    pub button: String,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default = "default_pitch")]
    pub pitch: f32,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryNames {
    pub intro: String,
    pub main_loop: String,
    pub player_log: String,
    pub losing: String,
    pub retribution: String,
    pub hero: String,
    #[serde(default)]
    pub losing_player_log: Option<String>,
}

/// A story as written by an author, before name resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDraft {
    #[serde(default)]
    pub dialogues: BTreeMap<String, DialogueDraft>,
    #[serde(default)]
    pub player_logs: BTreeMap<String, PlayerLogDraft>,
    pub entries: EntryNames,
}

/// The immutable narrative graph for a story.
#[derive(Debug, Clone)]
pub struct NarrativeStore {
    dialogues: NodeArena<DialogueNode>,
    player_logs: NodeArena<PlayerLogNode>,
    dialogue_names: Vec<String>,
    player_log_names: Vec<String>,
    dialogue_ids: FxHashMap<String, NodeId>,
    player_log_ids: FxHashMap<String, NodeId>,
    entries: StoryEntries,
}

impl NarrativeStore {
    /// Load and validate a story from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<NarrativeStore, StoryError> {
        let contents = std::fs::read_to_string(path)?;
        let store = Self::parse_ron(&contents)?;
        info!(
            "loaded story {}: {} dialogue nodes, {} player logs",
            path.display(),
            store.dialogues.len(),
            store.player_logs.len()
        );
        Ok(store)
    }

    /// Parse and validate a story from a RON string.
    pub fn parse_ron(input: &str) -> Result<NarrativeStore, StoryError> {
        let draft: StoryDraft = ron::from_str(input)?;
        Self::from_draft(draft)
    }

    /// Resolve names into ids and check every chain.
    pub fn from_draft(draft: StoryDraft) -> Result<NarrativeStore, StoryError> {
        let dialogue_names: Vec<String> = draft.dialogues.keys().cloned().collect();
        let player_log_names: Vec<String> = draft.player_logs.keys().cloned().collect();
        let dialogue_ids = index_names(&dialogue_names);
        let player_log_ids = index_names(&player_log_names);

        let mut dialogues = NodeArena::default();
        for (name, d) in draft.dialogues {
            let next = resolve_next(Channel::Dialogue, &name, d.next, &dialogue_ids)?;
            dialogues.nodes.push(DialogueNode {
                speaker: d.speaker,
                text: d.text,
                portrait: d.portrait.map(AssetRef),
                next,
            });
        }

        let mut player_logs = NodeArena::default();
        for (name, l) in draft.player_logs {
            if !PlayerLogNode::pitch_in_range(l.pitch) {
                return Err(StoryError::PitchOutOfRange {
                    node: name,
                    pitch: l.pitch,
                });
            }
            let next = resolve_next(Channel::PlayerLog, &name, l.next, &player_log_ids)?;
            player_logs.nodes.push(PlayerLogNode {
                text: l.text,
                button_label: l.button,
                sound: l.sound.map(AssetRef),
                pitch: l.pitch,
                next,
            });
        }

        if let Some(id) = dialogues.find_cycle() {
            return Err(StoryError::Cycle {
                channel: Channel::Dialogue,
                node: dialogue_names[id.index()].clone(),
            });
        }
        if let Some(id) = player_logs.find_cycle() {
            return Err(StoryError::Cycle {
                channel: Channel::PlayerLog,
                node: player_log_names[id.index()].clone(),
            });
        }

        let names = draft.entries;
        let entries = StoryEntries {
            intro: resolve_entry("intro", names.intro, &dialogue_ids)?,
            main_loop: resolve_entry("main_loop", names.main_loop, &dialogue_ids)?,
            player_log: resolve_entry("player_log", names.player_log, &player_log_ids)?,
            losing: resolve_entry("losing", names.losing, &dialogue_ids)?,
            retribution: resolve_entry("retribution", names.retribution, &dialogue_ids)?,
            hero: resolve_entry("hero", names.hero, &dialogue_ids)?,
            losing_player_log: names
                .losing_player_log
                .map(|n| resolve_entry("losing_player_log", n, &player_log_ids))
                .transpose()?,
        };

        Ok(NarrativeStore {
            dialogues,
            player_logs,
            dialogue_names,
            player_log_names,
            dialogue_ids,
            player_log_ids,
            entries,
        })
    }

    pub fn dialogues(&self) -> &NodeArena<DialogueNode> {
        &self.dialogues
    }

    pub fn player_logs(&self) -> &NodeArena<PlayerLogNode> {
        &self.player_logs
    }

    pub fn dialogue(&self, id: NodeId) -> Option<&DialogueNode> {
        self.dialogues.get(id)
    }

    pub fn player_log(&self, id: NodeId) -> Option<&PlayerLogNode> {
        self.player_logs.get(id)
    }

    pub fn entries(&self) -> &StoryEntries {
        &self.entries
    }

    /// Look up a node id by its authored name.
    pub fn id_of(&self, channel: Channel, name: &str) -> Option<NodeId> {
        match channel {
            Channel::Dialogue => self.dialogue_ids.get(name).copied(),
            Channel::PlayerLog => self.player_log_ids.get(name).copied(),
        }
    }

    /// The authored name of a node.
    pub fn name_of(&self, channel: Channel, id: NodeId) -> Option<&str> {
        let names = match channel {
            Channel::Dialogue => &self.dialogue_names,
            Channel::PlayerLog => &self.player_log_names,
        };
        names.get(id.index()).map(String::as_str)
    }

    /// Names of nodes that no entry point ever reaches, sorted.
    pub fn unreachable(&self, channel: Channel) -> Vec<&str> {
        let e = &self.entries;
        match channel {
            Channel::Dialogue => unreached(
                &self.dialogues,
                &[e.intro, e.main_loop, e.losing, e.retribution, e.hero],
                &self.dialogue_names,
            ),
            Channel::PlayerLog => {
                let mut starts = vec![e.player_log];
                starts.extend(e.losing_player_log);
                unreached(&self.player_logs, &starts, &self.player_log_names)
            }
        }
    }
}

fn index_names(names: &[String]) -> FxHashMap<String, NodeId> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), NodeId(i as u32)))
        .collect()
}

fn resolve_next(
    channel: Channel,
    from: &str,
    next: Option<String>,
    ids: &FxHashMap<String, NodeId>,
) -> Result<Option<NodeId>, StoryError> {
    match next {
        None => Ok(None),
        Some(target) => match ids.get(&target) {
            Some(id) => Ok(Some(*id)),
            None => Err(StoryError::UnknownNode {
                channel,
                from: from.to_string(),
                target,
            }),
        },
    }
}

fn resolve_entry(
    entry: &'static str,
    target: String,
    ids: &FxHashMap<String, NodeId>,
) -> Result<NodeId, StoryError> {
    ids.get(&target)
        .copied()
        .ok_or(StoryError::UnknownEntry { entry, target })
}

fn unreached<'a, T: ChainNode>(
    arena: &NodeArena<T>,
    starts: &[NodeId],
    names: &'a [String],
) -> Vec<&'a str> {
    let mut seen = vec![false; arena.len()];
    for &start in starts {
        for (id, _) in arena.chain(start) {
            seen[id.index()] = true;
        }
    }
    seen.iter()
        .enumerate()
        .filter(|(_, reached)| !**reached)
        .map(|(i, _)| names[i].as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY: &str = r#"(
        dialogues: {
            "intro_1": (text: "It is dark.", next: Some("intro_2")),
            "intro_2": (text: "Something moves."),
            "main_1": (speaker: "Ghoul", text: "Give up.", portrait: Some("ghoul"), next: Some("main_2")),
            "main_2": (speaker: "Ghoul", text: "Still here?"),
            "lose_1": (text: "You fade."),
            "ret_1": (text: "You crawl out."),
            "hero_1": (text: "You stand."),
            "stray": (text: "Nobody reads this."),
        },
        player_logs: {
            "log_1": (text: "You are pinned.", button: "Struggle", sound: Some("grunt"), pitch: 1.2, next: Some("log_2")),
            "log_2": (text: "The grip loosens.", button: "Kick"),
            "log_lost": (text: "You stop moving.", button: "..."),
        },
        entries: (
            intro: "intro_1",
            main_loop: "main_1",
            player_log: "log_1",
            losing: "lose_1",
            retribution: "ret_1",
            hero: "hero_1",
            losing_player_log: Some("log_lost"),
        ),
    )"#;

    #[test]
    fn parse_story_resolves_names() {
        let store = NarrativeStore::parse_ron(STORY).unwrap();
        assert_eq!(store.dialogues().len(), 8);
        assert_eq!(store.player_logs().len(), 3);

        let main_1 = store.id_of(Channel::Dialogue, "main_1").unwrap();
        let main_2 = store.id_of(Channel::Dialogue, "main_2").unwrap();
        let node = store.dialogue(main_1).unwrap();
        assert_eq!(node.speaker, "Ghoul");
        assert_eq!(node.portrait, Some(AssetRef("ghoul".to_string())));
        assert_eq!(node.next, Some(main_2));
        assert_eq!(store.name_of(Channel::Dialogue, main_2), Some("main_2"));
        assert_eq!(store.entries().main_loop, main_1);
    }

    #[test]
    fn player_log_defaults() {
        let store = NarrativeStore::parse_ron(STORY).unwrap();
        let log_2 = store.id_of(Channel::PlayerLog, "log_2").unwrap();
        let node = store.player_log(log_2).unwrap();
        assert_eq!(node.pitch, 1.0);
        assert!(node.sound.is_none());
        assert!(node.next.is_none());

        let log_1 = store.entries().player_log;
        assert_eq!(store.player_log(log_1).unwrap().button_label, "Struggle");
    }

    #[test]
    fn ending_entries() {
        let store = NarrativeStore::parse_ron(STORY).unwrap();
        let hero = store.id_of(Channel::Dialogue, "hero_1").unwrap();
        assert_eq!(store.entries().ending(Ending::Hero), hero);
        assert!(store.entries().losing_player_log.is_some());
    }

    #[test]
    fn chain_walks_to_terminal() {
        let store = NarrativeStore::parse_ron(STORY).unwrap();
        let texts: Vec<&str> = store
            .dialogues()
            .chain(store.entries().intro)
            .map(|(_, n)| n.text.as_str())
            .collect();
        assert_eq!(texts, vec!["It is dark.", "Something moves."]);
    }

    #[test]
    fn unreachable_nodes_reported() {
        let store = NarrativeStore::parse_ron(STORY).unwrap();
        assert_eq!(store.unreachable(Channel::Dialogue), vec!["stray"]);
        assert!(store.unreachable(Channel::PlayerLog).is_empty());
    }

    #[test]
    fn dangling_next_is_rejected() {
        let bad = STORY.replace(r#"next: Some("main_2")"#, r#"next: Some("main_9")"#);
        match NarrativeStore::parse_ron(&bad) {
            Err(StoryError::UnknownNode { from, target, .. }) => {
                assert_eq!(from, "main_1");
                assert_eq!(target, "main_9");
            }
            other => panic!("expected UnknownNode, got {:?}", other),
        }
    }

    #[test]
    fn unknown_entry_is_rejected() {
        let bad = STORY.replace(r#"hero: "hero_1""#, r#"hero: "hero_9""#);
        assert!(matches!(
            NarrativeStore::parse_ron(&bad),
            Err(StoryError::UnknownEntry { entry: "hero", .. })
        ));
    }

    #[test]
    fn cycle_is_rejected() {
        let bad = STORY.replace(
            r#""main_2": (speaker: "Ghoul", text: "Still here?")"#,
            r#""main_2": (speaker: "Ghoul", text: "Still here?", next: Some("main_1"))"#,
        );
        assert!(matches!(
            NarrativeStore::parse_ron(&bad),
            Err(StoryError::Cycle {
                channel: Channel::Dialogue,
                ..
            })
        ));
    }

    #[test]
    fn self_loop_is_rejected() {
        let bad = STORY.replace(
            r#""log_lost": (text: "You stop moving.", button: "...")"#,
            r#""log_lost": (text: "You stop moving.", button: "...", next: Some("log_lost"))"#,
        );
        assert!(matches!(
            NarrativeStore::parse_ron(&bad),
            Err(StoryError::Cycle {
                channel: Channel::PlayerLog,
                ..
            })
        ));
    }

    #[test]
    fn pitch_out_of_range_is_rejected() {
        let bad = STORY.replace("pitch: 1.2", "pitch: 4.0");
        assert!(matches!(
            NarrativeStore::parse_ron(&bad),
            Err(StoryError::PitchOutOfRange { .. })
        ));
    }

    #[test]
    fn malformed_ron_is_an_error() {
        assert!(matches!(
            NarrativeStore::parse_ron("(dialogues: {"),
            Err(StoryError::Ron(_))
        ));
    }
}

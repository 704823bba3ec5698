//! Cursor over one narrative channel.

use crate::core::store::NodeArena;
use crate::schema::node::{Channel, ChainNode, NodeId};

/// Points at the active node of a channel. Never owns nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrativeCursor {
    channel: Channel,
    active: Option<NodeId>,
}

impl NarrativeCursor {
    pub fn new(channel: Channel, active: Option<NodeId>) -> Self {
        Self { channel, active }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    /// Follow `next`. At the end of a chain this does nothing, so repeated
    /// calls past the terminal node are harmless.
    pub fn advance<T: ChainNode>(&mut self, arena: &NodeArena<T>) -> Option<NodeId> {
        if let Some(next) = self.next_of(arena) {
            self.active = Some(next);
        }
        self.active
    }

    /// True when there is no active node or the active node is terminal.
    pub fn is_at_end<T: ChainNode>(&self, arena: &NodeArena<T>) -> bool {
        self.next_of(arena).is_none()
    }

    pub fn reset(&mut self, node: Option<NodeId>) {
        self.active = node;
    }

    fn next_of<T: ChainNode>(&self, arena: &NodeArena<T>) -> Option<NodeId> {
        self.active
            .and_then(|id| arena.get(id))
            .and_then(|node| node.next())
    }
}

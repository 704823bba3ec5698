//! Plain data shared by the core and its hosts.

pub mod node;
pub mod notification;
pub mod phase;

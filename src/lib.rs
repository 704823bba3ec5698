//! Struggle Narrative: the engine-independent core of a short story game.
//!
//! Authored chains of dialogue and player-log nodes, a "struggle" meter that
//! drains over time and fills with player actions, and three endings picked
//! from the meter's value when the main loop stops. Hosts drive a
//! [`Session`](core::session::Session) with one `tick` per frame and receive
//! everything visible through a [`Presenter`](schema::notification::Presenter).

pub mod core;
pub mod schema;

pub use crate::core::config::{ConfigError, SessionConfig};
pub use crate::core::session::{EndReason, Session};
pub use crate::core::store::{NarrativeStore, StoryError};
pub use crate::schema::notification::{Notification, Presenter};
pub use crate::schema::phase::{Ending, SessionPhase};

//! Narrative state machine and its timers.

pub mod config;
pub mod cooldown;
pub mod cursor;
pub mod ending;
pub mod meter;
pub mod pacing;
pub mod session;
pub mod store;
pub mod timer;

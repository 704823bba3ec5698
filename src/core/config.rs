//! Session tuning, loaded from RON.

use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::ending::EndingThresholds;
use crate::core::meter::ResourceMeter;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("{field} is {value}, expected a value in [0, 100]")]
    OutOfRange { field: &'static str, value: f32 },
    #[error("{field} must be a positive number of seconds")]
    NonPositiveInterval { field: &'static str },
    #[error("losing threshold {losing} must be below hero threshold {hero}")]
    Thresholds { losing: f32, hero: f32 },
}

/// Every tunable of a session. Missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Meter value when the main loop begins.
    pub initial_meter: f32,
    /// Points lost on each decay firing.
    pub decay_per_tick: u32,
    /// Seconds between decay firings.
    pub decay_interval: f32,
    /// Points won per player action.
    pub gain_per_action: f32,
    /// Seconds each main-loop dialogue stays on screen.
    pub pacing_interval: f32,
    /// Seconds each intro line stays on screen.
    pub intro_interval: f32,
    /// Seconds the action button stays locked after use. Zero disables it.
    pub action_cooldown: f32,
    pub thresholds: EndingThresholds,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_meter: 50.0,
            decay_per_tick: 2,
            decay_interval: 1.0,
            gain_per_action: 4.0,
            pacing_interval: 4.0,
            intro_interval: 3.0,
            action_cooldown: 0.5,
            thresholds: EndingThresholds::default(),
        }
    }
}

impl SessionConfig {
    pub fn load_from_ron(path: &Path) -> Result<SessionConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::parse_ron(&contents)?;
        info!("loaded session config {}", path.display());
        Ok(config)
    }

    /// Parse and validate.
    pub fn parse_ron(input: &str) -> Result<SessionConfig, ConfigError> {
        let config: SessionConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_bounds = |v: f32| (ResourceMeter::MIN..=ResourceMeter::MAX).contains(&v);

        if !in_bounds(self.initial_meter) {
            return Err(ConfigError::OutOfRange {
                field: "initial_meter",
                value: self.initial_meter,
            });
        }
        if !in_bounds(self.gain_per_action) {
            return Err(ConfigError::OutOfRange {
                field: "gain_per_action",
                value: self.gain_per_action,
            });
        }
        for (field, seconds) in [
            ("decay_interval", self.decay_interval),
            ("pacing_interval", self.pacing_interval),
            ("intro_interval", self.intro_interval),
        ] {
            if !(seconds.is_finite() && seconds > 0.0) {
                return Err(ConfigError::NonPositiveInterval { field });
            }
        }
        if !(self.action_cooldown.is_finite() && self.action_cooldown >= 0.0) {
            return Err(ConfigError::NonPositiveInterval {
                field: "action_cooldown",
            });
        }
        let t = &self.thresholds;
        if !(t.losing_at_or_below < t.hero_at_or_above) {
            return Err(ConfigError::Thresholds {
                losing: t.losing_at_or_below,
                hero: t.hero_at_or_above,
            });
        }
        Ok(())
    }
}

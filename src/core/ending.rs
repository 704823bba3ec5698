//! Picks the ending branch from the final meter value.

use serde::{Deserialize, Serialize};

use crate::schema::phase::Ending;

/// Band edges for the three endings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndingThresholds {
    /// At or below this the player lost.
    pub losing_at_or_below: f32,
    /// At or above this the player is a hero. Between the two is retribution.
    pub hero_at_or_above: f32,
}

impl Default for EndingThresholds {
    fn default() -> Self {
        Self {
            losing_at_or_below: 0.0,
            hero_at_or_above: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EndingResolver {
    thresholds: EndingThresholds,
}

impl EndingResolver {
    pub fn new(thresholds: EndingThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &EndingThresholds {
        &self.thresholds
    }

    /// Total over every `f32`. NaN resolves to `Losing`.
    pub fn resolve(&self, value: f32) -> Ending {
        if value.is_nan() || value <= self.thresholds.losing_at_or_below {
            Ending::Losing
        } else if value < self.thresholds.hero_at_or_above {
            Ending::Retribution
        } else {
            Ending::Hero
        }
    }
}

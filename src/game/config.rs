//! Round timings and grid size.
//!
//! All fields have defaults, so a partial JSON object such as
//! `{"round_seconds": 30}` is a valid config. Target weights and score
//! values live in `game::target` and are not configurable.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Upper bound for the round countdown.
pub const MAX_ROUND_SECONDS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of holes in the grid.
    pub slot_count: usize,
    /// Holes per grid row.
    pub grid_columns: usize,
    /// Countdown length at round start.
    pub round_seconds: u32,
    /// Length of one countdown step.
    pub tick_ms: u64,
    /// Time between target spawns.
    pub spawn_interval_ms: u64,
    /// How long a target stays up.
    pub target_visible_ms: u64,
    /// Clicks are ignored for this long after a hit.
    pub click_cooldown_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            slot_count: 15,
            grid_columns: 5,
            round_seconds: MAX_ROUND_SECONDS,
            tick_ms: 1000,
            spawn_interval_ms: 2000,
            target_visible_ms: 1500,
            click_cooldown_ms: 500,
        }
    }
}

impl GameConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.slot_count == 0 {
            return Err(GameError::InvalidConfig("slot_count must be at least 1".into()));
        }
        if self.grid_columns == 0 || self.grid_columns > self.slot_count {
            return Err(GameError::InvalidConfig(format!(
                "grid_columns must be between 1 and {}",
                self.slot_count
            )));
        }
        if self.round_seconds == 0 || self.round_seconds > MAX_ROUND_SECONDS {
            return Err(GameError::InvalidConfig(format!(
                "round_seconds must be between 1 and {}",
                MAX_ROUND_SECONDS
            )));
        }
        for (name, value) in [
            ("tick_ms", self.tick_ms),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("target_visible_ms", self.target_visible_ms),
            ("click_cooldown_ms", self.click_cooldown_ms),
        ] {
            if value == 0 {
                return Err(GameError::InvalidConfig(format!("{} must be non-zero", name)));
            }
        }
        Ok(())
    }
}

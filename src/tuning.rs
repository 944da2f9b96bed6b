//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so it can be
//! tweaked from `data/tuning.json` without a rebuild. Missing fields keep
//! their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default location of the tuning document (native builds)
pub const TUNING_FILE: &str = "data/tuning.json";

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Craft ===
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Velocity set by a thrust (negative = up)
    pub jump_velocity: f32,
    /// Fraction of gravity cancelled while falling
    pub anti_gravity: f32,
    /// Maximum falling speed per tick
    pub terminal_velocity: f32,
    /// Half-width of the craft footprint
    pub craft_size: f32,

    // === Hazards ===
    /// Horizontal scroll per tick (hazards and tokens)
    pub scroll_speed: f32,
    /// Vertical opening between the two beams
    pub hazard_gap: f32,
    pub hazard_width: f32,
    pub hazard_interval_ms: f32,

    // === Tokens ===
    pub token_size: f32,
    pub token_value: u32,
    pub token_interval_ms: f32,

    // === Lives ===
    pub starting_lives: u8,
    /// Ticks of hit immunity after losing a life (1.5 s at 60 Hz)
    pub invincibility_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.2,
            jump_velocity: -6.0,
            anti_gravity: 0.15,
            terminal_velocity: 12.0,
            craft_size: 12.0,

            scroll_speed: 1.5,
            hazard_gap: 150.0,
            hazard_width: 20.0,
            hazard_interval_ms: 1500.0,

            token_size: 10.0,
            token_value: 5,
            token_interval_ms: 2000.0,

            starting_lives: 5,
            invincibility_ticks: 90,
        }
    }
}

impl Tuning {
    /// Parse a tuning document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from disk, falling back to defaults when the file is
    /// absent or malformed
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring malformed tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Lowest gap start that keeps the top beam non-degenerate
    pub fn gap_top_min(&self) -> i32 {
        crate::consts::HAZARD_EDGE_MARGIN
    }

    /// Highest gap start that keeps the bottom beam non-degenerate
    pub fn gap_top_max(&self) -> i32 {
        let max = crate::consts::FIELD_HEIGHT as i32
            - crate::consts::HAZARD_EDGE_MARGIN
            - self.hazard_gap as i32;
        max.max(self.gap_top_min())
    }
}

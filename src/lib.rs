//! Space Flappy - a side-scrolling space arcade game
//!
//! Core modules:
//! - `sim`: Simulation (craft physics, hazards, tokens, spawning, game state machine)
//! - `highscores`: Bounded leaderboard and its ranking rules
//! - `persistence`: Leaderboard stores (file, LocalStorage, in-memory)
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences
//! - `platform`: Input translation from raw keys to simulation commands
//! - `renderer`: Starfield, HUD text, vertex scene builder, WebGPU pipeline, terminal view

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{Leaderboard, LeaderboardEntry};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (logical pixels, y grows downward)
    pub const FIELD_WIDTH: f32 = 288.0;
    pub const FIELD_HEIGHT: f32 = 512.0;

    /// Craft spawn pose
    pub const CRAFT_X: f32 = 72.0;
    pub const CRAFT_START_Y: f32 = FIELD_HEIGHT / 2.0;

    /// Hazards enter this far past the right edge
    pub const HAZARD_SPAWN_X: f32 = FIELD_WIDTH + 10.0;
    /// Minimum height of either beam segment
    pub const HAZARD_EDGE_MARGIN: i32 = 40;
    /// Tokens enter this far past the right edge
    pub const TOKEN_SPAWN_X: f32 = FIELD_WIDTH + 20.0;
    /// Tokens never spawn within this distance of the ceiling or floor
    pub const TOKEN_SAFE_MARGIN: i32 = 60;
    /// Entities are culled once their trailing edge is left of this
    pub const CULL_MARGIN: f32 = -10.0;

    /// Leaderboard bounds
    pub const MAX_LEADERBOARD: usize = 5;
    pub const MAX_NAME_LEN: usize = 15;
}

//! Simulation module
//!
//! All gameplay rules live here. Nothing in this module draws, reads the
//! keyboard or touches the clock:
//! - Fixed timestep only (one tick = 1/60 s of simulated time)
//! - Seeded RNG only
//! - Stable update order (oldest entity first)

pub mod collision;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use snapshot::Snapshot;
pub use spawner::{SpawnEvents, Spawner, TICK_US, Timer, spawn_hazard, spawn_token};
pub use state::{Craft, GameMode, GameOverView, GameState, HazardPair, Token};
pub use tick::{Command, TickInput, tick};

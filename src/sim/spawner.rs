//! Fixed-interval entity spawning
//!
//! Two independent timers run on simulated time: one for hazard pairs, a
//! slower one for tokens. Time is counted in whole microseconds so the
//! interval boundaries land on the same tick every run.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{HazardPair, Token};
use crate::consts::*;
use crate::tuning::Tuning;

/// One tick of simulated time in microseconds (60 Hz, rounded)
pub const TICK_US: u64 = (1_000_000 + TICK_RATE as u64 / 2) / TICK_RATE as u64;

/// A repeating timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    interval_us: u64,
    elapsed_us: u64,
}

impl Timer {
    pub fn from_millis(interval_ms: f32) -> Self {
        Self {
            interval_us: (interval_ms.max(0.0) * 1000.0).round() as u64,
            elapsed_us: 0,
        }
    }

    /// Advance by `dt_us`, returning how many times the timer fired
    pub fn advance(&mut self, dt_us: u64) -> u32 {
        if self.interval_us == 0 {
            return 0;
        }
        self.elapsed_us += dt_us;
        let fired = self.elapsed_us / self.interval_us;
        self.elapsed_us %= self.interval_us;
        fired as u32
    }
}

/// Number of entities due this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnEvents {
    pub hazards: u32,
    pub tokens: u32,
}

/// Hazard and token timers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawner {
    hazard: Timer,
    token: Timer,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            hazard: Timer::from_millis(tuning.hazard_interval_ms),
            token: Timer::from_millis(tuning.token_interval_ms),
        }
    }

    /// Advance both timers
    pub fn advance(&mut self, dt_us: u64) -> SpawnEvents {
        SpawnEvents {
            hazards: self.hazard.advance(dt_us),
            tokens: self.token.advance(dt_us),
        }
    }
}

/// New hazard pair just past the right edge with a random gap
pub fn spawn_hazard(rng: &mut impl Rng, tuning: &Tuning) -> HazardPair {
    let gap_top = rng.random_range(tuning.gap_top_min()..=tuning.gap_top_max());
    HazardPair::new(HAZARD_SPAWN_X, gap_top as f32, tuning)
}

/// New token just past the right edge at a random safe height
pub fn spawn_token(rng: &mut impl Rng, tuning: &Tuning) -> Token {
    let low = TOKEN_SAFE_MARGIN;
    let high = FIELD_HEIGHT as i32 - TOKEN_SAFE_MARGIN;
    let y = rng.random_range(low..=high);
    Token::new(TOKEN_SPAWN_X, y as f32, tuning)
}

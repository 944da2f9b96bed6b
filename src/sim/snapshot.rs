//! Read-only view of the game for renderers

use super::state::{Craft, GameMode, GameState, HazardPair, Token};
use crate::highscores::Leaderboard;

/// Everything a renderer needs to draw a frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub craft: &'a Craft,
    pub hazards: &'a [HazardPair],
    pub tokens: &'a [Token],
    pub obstacle_score: u32,
    pub token_score: u32,
    pub total_score: u32,
    pub tokens_collected: u32,
    pub lives: u8,
    pub invincible: bool,
    pub mode: GameMode,
    pub name_buffer: &'a str,
    pub leaderboard: &'a Leaderboard,
    /// Score of the entry submitted this run, for highlighting on the board
    pub highlight_score: Option<u32>,
    /// Horizontal scroll per tick (drives parallax)
    pub scroll_speed: f32,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            craft: &self.craft,
            hazards: &self.hazards,
            tokens: &self.tokens,
            obstacle_score: self.obstacle_score,
            token_score: self.token_score,
            total_score: self.total_score(),
            tokens_collected: self.tokens_collected(),
            lives: self.lives,
            invincible: self.is_invincible(),
            mode: self.mode,
            name_buffer: &self.name_buffer,
            leaderboard: &self.leaderboard,
            highlight_score: self.submitted_score,
            scroll_speed: self.tuning.scroll_speed,
        }
    }
}

//! In-process leaderboard store

use super::{LeaderboardStore, StoreError};
use crate::highscores::Leaderboard;

/// Keeps the leaderboard in memory; nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    board: Option<Leaderboard>,
    saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a board
    pub fn with_board(board: Leaderboard) -> Self {
        Self {
            board: Some(board),
            saves: 0,
        }
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> u32 {
        self.saves
    }
}

impl LeaderboardStore for MemoryStore {
    fn load(&self) -> Result<Leaderboard, StoreError> {
        self.board.clone().ok_or(StoreError::NotFound)
    }

    fn save(&mut self, board: &Leaderboard) -> Result<(), StoreError> {
        self.board = Some(board.clone());
        self.saves += 1;
        Ok(())
    }
}

//! JSON file leaderboard store

use std::fs;
use std::path::{Path, PathBuf};

use super::{LeaderboardStore, StoreError, decode, encode};
use crate::highscores::Leaderboard;

/// Default location, relative to the working directory
pub const LEADERBOARD_FILE: &str = "data/leaderboard.json";

/// Leaderboard persisted as a pretty-printed JSON array
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(LEADERBOARD_FILE)
    }
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeaderboardStore for FileStore {
    fn load(&self) -> Result<Leaderboard, StoreError> {
        let json = fs::read_to_string(&self.path)?;
        decode(&json)
    }

    fn save(&mut self, board: &Leaderboard) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        // Write-then-rename so a crash mid-write never leaves a torn document
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encode(board)?)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                log::warn!("Could not remove {}: {}", tmp.display(), cleanup);
            }
            return Err(e.into());
        }
        Ok(())
    }
}

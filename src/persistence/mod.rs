//! Leaderboard persistence
//!
//! Stores report failures as [`StoreError`]; the simulation decides what to do
//! with them (log and carry on with an empty board or a skipped save).
//!
//! Backends:
//! - [`FileStore`]: JSON document on disk (native)
//! - [`LocalStorageStore`]: browser LocalStorage (wasm32)
//! - [`MemoryStore`]: in-process, for tests and headless runs

use std::fmt;

use crate::highscores::Leaderboard;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub use file::{FileStore, LEADERBOARD_FILE};
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;
pub use memory::MemoryStore;

/// Why a leaderboard could not be loaded or saved
#[derive(Debug)]
pub enum StoreError {
    /// Nothing has been persisted yet
    NotFound,
    /// Underlying read/write failed
    Io(std::io::Error),
    /// Persisted document is not a valid leaderboard
    Malformed(serde_json::Error),
    /// Backend is not reachable (e.g. LocalStorage disabled)
    Unavailable(&'static str),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no leaderboard saved yet"),
            Self::Io(e) => write!(f, "leaderboard i/o failed: {e}"),
            Self::Malformed(e) => write!(f, "leaderboard document is malformed: {e}"),
            Self::Unavailable(why) => write!(f, "leaderboard storage unavailable: {why}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Malformed(e) => Some(e),
            Self::NotFound | Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(e)
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e)
    }
}

/// Durable home of the leaderboard
pub trait LeaderboardStore {
    /// Read the persisted board
    fn load(&self) -> Result<Leaderboard, StoreError>;

    /// Replace the persisted board
    fn save(&mut self, board: &Leaderboard) -> Result<(), StoreError>;
}

/// Decode a persisted document, restoring the board invariants
pub fn decode(json: &str) -> Result<Leaderboard, StoreError> {
    let board: Leaderboard = serde_json::from_str(json)?;
    Ok(Leaderboard::from_entries(board.entries().to_vec()))
}

/// Encode a board as the canonical persisted document
pub fn encode(board: &Leaderboard) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(board)?)
}

/// Load the board, treating any failure as an empty board
pub fn load_or_empty(store: &dyn LeaderboardStore) -> Leaderboard {
    match store.load() {
        Ok(board) => {
            log::info!("Loaded {} leaderboard entries", board.len());
            board
        }
        Err(StoreError::NotFound) => {
            log::info!("No leaderboard found, starting fresh");
            Leaderboard::new()
        }
        Err(e) => {
            log::warn!("{e}; starting with an empty leaderboard");
            Leaderboard::new()
        }
    }
}

/// Save the board, logging and skipping on failure
pub fn save_or_skip(store: &mut dyn LeaderboardStore, board: &Leaderboard) {
    match store.save(board) {
        Ok(()) => log::info!("Leaderboard saved ({} entries)", board.len()),
        Err(e) => log::warn!("{e}; save skipped"),
    }
}

//! Browser LocalStorage leaderboard store

use super::{LeaderboardStore, StoreError, decode, encode};
use crate::highscores::Leaderboard;

/// Leaderboard persisted under a LocalStorage key
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "space_flappy_leaderboard";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable("LocalStorage is not accessible"))
    }
}

impl LeaderboardStore for LocalStorageStore {
    fn load(&self) -> Result<Leaderboard, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => decode(&json),
            Ok(None) => Err(StoreError::NotFound),
            Err(_) => Err(StoreError::Unavailable("LocalStorage read was rejected")),
        }
    }

    fn save(&mut self, board: &Leaderboard) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = encode(board)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StoreError::Unavailable("LocalStorage write was rejected"))
    }
}

//! Platform abstraction layer
//!
//! Turns raw key presses (browser `KeyboardEvent.key` strings or terminal key
//! codes) into simulation commands. Which command a key produces depends on
//! the current game mode; the simulation still ignores anything invalid.

pub mod input;

pub use input::{Key, translate};
#[cfg(not(target_arch = "wasm32"))]
pub use input::from_key_code;

//! Key to command translation

use crate::sim::{Command, GameMode, GameOverView};

/// A key press, independent of where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Enter,
    Backspace,
    Escape,
    Char(char),
}

impl Key {
    /// Map a browser `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            " " | "Spacebar" => Some(Key::Space),
            "Enter" => Some(Key::Enter),
            "Backspace" => Some(Key::Backspace),
            "Escape" | "Esc" => Some(Key::Escape),
            other => {
                // Named keys ("Shift", "ArrowUp", ...) are longer than one char
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

/// Map a terminal key code
#[cfg(not(target_arch = "wasm32"))]
pub fn from_key_code(code: crossterm::event::KeyCode) -> Option<Key> {
    use crossterm::event::KeyCode;
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}

/// Command for a key press in the given mode
///
/// Space always means "thrust" while playing and "restart" once the run is
/// over, even on the name-entry screen, so names can't contain spaces.
pub fn translate(key: Key, mode: GameMode) -> Option<Command> {
    match (key, mode) {
        (Key::Escape, _) => Some(Command::Quit),
        (Key::Space, GameMode::Playing) => Some(Command::Thrust),
        (Key::Space, GameMode::GameOver(_)) => Some(Command::ConfirmOrRestart),
        (key, GameMode::GameOver(GameOverView::EnteringName)) => match key {
            Key::Enter => Some(Command::SubmitName),
            Key::Backspace => Some(Command::DeleteNameChar),
            Key::Char(c) if !c.is_control() => Some(Command::AppendNameChar(c)),
            _ => None,
        },
        _ => None,
    }
}

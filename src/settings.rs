//! Presentation settings and preferences
//!
//! Persisted separately from the leaderboard: read from LocalStorage on web,
//! `data/settings.json` natively (written by the terminal build's command-line
//! flags). None of this affects gameplay.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Stars per parallax layer (far, mid, near)
    pub fn star_counts(&self) -> [usize; 3] {
        match self {
            QualityPreset::Low => [0, 0, 0],
            QualityPreset::Medium => [25, 15, 10],
            QualityPreset::High => [50, 30, 20],
        }
    }

    /// Whether to render starfield parallax
    pub fn starfield_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Reduced motion (no blinking craft, static beams)
    pub reduced_motion: bool,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            reduced_motion: false,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Whether the craft should blink while invincible
    pub fn blink_when_invincible(&self) -> bool {
        !self.reduced_motion
    }

    /// Whether beams and coins should animate
    pub fn animate_entities(&self) -> bool {
        !self.reduced_motion
    }

    /// Apply `--quality <low|medium|high>`, `--reduced-motion` and
    /// `--show-fps`; returns whether anything was set
    ///
    /// Unknown arguments and presets are logged and skipped.
    pub fn apply_args(&mut self, args: impl IntoIterator<Item = String>) -> bool {
        let mut changed = false;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quality" => match args.next().as_deref().and_then(QualityPreset::parse) {
                    Some(preset) => {
                        self.quality = preset;
                        changed = true;
                    }
                    None => log::warn!("--quality expects low, medium or high"),
                },
                "--reduced-motion" => {
                    self.reduced_motion = true;
                    changed = true;
                }
                "--show-fps" => {
                    self.show_fps = true;
                    changed = true;
                }
                other => log::warn!("Ignoring unknown argument {}", other),
            }
        }
        changed
    }

    /// Settings document location (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub const SETTINGS_FILE: &'static str = "data/settings.json";

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "space_flappy_settings";

    #[cfg(target_arch = "wasm32")]
    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// Read settings from LocalStorage, if any were saved
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = Self::local_storage()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok()?)
            .and_then(|json| serde_json::from_str(&json).ok());
        match stored {
            Some(settings) => {
                log::info!("Settings restored from LocalStorage");
                settings
            }
            None => Self::default(),
        }
    }

    /// Load settings from the settings file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(Self::SETTINGS_FILE)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save settings to the settings file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        self.save_to(Self::SETTINGS_FILE);
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) {
        let path = path.as_ref();
        let result = serde_json::to_string_pretty(self)
            .map_err(std::io::Error::other)
            .and_then(|json| {
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    std::fs::create_dir_all(dir)?;
                }
                std::fs::write(path, json)
            });
        match result {
            Ok(()) => log::debug!("Settings written to {}", path.display()),
            Err(e) => log::warn!("Could not save settings to {}: {}", path.display(), e),
        }
    }
}

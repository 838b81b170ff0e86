//! Session settings
//!
//! Loaded from a JSON file next to the host; every field has a default so a
//! partial file is valid.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::sim::input::{Action, Key};

/// One key -> action mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: Key,
    pub action: Action,
}

impl KeyBinding {
    pub const fn new(key: Key, action: Action) -> Self {
        Self { key, action }
    }
}

fn default_bindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding::new(Key::Left, Action::MoveLeft),
        KeyBinding::new(Key::Char('a'), Action::MoveLeft),
        KeyBinding::new(Key::Right, Action::MoveRight),
        KeyBinding::new(Key::Char('d'), Action::MoveRight),
        KeyBinding::new(Key::Space, Action::Special),
        KeyBinding::new(Key::Enter, Action::Confirm),
        KeyBinding::new(Key::Up, Action::MenuUp),
        KeyBinding::new(Key::Char('w'), Action::MenuUp),
        KeyBinding::new(Key::Down, Action::MenuDown),
        KeyBinding::new(Key::Char('s'), Action::MenuDown),
        KeyBinding::new(Key::Escape, Action::Quit),
    ]
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master RNG seed (None = seed from the OS)
    pub seed: Option<u64>,
    /// Sprite atlas handed to the atlas source
    pub atlas_path: String,

    // === Screen mapping ===
    /// World px -> screen px scale
    pub pixel_zoom: f32,
    /// Screen-space top-left corner of the playfield
    pub playfield_origin: Vec2,

    // === Gameplay ===
    pub starting_lives: i32,
    /// Start directly in gameplay instead of the title sequence
    pub skip_title: bool,
    pub bindings: Vec<KeyBinding>,

    // === Audio ===
    pub muted: bool,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            atlas_path: "assets/arcade_atlas.png".to_string(),

            pixel_zoom: 3.0,
            playfield_origin: Vec2::ZERO,

            starting_lives: crate::consts::STARTING_LIVES,
            skip_title: false,
            bindings: default_bindings(),

            muted: false,
            sfx_volume: 1.0,
        }
    }
}

impl Settings {
    /// Resolve the action bound to a key, if any
    pub fn action_for(&self, key: Key) -> Option<Action> {
        let key = key.normalized();
        self.bindings
            .iter()
            .find(|b| b.key.normalized() == key)
            .map(|b| b.action)
    }

    /// Clamp out-of-range values
    pub fn validated(mut self) -> Self {
        if !(self.pixel_zoom >= 1.0) {
            log::warn!("pixel_zoom {} out of range, using 1.0", self.pixel_zoom);
            self.pixel_zoom = 1.0;
        }
        if self.starting_lives < 0 {
            log::warn!("starting_lives {} out of range, using 0", self.starting_lives);
            self.starting_lives = 0;
        }
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Convert a screen-space point to playfield coordinates
    pub fn screen_to_world(&self, x: f32, y: f32) -> Vec2 {
        (Vec2::new(x, y) - self.playfield_origin) / self.pixel_zoom
    }

    /// Convert a playfield point to screen space
    pub fn world_to_screen(&self, pos: Vec2) -> Vec2 {
        pos * self.pixel_zoom + self.playfield_origin
    }

    /// Load settings from a JSON file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        Ok(settings.validated())
    }

    /// Load settings, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_path(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

//! Input translation
//!
//! Raw key and mouse events become a held-direction set, one-shot fire and
//! special pulses, and the most recent aim vector.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Host key, independent of any windowing library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Escape,
    Shift,
    Char(char),
}

impl Key {
    /// Letter keys compare case-insensitively
    pub fn normalized(self) -> Self {
        match self {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        }
    }
}

/// What a key does in this minigame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Special,
    Confirm,
    MenuUp,
    MenuDown,
    Quit,
}

/// Horizontal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    fn from_action(action: Action) -> Option<Self> {
        match action {
            Action::MoveLeft => Some(Direction::Left),
            Action::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Accumulates input between ticks
#[derive(Debug, Clone, Default)]
pub struct InputTranslator {
    /// Held directions in press order; only the first is acted on
    held: Vec<Direction>,
    /// Cursor in playfield coordinates
    cursor: Vec2,
    fire_pulse: bool,
    special_pulse: bool,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a bound action press. Returns true if the action was consumed
    /// as movement or special.
    pub fn press(&mut self, action: Action) -> bool {
        if let Some(dir) = Direction::from_action(action) {
            if !self.held.contains(&dir) {
                self.held.push(dir);
            }
            return true;
        }
        if action == Action::Special {
            self.special_pulse = true;
            return true;
        }
        false
    }

    pub fn release(&mut self, action: Action) {
        if let Some(dir) = Direction::from_action(action) {
            self.held.retain(|&d| d != dir);
        }
    }

    /// The direction acted on this frame
    pub fn active_direction(&self) -> Option<Direction> {
        self.held.first().copied()
    }

    pub fn held_directions(&self) -> &[Direction] {
        &self.held
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn set_cursor(&mut self, world: Vec2) {
        self.cursor = world;
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Request a shot toward the cursor at `world`
    pub fn trigger_fire(&mut self, world: Vec2) {
        self.cursor = world;
        self.fire_pulse = true;
    }

    pub fn trigger_special(&mut self) {
        self.special_pulse = true;
    }

    /// Consume the fire pulse
    pub fn take_fire(&mut self) -> bool {
        std::mem::take(&mut self.fire_pulse)
    }

    /// Consume the special pulse
    pub fn take_special(&mut self) -> bool {
        std::mem::take(&mut self.special_pulse)
    }

    /// Drop pending pulses (mode changes)
    pub fn clear_pulses(&mut self) {
        self.fire_pulse = false;
        self.special_pulse = false;
    }
}

/// Normalized vector from the weapon origin to the cursor
pub fn aim_vector(origin: Vec2, cursor: Vec2) -> Vec2 {
    (cursor - origin).normalize_or_zero()
}

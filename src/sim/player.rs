//! The player actor

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Special power kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerKind {
    #[default]
    None,
    /// Weak variant, used below full energy
    Normal,
    Megaton,
    Sulphur,
    Incense,
}

impl PowerKind {
    /// Strong variant for a world
    pub fn strong_for_world(world: u32) -> Self {
        match world % 3 {
            0 => PowerKind::Megaton,
            1 => PowerKind::Sulphur,
            _ => PowerKind::Incense,
        }
    }

    /// Pick the variant for the energy banked when the wind-up completes
    pub fn select(energy: i32, world: u32) -> Self {
        if energy >= ENERGY_MAX {
            Self::strong_for_world(world)
        } else {
            PowerKind::Normal
        }
    }

    /// Damage dealt to every enemy when the power activates
    pub fn damage(self) -> i32 {
        match self {
            PowerKind::None => 0,
            PowerKind::Normal => 2,
            PowerKind::Megaton | PowerKind::Sulphur | PowerKind::Incense => 6,
        }
    }

    /// Sprite row for the full-body power frames
    pub fn group(self) -> Option<usize> {
        match self {
            PowerKind::None => None,
            PowerKind::Normal => Some(0),
            PowerKind::Megaton => Some(1),
            PowerKind::Sulphur => Some(2),
            PowerKind::Incense => Some(3),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Sprite top-left
    pub pos: Vec2,
    pub health: i32,
    /// -1 means the run is over
    pub lives: i32,
    pub energy: i32,
    pub power: PowerKind,
    /// Last normalized aim (zero before the first shot)
    pub aim: Vec2,
    /// Sprite faces left
    pub mirrored: bool,
    /// Moved this frame
    pub moving: bool,
    /// Between death and respawn
    pub respawning: bool,
}

impl Player {
    pub fn new(lives: i32) -> Self {
        Self {
            pos: Self::start_position(),
            health: HEALTH_MAX,
            lives,
            energy: 0,
            power: PowerKind::None,
            aim: Vec2::ZERO,
            mirrored: false,
            moving: false,
            respawning: false,
        }
    }

    /// Bottom-centre of the playfield
    pub fn start_position() -> Vec2 {
        Vec2::new(
            (PLAYFIELD_WIDTH - PLAYER_WIDTH) / 2.0,
            PLAYFIELD_HEIGHT - PLAYER_HEIGHT,
        )
    }

    /// Hitbox: the lower two-thirds of the sprite
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.pos + Vec2::new(0.0, PLAYER_HITBOX_OFFSET_Y),
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT - PLAYER_HITBOX_OFFSET_Y),
        )
    }

    pub fn weapon_origin(&self) -> Vec2 {
        self.pos + WEAPON_ORIGIN
    }

    /// Apply damage; returns true if the player survives
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health = (self.health - amount.max(0)).max(0);
        self.health > 0
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).clamp(0, HEALTH_MAX);
    }

    pub fn add_energy(&mut self, amount: i32) {
        self.energy = (self.energy + amount).clamp(0, ENERGY_MAX);
    }

    /// Move horizontally, staying inside the playfield
    pub fn move_by(&mut self, dx: f32) {
        self.pos.x = (self.pos.x + dx).clamp(0.0, PLAYFIELD_WIDTH - PLAYER_WIDTH);
    }

    /// Restore health for a new life; lives and energy are untouched
    pub fn respawn(&mut self) {
        self.health = HEALTH_MAX;
        self.respawning = false;
    }
}

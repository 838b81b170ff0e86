//! Sprite atlas coordinate table
//!
//! Every region of the 512x768 atlas is a compile-time constant. Layout:
//! - y 0..120:   player full-body frames (idle, wind-up, four power rows)
//! - y 120..168: player torso / legs / arms parts
//! - y 168..296: bullets, enemies, powerups, HUD, transient effects
//! - y 296..504: title and game-over art
//! - x 256..512: playfield backdrop (top) and world-complete scroll (below)

use serde::{Deserialize, Serialize};

use crate::sim::entities::{BulletKind, EffectKind, EnemyKind, PowerupKind};

pub const ATLAS_WIDTH: u16 = 512;
pub const ATLAS_HEIGHT: u16 = 768;

/// A sub-rectangle of the atlas in texels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteRegion {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl SpriteRegion {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Same-size frame `index` steps to the right
    pub const fn frame(self, index: u16) -> Self {
        Self::new(self.x + self.w * index, self.y, self.w, self.h)
    }

    /// Frame `index` of a strip wrapped into rows of `columns` frames
    pub const fn grid_frame(self, index: u16, columns: u16) -> Self {
        Self::new(
            self.x + self.w * (index % columns),
            self.y + self.h * (index / columns),
            self.w,
            self.h,
        )
    }

    pub const fn overlaps(self, other: Self) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Cursor sprite patched into the host while the session runs
pub const CROSSHAIR: SpriteRegion = SpriteRegion::new(240, 0, 16, 16);

// Player full-body frames (16x24)
pub const PLAYER_IDLE: SpriteRegion = SpriteRegion::new(0, 0, 16, 24);
pub const PLAYER_WINDUP: [SpriteRegion; 2] = [
    SpriteRegion::new(16, 0, 16, 24),
    SpriteRegion::new(32, 0, 16, 24),
];
/// Rows by power group, columns by power phase
pub const PLAYER_POWER: [[SpriteRegion; 3]; 4] = [
    power_row(24),
    power_row(48),
    power_row(72),
    power_row(96),
];

const fn power_row(y: u16) -> [SpriteRegion; 3] {
    [
        SpriteRegion::new(0, y, 16, 24),
        SpriteRegion::new(16, y, 16, 24),
        SpriteRegion::new(32, y, 16, 24),
    ]
}

// Player parts (16x12)
pub const TORSO_RUN: SpriteRegion = SpriteRegion::new(0, 120, 16, 12);
pub const TORSO_FIRE_RUN: SpriteRegion = SpriteRegion::new(16, 120, 16, 12);
pub const TORSO_FIRE_STAND_UP: SpriteRegion = SpriteRegion::new(32, 120, 16, 12);
pub const TORSO_FIRE_STAND_SIDE: SpriteRegion = SpriteRegion::new(48, 120, 16, 12);

pub const LEGS_RUN: SpriteRegion = SpriteRegion::new(0, 132, 16, 12);
pub const LEGS_RUN_FRAMES: u16 = 4;
pub const LEGS_STAND_FIRE: SpriteRegion = SpriteRegion::new(64, 132, 16, 12);

/// Arm frames by vertical aim bucket, aiming the way the sprite faces
pub const ARMS_FORWARD: SpriteRegion = SpriteRegion::new(0, 144, 16, 12);
/// Arm frames by vertical aim bucket, aiming behind the sprite
pub const ARMS_BACKWARD: SpriteRegion = SpriteRegion::new(0, 156, 16, 12);

// Projectiles (16x16 cells)
pub const BULLET_PLAYER: SpriteRegion = SpriteRegion::new(0, 168, 16, 16);
pub const BULLET_HOSTILE: SpriteRegion = SpriteRegion::new(16, 168, 16, 16);
pub const BULLET_BOMB: SpriteRegion = SpriteRegion::new(32, 168, 16, 16);
pub const BULLET_ENERGY: SpriteRegion = SpriteRegion::new(48, 168, 16, 16);

pub const ENEMY_PLACEHOLDER: SpriteRegion = SpriteRegion::new(0, 184, 16, 16);

pub const POWERUP_CAKE: SpriteRegion = SpriteRegion::new(0, 200, 16, 16);
pub const POWERUP_LIFE: SpriteRegion = SpriteRegion::new(16, 200, 16, 16);
pub const POWERUP_ENERGY: SpriteRegion = SpriteRegion::new(32, 200, 16, 16);

// HUD
pub const HUD_HEART: SpriteRegion = SpriteRegion::new(64, 200, 8, 8);
pub const HUD_HEART_EMPTY: SpriteRegion = SpriteRegion::new(72, 200, 8, 8);
pub const HUD_LIFE: SpriteRegion = SpriteRegion::new(80, 200, 8, 8);
pub const HUD_ENERGY_FRAME: SpriteRegion = SpriteRegion::new(96, 200, 64, 8);
pub const HUD_ENERGY_FILL: SpriteRegion = SpriteRegion::new(96, 208, 64, 8);

// Transient effects
pub const EFFECT_DEATH_PUFF: SpriteRegion = SpriteRegion::new(0, 216, 16, 16);
pub const EFFECT_GAME_OVER_BURST: SpriteRegion = SpriteRegion::new(0, 232, 32, 32);
/// Effect strips wrap after this many frames
pub const EFFECT_COLUMNS: u16 = 5;

// Backdrops
pub const BACKGROUND: SpriteRegion = SpriteRegion::new(256, 0, 256, 256);
pub const WORLD_COMPLETE_SCROLL: SpriteRegion = SpriteRegion::new(256, 256, 256, 512);

// Title sequence
pub const TITLE_LIGHTSHAFT: SpriteRegion = SpriteRegion::new(0, 296, 256, 64);
pub const TITLE_BANNER: SpriteRegion = SpriteRegion::new(0, 360, 160, 48);
pub const TITLE_TEXT: [SpriteRegion; 3] = [
    SpriteRegion::new(0, 408, 160, 16),
    SpriteRegion::new(0, 424, 160, 16),
    SpriteRegion::new(0, 440, 160, 16),
];

// Game over prompt
pub const GAME_OVER_TEXT: SpriteRegion = SpriteRegion::new(0, 456, 128, 24);
pub const GAME_OVER_RETRY: SpriteRegion = SpriteRegion::new(0, 480, 48, 16);
pub const GAME_OVER_QUIT: SpriteRegion = SpriteRegion::new(48, 480, 48, 16);
pub const GAME_OVER_POINTER: SpriteRegion = SpriteRegion::new(96, 480, 8, 8);

pub fn bullet_sprite(kind: BulletKind) -> SpriteRegion {
    match kind {
        BulletKind::Player => BULLET_PLAYER,
        BulletKind::Bullet => BULLET_HOSTILE,
        BulletKind::Bomb => BULLET_BOMB,
        BulletKind::Energy => BULLET_ENERGY,
    }
}

pub fn enemy_sprite(kind: EnemyKind) -> SpriteRegion {
    match kind {
        EnemyKind::Unassigned => ENEMY_PLACEHOLDER,
    }
}

pub fn powerup_sprite(kind: PowerupKind) -> SpriteRegion {
    match kind {
        PowerupKind::Cake => POWERUP_CAKE,
        PowerupKind::Life => POWERUP_LIFE,
        PowerupKind::Energy => POWERUP_ENERGY,
    }
}

pub fn effect_sprite(kind: EffectKind, frame: u32) -> SpriteRegion {
    let base = match kind {
        EffectKind::DeathPuff => EFFECT_DEATH_PUFF,
        EffectKind::GameOverBurst => EFFECT_GAME_OVER_BURST,
    };
    base.grid_frame(frame.min(kind.frame_count() - 1) as u16, EFFECT_COLUMNS)
}

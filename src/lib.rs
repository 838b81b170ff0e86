//! Light-gun arcade shooter minigame
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (player, entities, collisions, cutscenes)
//! - `renderer`: Sprite atlas coordinate table and the draw surface seam
//! - `session`: Host-facing orchestrator (tick/draw/input)
//! - `settings`: JSON configuration
//! - `audio`: Named sound cues and the host audio seam
//! - `assets`: Atlas loading seam
//! - `host`: The contract the surrounding application drives

pub mod assets;
pub mod audio;
pub mod error;
pub mod host;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{AssetError, SessionError, SettingsError};
pub use host::Minigame;
pub use session::ArcadeSession;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Reference frame length; per-frame speeds are scaled by elapsed / FRAME_MS
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Playfield dimensions (world px)
    pub const PLAYFIELD_WIDTH: f32 = 256.0;
    pub const PLAYFIELD_HEIGHT: f32 = 256.0;

    /// Player sprite size
    pub const PLAYER_WIDTH: f32 = 16.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;
    /// Hitbox covers the lower two-thirds of the sprite
    pub const PLAYER_HITBOX_OFFSET_Y: f32 = PLAYER_HEIGHT / 3.0;
    /// Weapon origin relative to the sprite's top-left (upper torso)
    pub const WEAPON_ORIGIN: Vec2 = Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 3.0);
    /// Horizontal speed (px per frame)
    pub const PLAYER_SPEED: f32 = 2.0;

    pub const HEALTH_MAX: i32 = 3;
    pub const ENERGY_MAX: i32 = 100;
    /// Minimum energy to start the special power
    pub const ENERGY_THRESHOLD_LOW: i32 = 50;
    pub const STARTING_LIVES: i32 = 1;

    /// Damage dealt by a player bullet to an enemy
    pub const PLAYER_DAMAGE: i32 = 1;
    /// Damage dealt by a hostile bullet to the player
    pub const ENEMY_DAMAGE: i32 = 1;
    pub const ENEMY_DEFAULT_HEALTH: i32 = 3;
    pub const ENEMY_SIZE: f32 = 16.0;

    /// Bullets spawn this many frames of travel ahead of the weapon origin
    pub const BULLET_LEAD_FRAMES: f32 = 5.0;

    /// Timers (ms)
    pub const FIRE_DELAY_MS: i32 = 250;
    pub const INVINCIBILITY_MS: i32 = 2000;
    pub const DEATH_DELAY_MS: i32 = 1500;
    pub const GAME_OVER_DELAY_FACTOR: i32 = 3;
    pub const SCREEN_FLASH_MS: i32 = 150;
    pub const ENEMY_FLASH_MS: i32 = 100;
    pub const RESTART_DELAY_MS: i32 = 1000;
    pub const GAME_OVER_AUTO_RESTART_MS: i32 = 10_000;
    pub const GAME_OVER_BLINK_MS: i32 = 500;
    pub const WORLD_COMPLETE_MS: i32 = 6000;
    pub const STAGE_DURATION_MS: i32 = 60_000;
    pub const STAGES_PER_WORLD: u32 = 4;
    /// Invincibility flicker half-period
    pub const FLICKER_HALF_PERIOD_MS: i32 = 100;

    /// Special power wind-up: phase 0 -> 1, then power selection
    pub const SPECIAL_TRIGGER_THRESHOLDS_MS: [i32; 2] = [500, 1000];
    /// Active power: activate -> glow -> cooldown -> end
    pub const POWER_ACTIVE_THRESHOLDS_MS: [i32; 3] = [400, 2400, 3200];

    /// Title sequence per-phase durations; phase 5 is terminal
    pub const TITLE_PHASE_MS: [i32; 5] = [4000, 2500, 1200, 1200, 1200];
    pub const TITLE_TERMINAL_PHASE: u8 = 5;

    pub const POWERUP_SIZE: f32 = 16.0;
    pub const ENERGY_PICKUP_AMOUNT: i32 = 25;
}

/// Scale a per-frame speed to the elapsed time of this tick
#[inline]
pub fn frames_elapsed(elapsed_ms: i32) -> f32 {
    elapsed_ms.max(0) as f32 / consts::FRAME_MS
}

/// Normalize a vector, falling back to `fallback` when it has no direction
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let n = v.normalize_or_zero();
    if n == Vec2::ZERO { fallback } else { n }
}

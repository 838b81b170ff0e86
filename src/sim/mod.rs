//! Frame-stepped simulation
//!
//! All gameplay logic lives here. This module stays free of drawing and
//! host concerns:
//! - Time advances only through `tick` with an elapsed-millisecond count
//! - Randomness comes from the run's seeded RNG
//! - Removal during iteration never skips an element

pub mod animation;
pub mod collision;
pub mod cutscene;
pub mod entities;
pub mod input;
pub mod loot;
pub mod player;
pub mod stage;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::Rect;
pub use cutscene::{CutsceneDirector, GameOverOption, Mode, Transition};
pub use entities::{
    Bullet, BulletKind, EffectKind, EffectSignal, Enemy, EnemyKind, EntityStore, Powerup,
    PowerupKind, Side, TransientEffect,
};
pub use input::{Action, Direction, InputTranslator, Key};
pub use player::{Player, PowerKind};
pub use state::{Playthrough, Snapshot, Stats};
pub use tick::{TickOutcome, playfield, tick};
pub use timers::TimerBank;

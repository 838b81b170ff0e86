//! Bullets, enemies, powerups and transient effects, plus the store that
//! owns them for one playthrough.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::timers::Countdown;
use crate::consts::*;
use crate::frames_elapsed;

/// Bullet type; selects speed, size and spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletKind {
    Player,
    Bullet,
    Bomb,
    Energy,
}

impl BulletKind {
    /// Travel speed (px per frame)
    pub fn speed(self) -> f32 {
        match self {
            BulletKind::Player => 6.0,
            BulletKind::Bullet => 3.0,
            BulletKind::Bomb => 2.0,
            BulletKind::Energy => 4.0,
        }
    }

    /// Square hitbox edge (px)
    pub fn size(self) -> f32 {
        match self {
            BulletKind::Player => 6.0,
            BulletKind::Bullet => 6.0,
            BulletKind::Bomb => 10.0,
            BulletKind::Energy => 8.0,
        }
    }

    /// Rotation per frame (radians)
    pub fn spin(self) -> f32 {
        match self {
            BulletKind::Player | BulletKind::Bullet => 0.0,
            BulletKind::Bomb => 0.1,
            BulletKind::Energy => 0.25,
        }
    }
}

/// Which side fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Hostile,
}

/// A projectile. `pos` is the centre.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Unit motion vector
    pub motion: Vec2,
    /// Radians
    pub rotation: f32,
    pub kind: BulletKind,
    pub owner: Side,
}

impl Bullet {
    pub fn new(pos: Vec2, motion: Vec2, kind: BulletKind, owner: Side) -> Self {
        let motion = motion.normalize_or_zero();
        Self {
            pos,
            motion,
            rotation: motion.y.atan2(motion.x),
            kind,
            owner,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(self.kind.size()))
    }

    pub fn update(&mut self, elapsed_ms: i32) {
        let frames = frames_elapsed(elapsed_ms);
        self.pos += self.motion * self.kind.speed() * frames;
        self.rotation += self.kind.spin() * frames;
    }
}

/// Enemy species. No species behaviour exists yet; the single variant
/// stands in until spawn tables name real ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Unassigned,
}

/// An enemy actor. `pos` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub health: i32,
    pub kind: EnemyKind,
    /// Hit flash tint
    pub flash: Countdown,
}

impl Enemy {
    pub fn new(pos: Vec2, kind: EnemyKind) -> Self {
        Self {
            pos,
            size: Vec2::splat(ENEMY_SIZE),
            health: ENEMY_DEFAULT_HEALTH,
            kind,
            flash: Countdown::default(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Apply damage; returns true while the enemy survives
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health = (self.health - amount).max(0);
        self.flash.set(ENEMY_FLASH_MS);
        self.health > 0
    }

    /// Enemies have no behaviour yet beyond the hit flash
    pub fn update(&mut self, elapsed_ms: i32) {
        self.flash.tick(elapsed_ms);
    }
}

/// Powerup type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Restores one health
    Cake,
    /// Grants one life
    Life,
    /// Adds energy
    Energy,
}

impl PowerupKind {
    /// Time on the field before it vanishes (ms)
    pub fn duration_ms(self) -> i32 {
        match self {
            PowerupKind::Cake => 6000,
            PowerupKind::Life => 8000,
            PowerupKind::Energy => 6000,
        }
    }
}

/// A collectible dropped by a dead enemy. `pos` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub remaining: Countdown,
}

impl Powerup {
    /// Spawn centred on `center`
    pub fn new(kind: PowerupKind, center: Vec2) -> Self {
        let mut remaining = Countdown::default();
        remaining.set(kind.duration_ms());
        Self {
            kind,
            pos: center - Vec2::splat(POWERUP_SIZE / 2.0),
            remaining,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(POWERUP_SIZE))
    }

    /// Returns false once the duration has run out
    pub fn update(&mut self, elapsed_ms: i32) -> bool {
        !self.remaining.tick(elapsed_ms) && self.remaining.is_active()
    }
}

/// Visual flourish played once and discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    DeathPuff,
    GameOverBurst,
}

impl EffectKind {
    pub fn frame_count(self) -> u32 {
        match self {
            EffectKind::DeathPuff => 4,
            EffectKind::GameOverBurst => 10,
        }
    }

    pub fn frame_ms(self) -> i32 {
        match self {
            EffectKind::DeathPuff => 100,
            EffectKind::GameOverBurst => 180,
        }
    }

    pub fn duration_ms(self) -> i32 {
        self.frame_count() as i32 * self.frame_ms()
    }
}

/// What the session should do when an effect finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectSignal {
    /// Decide between respawn and game over
    GameOverCheck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransientEffect {
    pub kind: EffectKind,
    pub pos: Vec2,
    pub elapsed_ms: i32,
    pub on_complete: Option<EffectSignal>,
}

impl TransientEffect {
    pub fn new(kind: EffectKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            elapsed_ms: 0,
            on_complete: None,
        }
    }

    pub fn with_signal(mut self, signal: EffectSignal) -> Self {
        self.on_complete = Some(signal);
        self
    }

    /// Advance playback; returns true once the last frame has played
    pub fn update(&mut self, elapsed_ms: i32) -> bool {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms.max(0));
        self.elapsed_ms >= self.kind.duration_ms()
    }

    pub fn current_frame(&self) -> u32 {
        ((self.elapsed_ms / self.kind.frame_ms()) as u32).min(self.kind.frame_count() - 1)
    }
}

/// Every mutable collection of one playthrough
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    pub player_bullets: Vec<Bullet>,
    pub hostile_bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<Powerup>,
    pub effects: Vec<TransientEffect>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bullet(&mut self, bullet: Bullet) {
        match bullet.owner {
            Side::Player => self.player_bullets.push(bullet),
            Side::Hostile => self.hostile_bullets.push(bullet),
        }
    }

    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    pub fn add_powerup(&mut self, powerup: Powerup) {
        self.powerups.push(powerup);
    }

    pub fn add_effect(&mut self, effect: TransientEffect) {
        self.effects.push(effect);
    }

    /// Move every bullet, then drop any that left the playfield
    pub fn update_bullets(&mut self, elapsed_ms: i32, playfield: Rect) -> usize {
        let before = self.player_bullets.len() + self.hostile_bullets.len();
        for bullets in [&mut self.player_bullets, &mut self.hostile_bullets] {
            for bullet in bullets.iter_mut() {
                bullet.update(elapsed_ms);
            }
            bullets.retain(|b| playfield.contains_point(b.pos));
        }
        before - self.player_bullets.len() - self.hostile_bullets.len()
    }

    pub fn update_enemies(&mut self, elapsed_ms: i32) {
        for enemy in &mut self.enemies {
            enemy.update(elapsed_ms);
        }
    }

    /// Count down powerups and drop expired ones
    pub fn update_powerups(&mut self, elapsed_ms: i32) {
        self.powerups.retain_mut(|p| p.update(elapsed_ms));
    }

    /// Advance effects, discard finished ones, and return their signals
    pub fn update_effects(&mut self, elapsed_ms: i32) -> Vec<EffectSignal> {
        let mut signals = Vec::new();
        self.effects.retain_mut(|effect| {
            if effect.update(elapsed_ms) {
                if let Some(signal) = effect.on_complete {
                    signals.push(signal);
                }
                false
            } else {
                true
            }
        });
        signals
    }

    pub fn clear_hostile_bullets(&mut self) {
        self.hostile_bullets.clear();
    }

    /// Stop all combat: enemies and every bullet go away
    pub fn halt_combat(&mut self) {
        self.enemies.clear();
        self.player_bullets.clear();
        self.hostile_bullets.clear();
    }

    /// Whether an effect that will emit `signal` is still playing
    pub fn has_pending(&self, signal: EffectSignal) -> bool {
        self.effects.iter().any(|e| e.on_complete == Some(signal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playfield() -> Rect {
        Rect::new(Vec2::ZERO, Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT))
    }

    #[test]
    fn test_bullet_moves_by_speed() {
        let mut bullet = Bullet::new(Vec2::new(100.0, 100.0), Vec2::new(0.0, -2.0), BulletKind::Player, Side::Player);
        assert_eq!(bullet.motion, Vec2::new(0.0, -1.0));
        bullet.update(FRAME_MS as i32 + 1);
        assert!(bullet.pos.y < 100.0 - BulletKind::Player.speed() + 0.01);
    }

    #[test]
    fn test_bullets_leaving_playfield_removed() {
        let mut store = EntityStore::new();
        // One bullet per edge, each one step from leaving
        let edges = [
            (Vec2::new(1.0, 128.0), Vec2::NEG_X),
            (Vec2::new(255.0, 128.0), Vec2::X),
            (Vec2::new(128.0, 1.0), Vec2::NEG_Y),
            (Vec2::new(128.0, 255.0), Vec2::Y),
        ];
        for (pos, dir) in edges {
            store.add_bullet(Bullet::new(pos, dir, BulletKind::Bullet, Side::Hostile));
        }
        store.add_bullet(Bullet::new(Vec2::splat(128.0), Vec2::X, BulletKind::Player, Side::Player));

        let removed = store.update_bullets(17, playfield());
        assert_eq!(removed, 4);
        assert!(store.hostile_bullets.is_empty());
        assert_eq!(store.player_bullets.len(), 1);
    }

    #[test]
    fn test_consecutive_removals_skip_nothing() {
        let mut store = EntityStore::new();
        for _ in 0..6 {
            store.add_bullet(Bullet::new(Vec2::new(255.0, 10.0), Vec2::X, BulletKind::Player, Side::Player));
        }
        store.update_bullets(17, playfield());
        assert!(store.player_bullets.is_empty());
    }

    #[test]
    fn test_enemy_damage_floors_at_zero() {
        let mut enemy = Enemy::new(Vec2::ZERO, EnemyKind::Unassigned);
        assert!(enemy.take_damage(1));
        assert!(enemy.flash.is_active());
        assert!(!enemy.take_damage(10));
        assert_eq!(enemy.health, 0);
    }

    #[test]
    fn test_powerup_expires() {
        let mut store = EntityStore::new();
        store.add_powerup(Powerup::new(PowerupKind::Cake, Vec2::splat(50.0)));
        store.update_powerups(PowerupKind::Cake.duration_ms() - 1);
        assert_eq!(store.powerups.len(), 1);
        store.update_powerups(1);
        assert!(store.powerups.is_empty());
    }

    #[test]
    fn test_effect_signal_on_completion() {
        let mut store = EntityStore::new();
        store.add_effect(TransientEffect::new(EffectKind::DeathPuff, Vec2::ZERO));
        store.add_effect(
            TransientEffect::new(EffectKind::GameOverBurst, Vec2::ZERO)
                .with_signal(EffectSignal::GameOverCheck),
        );

        let signals = store.update_effects(EffectKind::DeathPuff.duration_ms());
        assert!(signals.is_empty());
        assert_eq!(store.effects.len(), 1);
        assert!(store.has_pending(EffectSignal::GameOverCheck));

        let signals = store.update_effects(EffectKind::GameOverBurst.duration_ms());
        assert_eq!(signals, vec![EffectSignal::GameOverCheck]);
        assert!(store.effects.is_empty());
    }

    #[test]
    fn test_effect_frame_clamped() {
        let mut effect = TransientEffect::new(EffectKind::DeathPuff, Vec2::ZERO);
        effect.update(250);
        assert_eq!(effect.current_frame(), 2);
        effect.update(10_000);
        assert_eq!(effect.current_frame(), 3);
    }
}

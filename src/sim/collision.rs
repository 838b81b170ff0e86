//! Axis-aligned collision
//!
//! Every test is a plain box overlap; bullets are slow enough relative to
//! actor size that no swept test is needed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::{EntityStore, PowerupKind};

/// Axis-aligned rectangle (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size / 2.0, size)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Overlap test; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }

    /// Half-open containment: [min, max)
    pub fn contains_point(&self, p: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y
    }
}

/// Outcome of resolving player bullets against enemies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerBulletReport {
    pub hits: u32,
    /// Centres of enemies destroyed this frame (loot spawn points)
    pub kills: Vec<Vec2>,
}

/// Test every player bullet against every enemy. A bullet is consumed by
/// the first enemy it hits; dead enemies are removed immediately so later
/// bullets in the same frame cannot hit them.
pub fn resolve_player_bullets(store: &mut EntityStore, damage: i32) -> PlayerBulletReport {
    let mut report = PlayerBulletReport::default();

    // Reverse index order so removals never skip an element
    let mut b = store.player_bullets.len();
    while b > 0 {
        b -= 1;
        let bullet_box = store.player_bullets[b].bounds();

        let mut e = store.enemies.len();
        while e > 0 {
            e -= 1;
            if !store.enemies[e].bounds().intersects(&bullet_box) {
                continue;
            }
            report.hits += 1;
            if !store.enemies[e].take_damage(damage) {
                let dead = store.enemies.remove(e);
                report.kills.push(dead.center());
            }
            store.player_bullets.remove(b);
            break;
        }
    }

    report
}

/// Remove the first hostile bullet overlapping `target`. Returns true on hit.
pub fn take_hostile_hit(store: &mut EntityStore, target: &Rect) -> bool {
    match store
        .hostile_bullets
        .iter()
        .rposition(|bullet| bullet.bounds().intersects(target))
    {
        Some(index) => {
            store.hostile_bullets.remove(index);
            true
        }
        None => false,
    }
}

/// Remove every powerup overlapping `target` and return what was collected
pub fn collect_powerups(store: &mut EntityStore, target: &Rect) -> Vec<PowerupKind> {
    let mut collected = Vec::new();
    store.powerups.retain(|powerup| {
        if powerup.bounds().intersects(target) {
            collected.push(powerup.kind);
            false
        } else {
            true
        }
    });
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Bullet, BulletKind, Enemy, EnemyKind, Powerup, Side};

    fn enemy_at(x: f32, y: f32, health: i32) -> Enemy {
        let mut enemy = Enemy::new(Vec2::new(x, y), EnemyKind::Unassigned);
        enemy.health = health;
        enemy
    }

    fn player_bullet_at(x: f32, y: f32) -> Bullet {
        Bullet::new(Vec2::new(x, y), Vec2::NEG_Y, BulletKind::Player, Side::Player)
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        assert!(a.intersects(&Rect::new(Vec2::splat(5.0), Vec2::splat(10.0))));
        assert!(!a.intersects(&Rect::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0))));
        assert!(!a.intersects(&Rect::new(Vec2::new(0.0, 20.0), Vec2::splat(10.0))));
    }

    #[test]
    fn test_rect_contains_point() {
        let r = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        assert!(r.contains_point(Vec2::ZERO));
        assert!(!r.contains_point(Vec2::new(10.0, 5.0)));
        assert!(!r.contains_point(Vec2::new(-0.1, 5.0)));
    }

    #[test]
    fn test_bullet_kills_enemy() {
        let mut store = EntityStore::new();
        store.add_enemy(enemy_at(100.0, 100.0, 1));
        store.add_bullet(player_bullet_at(108.0, 108.0));

        let report = resolve_player_bullets(&mut store, 1);
        assert_eq!(report.hits, 1);
        assert_eq!(report.kills, vec![Vec2::new(108.0, 108.0)]);
        assert!(store.enemies.is_empty());
        assert!(store.player_bullets.is_empty());
    }

    #[test]
    fn test_every_pair_is_checked() {
        let mut store = EntityStore::new();
        // Two enemies; the bullets only overlap the first one added
        store.add_enemy(enemy_at(20.0, 20.0, 5));
        store.add_enemy(enemy_at(200.0, 200.0, 5));
        for _ in 0..3 {
            store.add_bullet(player_bullet_at(28.0, 28.0));
        }
        store.add_bullet(player_bullet_at(150.0, 150.0));

        let report = resolve_player_bullets(&mut store, 1);
        assert_eq!(report.hits, 3);
        assert_eq!(store.enemies[0].health, 2);
        assert_eq!(store.enemies[1].health, 5);
        assert_eq!(store.player_bullets.len(), 1);
    }

    #[test]
    fn test_dead_enemy_not_hit_twice() {
        let mut store = EntityStore::new();
        store.add_enemy(enemy_at(20.0, 20.0, 1));
        store.add_bullet(player_bullet_at(28.0, 28.0));
        store.add_bullet(player_bullet_at(28.0, 28.0));

        let report = resolve_player_bullets(&mut store, 1);
        assert_eq!(report.hits, 1);
        assert_eq!(report.kills.len(), 1);
        assert_eq!(store.player_bullets.len(), 1);
    }

    #[test]
    fn test_hostile_hit_removes_one_bullet() {
        let mut store = EntityStore::new();
        let target = Rect::new(Vec2::new(100.0, 100.0), Vec2::splat(16.0));
        for _ in 0..2 {
            store.add_bullet(Bullet::new(Vec2::new(108.0, 108.0), Vec2::Y, BulletKind::Bullet, Side::Hostile));
        }
        store.add_bullet(Bullet::new(Vec2::new(10.0, 10.0), Vec2::Y, BulletKind::Bullet, Side::Hostile));

        assert!(take_hostile_hit(&mut store, &target));
        assert_eq!(store.hostile_bullets.len(), 2);
        assert!(take_hostile_hit(&mut store, &target));
        assert!(!take_hostile_hit(&mut store, &target));
        assert_eq!(store.hostile_bullets.len(), 1);
    }

    #[test]
    fn test_collect_powerups() {
        let mut store = EntityStore::new();
        store.add_powerup(Powerup::new(PowerupKind::Life, Vec2::new(50.0, 50.0)));
        store.add_powerup(Powerup::new(PowerupKind::Cake, Vec2::new(200.0, 50.0)));
        let target = Rect::new(Vec2::new(45.0, 45.0), Vec2::splat(16.0));

        assert_eq!(collect_powerups(&mut store, &target), vec![PowerupKind::Life]);
        assert_eq!(store.powerups.len(), 1);
    }
}

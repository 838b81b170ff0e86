//! Playthrough state
//!
//! Everything one run of the arcade owns. A restart builds a new
//! `Playthrough`; nothing carries over from the previous one.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cutscene::{CutsceneDirector, Mode};
use super::entities::{
    Bullet, BulletKind, EffectKind, EffectSignal, EntityStore, Powerup, PowerupKind, Side,
    TransientEffect,
};
use super::input::{InputTranslator, aim_vector};
use super::loot::roll_loot;
use super::player::{Player, PowerKind};
use super::stage::StageProgress;
use super::timers::TimerBank;
use crate::audio::SoundCue;
use crate::consts::*;
use crate::normalize_or;

/// Shot accounting for the score readout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub shots_fired: u32,
    pub hits: u32,
    pub kills: u32,
}

impl Stats {
    /// Hits per shot, 0 before the first shot
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.hits as f32 / self.shots_fired as f32
        }
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct Playthrough {
    /// Seed this run's RNG was built from
    pub seed: u64,
    pub player: Player,
    pub entities: EntityStore,
    pub timers: TimerBank,
    pub director: CutsceneDirector,
    pub progress: StageProgress,
    pub input: InputTranslator,
    pub stats: Stats,
    /// Set once the final death animation has finished
    pub game_over: bool,
    pub(crate) rng: Pcg32,
    cues: Vec<SoundCue>,
}

impl Playthrough {
    pub fn new(seed: u64, lives: i32, show_title: bool) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut progress = StageProgress::new();
        progress.load_stage(&mut rng);

        Self {
            seed,
            player: Player::new(lives),
            entities: EntityStore::new(),
            timers: TimerBank::new(),
            director: if show_title {
                CutsceneDirector::title()
            } else {
                CutsceneDirector::playing()
            },
            progress,
            input: InputTranslator::new(),
            stats: Stats::default(),
            game_over: false,
            rng,
            cues: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.director.mode()
    }

    pub(crate) fn cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    /// Sound cues raised since the last call
    pub fn take_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    /// Player can act: gameplay mode, alive, no special sequence
    pub fn player_has_control(&self) -> bool {
        self.director.is_playing()
            && !self.player.respawning
            && !self.game_over
            && !self.timers.special_sequence_active()
    }

    /// Every gate on the trigger
    pub fn can_fire(&self) -> bool {
        self.player_has_control()
            && !self.timers.respawn.is_active()
            && !self.timers.restart.is_active()
            && self.timers.can_fire()
    }

    /// Spawn a player bullet toward the cursor
    pub fn fire(&mut self) {
        let origin = self.player.weapon_origin();
        let previous = normalize_or(self.player.aim, Vec2::NEG_Y);
        let aim = normalize_or(aim_vector(origin, self.input.cursor()), previous);
        self.player.aim = aim;

        let kind = BulletKind::Player;
        let spawn = origin + aim * kind.speed() * BULLET_LEAD_FRAMES;
        self.entities
            .add_bullet(Bullet::new(spawn, aim, kind, Side::Player));

        self.timers.fire.set(FIRE_DELAY_MS);
        if !self.player.moving {
            self.player.mirrored = aim.x < 0.0;
        }
        self.stats.shots_fired += 1;
        self.cue(SoundCue::Fire);
    }

    /// Start the special-power wind-up if energy allows
    pub fn try_start_special(&mut self) -> bool {
        if !self.player_has_control() || self.player.energy < ENERGY_THRESHOLD_LOW {
            return false;
        }
        self.timers.special_trigger.start();
        self.cue(SoundCue::SpecialCharge);
        log::debug!("Special wind-up started at {} energy", self.player.energy);
        true
    }

    /// Advance the special sequence. Returns true while it is running.
    pub fn update_special(&mut self, elapsed_ms: i32) -> bool {
        if self.timers.special_trigger.is_running() {
            let span = self.timers.special_trigger.advance(elapsed_ms);
            if span.crossed(SPECIAL_TRIGGER_THRESHOLDS_MS[1]) {
                self.timers.special_trigger.stop();
                self.player.power = PowerKind::select(self.player.energy, self.progress.world);
                self.timers.power_active.start();
                log::debug!("Power {:?} selected", self.player.power);
            }
            return true;
        }

        if self.timers.power_active.is_running() {
            let span = self.timers.power_active.advance(elapsed_ms);
            if span.crossed(POWER_ACTIVE_THRESHOLDS_MS[0]) {
                self.release_power();
            }
            if span.crossed(POWER_ACTIVE_THRESHOLDS_MS[2]) {
                self.timers.power_active.stop();
                self.player.power = PowerKind::None;
                self.player.energy = 0;
                log::debug!("Power ended");
                return false;
            }
            return true;
        }

        false
    }

    /// The power's one-shot effect: clear hostile fire, damage every enemy
    fn release_power(&mut self) {
        let damage = self.player.power.damage();
        self.entities.clear_hostile_bullets();

        let mut kills = Vec::new();
        let mut i = self.entities.enemies.len();
        while i > 0 {
            i -= 1;
            if !self.entities.enemies[i].take_damage(damage) {
                kills.push(self.entities.enemies.remove(i).center());
            }
        }
        for center in kills {
            self.on_enemy_killed(center);
        }
        self.cue(SoundCue::SpecialActivate);
    }

    /// Enemy death bookkeeping and loot roll
    pub fn on_enemy_killed(&mut self, center: Vec2) {
        self.stats.kills += 1;
        self.cue(SoundCue::EnemyDeath);
        if let Some(kind) = roll_loot(&mut self.rng) {
            log::debug!("Loot drop {:?} at {:?}", kind, center);
            self.entities.add_powerup(Powerup::new(kind, center));
        }
    }

    pub fn apply_powerup(&mut self, kind: PowerupKind) {
        match kind {
            PowerupKind::Cake => self.player.heal(1),
            PowerupKind::Life => self.player.lives += 1,
            PowerupKind::Energy => self.player.add_energy(ENERGY_PICKUP_AMOUNT),
        }
        self.cue(SoundCue::PowerupCollect);
        log::debug!("Collected {:?}", kind);
    }

    /// Hostile hit on the player
    pub fn damage_player(&mut self, amount: i32) {
        if self.player.take_damage(amount) {
            self.timers.screen_flash.set(SCREEN_FLASH_MS);
            self.timers.invincibility.set(INVINCIBILITY_MS);
            self.cue(SoundCue::PlayerHit);
        } else {
            self.before_death();
            self.die();
        }
    }

    fn before_death(&mut self) {
        self.cue(SoundCue::PlayerDeath);
    }

    fn die(&mut self) {
        self.player.lives -= 1;
        self.player.respawning = true;
        self.player.moving = false;
        self.timers.respawn.set(DEATH_DELAY_MS);
        self.progress.clear_spawns();
        self.entities
            .add_effect(TransientEffect::new(EffectKind::DeathPuff, Vec2::ZERO));
        log::info!("Player died, {} lives left", self.player.lives);

        if self.player.lives < 0 {
            // The burst's completion decides; the respawn timer only holds control
            self.timers
                .respawn
                .set(DEATH_DELAY_MS * GAME_OVER_DELAY_FACTOR);
            self.entities.add_effect(
                TransientEffect::new(EffectKind::GameOverBurst, self.player.pos)
                    .with_signal(EffectSignal::GameOverCheck),
            );
        }
    }

    /// Respawn-timer expiry. Ignored while a game-over check is pending.
    pub fn on_respawn_timer(&mut self) {
        if self.player.respawning && !self.entities.has_pending(EffectSignal::GameOverCheck) {
            self.respawn();
        }
    }

    pub fn respawn(&mut self) {
        self.player.respawn();
        self.timers.respawn.clear();
        self.timers.invincibility.set(INVINCIBILITY_MS);
        log::info!("Player respawned");
    }

    /// Completion of the game-over burst
    pub fn game_over_check(&mut self) {
        if self.player.lives >= 0 {
            self.respawn();
        } else {
            self.finalize_game_over();
        }
    }

    fn finalize_game_over(&mut self) {
        self.game_over = true;
        self.entities.halt_combat();
        self.progress.clear_spawns();
        self.input.clear_pulses();
        self.director.enter_game_over();
        self.timers.respawn.clear();
        self.timers.restart.set(GAME_OVER_AUTO_RESTART_MS);
        self.cue(SoundCue::GameOver);
        log::info!(
            "Game over: {} shots, {} kills, {:.0}% accuracy",
            self.stats.shots_fired,
            self.stats.kills,
            self.stats.accuracy() * 100.0
        );
    }

    /// Retry chosen on the prompt
    pub fn request_restart(&mut self) {
        if self.timers.restart.remaining() > RESTART_DELAY_MS || !self.timers.restart.is_active() {
            self.timers.restart.set(RESTART_DELAY_MS);
        }
    }

    /// Whether the invincibility flicker hides the player this frame
    pub fn player_visible(&self) -> bool {
        super::timers::player_visible(self.timers.invincibility.remaining())
    }
}

/// Serializable summary for logs and headless runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub player: Player,
    pub stats: Stats,
    pub world: u32,
    pub stage: u32,
    pub stage_clock_ms: i32,
    pub player_bullets: usize,
    pub hostile_bullets: usize,
    pub enemies: usize,
    pub powerups: usize,
    pub effects: usize,
    pub game_over: bool,
}

impl From<&Playthrough> for Snapshot {
    fn from(run: &Playthrough) -> Self {
        Self {
            mode: run.mode(),
            player: run.player.clone(),
            stats: run.stats,
            world: run.progress.world,
            stage: run.progress.stage,
            stage_clock_ms: run.timers.stage_clock_ms,
            player_bullets: run.entities.player_bullets.len(),
            hostile_bullets: run.entities.hostile_bullets.len(),
            enemies: run.entities.enemies.len(),
            powerups: run.entities.powerups.len(),
            effects: run.entities.effects.len(),
            game_over: run.game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Enemy, EnemyKind};

    fn playing() -> Playthrough {
        Playthrough::new(42, STARTING_LIVES, false)
    }

    #[test]
    fn test_new_run_defaults() {
        let run = Playthrough::new(1, STARTING_LIVES, true);
        assert!(matches!(run.mode(), Mode::Title { phase: 0, .. }));
        assert_eq!(run.player.lives, 1);
        assert!(!run.can_fire());
        assert!(playing().can_fire());
    }

    #[test]
    fn test_fire_spawns_led_bullet() {
        let mut run = playing();
        let origin = run.player.weapon_origin();
        run.input.set_cursor(origin + Vec2::new(30.0, -40.0));
        run.fire();

        assert_eq!(run.entities.player_bullets.len(), 1);
        let bullet = &run.entities.player_bullets[0];
        let lead = BulletKind::Player.speed() * BULLET_LEAD_FRAMES;
        assert!((bullet.pos - (origin + Vec2::new(0.6, -0.8) * lead)).length() < 1e-4);
        assert!((run.player.aim.length() - 1.0).abs() < 1e-5);
        assert_eq!(run.timers.fire.remaining(), FIRE_DELAY_MS);
        assert!(!run.can_fire());
        assert_eq!(run.stats.shots_fired, 1);
        assert_eq!(run.take_cues(), vec![SoundCue::Fire]);
    }

    #[test]
    fn test_fire_mirrors_only_when_standing() {
        let mut run = playing();
        run.input.set_cursor(Vec2::new(0.0, 100.0));
        run.fire();
        assert!(run.player.mirrored);

        run.player.moving = true;
        run.player.mirrored = false;
        run.fire();
        assert!(!run.player.mirrored);
    }

    #[test]
    fn test_fire_at_origin_keeps_unit_aim() {
        let mut run = playing();
        run.input.set_cursor(run.player.weapon_origin());
        run.fire();
        assert_eq!(run.player.aim, Vec2::NEG_Y);
    }

    #[test]
    fn test_damage_grants_invincibility() {
        let mut run = playing();
        run.damage_player(ENEMY_DAMAGE);
        assert_eq!(run.player.health, HEALTH_MAX - ENEMY_DAMAGE);
        assert!(run.timers.invincibility.is_active());
        assert!(run.timers.screen_flash.is_active());
    }

    #[test]
    fn test_death_with_lives_left_waits_for_timer() {
        let mut run = playing();
        run.damage_player(HEALTH_MAX);
        assert_eq!(run.player.lives, 0);
        assert!(run.player.respawning);
        assert_eq!(run.timers.respawn.remaining(), DEATH_DELAY_MS);
        assert_eq!(run.entities.effects.len(), 1);
        assert_eq!(run.entities.effects[0].pos, Vec2::ZERO);
        assert!(!run.entities.has_pending(EffectSignal::GameOverCheck));

        run.on_respawn_timer();
        assert!(!run.player.respawning);
        assert_eq!(run.player.health, HEALTH_MAX);
        assert_eq!(run.timers.invincibility.remaining(), INVINCIBILITY_MS);
    }

    #[test]
    fn test_last_death_defers_to_burst() {
        let mut run = playing();
        run.player.lives = 0;
        run.player.energy = 40;
        run.damage_player(HEALTH_MAX);

        assert_eq!(run.player.lives, -1);
        assert_eq!(run.entities.effects.len(), 2);
        assert_eq!(
            run.timers.respawn.remaining(),
            DEATH_DELAY_MS * GAME_OVER_DELAY_FACTOR
        );
        assert!(!run.game_over);

        // Timer expiry alone does nothing while the burst plays
        run.on_respawn_timer();
        assert!(run.player.respawning);

        run.game_over_check();
        assert!(run.game_over);
        assert!(matches!(run.mode(), Mode::GameOver { .. }));
        assert!(run.timers.restart.is_active());
    }

    #[test]
    fn test_life_pickup_during_burst_saves_run() {
        let mut run = playing();
        run.player.lives = 0;
        run.damage_player(HEALTH_MAX);
        run.apply_powerup(PowerupKind::Life);
        run.game_over_check();
        assert!(!run.game_over);
        assert!(!run.player.respawning);
        assert_eq!(run.player.lives, 0);
    }

    #[test]
    fn test_respawn_keeps_energy() {
        let mut run = playing();
        run.player.energy = 60;
        run.damage_player(HEALTH_MAX);
        run.respawn();
        assert_eq!(run.player.energy, 60);
        assert_eq!(run.player.lives, 0);
    }

    #[test]
    fn test_special_requires_energy() {
        let mut run = playing();
        run.player.energy = ENERGY_THRESHOLD_LOW - 1;
        assert!(!run.try_start_special());
        run.player.energy = ENERGY_THRESHOLD_LOW;
        assert!(run.try_start_special());
        assert!(!run.try_start_special());
        assert!(!run.can_fire());
    }

    #[test]
    fn test_special_sequence_weak_and_strong() {
        for (energy, expected) in [(60, PowerKind::Normal), (ENERGY_MAX, PowerKind::Megaton)] {
            let mut run = playing();
            run.player.energy = energy;
            run.entities.add_enemy(Enemy::new(Vec2::new(50.0, 50.0), EnemyKind::Unassigned));
            run.entities.add_bullet(Bullet::new(Vec2::splat(100.0), Vec2::Y, BulletKind::Bullet, Side::Hostile));
            assert!(run.try_start_special());

            // Wind-up
            assert!(run.update_special(SPECIAL_TRIGGER_THRESHOLDS_MS[1]));
            assert_eq!(run.player.power, expected);
            assert!(!run.timers.special_trigger.is_running());
            assert!(run.timers.power_active.is_running());

            // Activation
            assert!(run.update_special(POWER_ACTIVE_THRESHOLDS_MS[0]));
            assert!(run.entities.hostile_bullets.is_empty());

            // Cooldown ends the power
            assert!(!run.update_special(POWER_ACTIVE_THRESHOLDS_MS[2]));
            assert_eq!(run.player.power, PowerKind::None);
            assert_eq!(run.player.energy, 0);
            assert!(!run.timers.special_sequence_active());
        }
    }

    #[test]
    fn test_strong_power_kills_enemy() {
        let mut run = playing();
        run.player.energy = ENERGY_MAX;
        run.entities.add_enemy(Enemy::new(Vec2::new(50.0, 50.0), EnemyKind::Unassigned));
        run.try_start_special();
        run.update_special(SPECIAL_TRIGGER_THRESHOLDS_MS[1]);
        run.update_special(POWER_ACTIVE_THRESHOLDS_MS[0]);
        assert!(run.entities.enemies.is_empty());
        assert_eq!(run.stats.kills, 1);
    }

    #[test]
    fn test_powerup_effects_clamped() {
        let mut run = playing();
        run.apply_powerup(PowerupKind::Cake);
        assert_eq!(run.player.health, HEALTH_MAX);
        for _ in 0..10 {
            run.apply_powerup(PowerupKind::Energy);
        }
        assert_eq!(run.player.energy, ENERGY_MAX);
        run.apply_powerup(PowerupKind::Life);
        assert_eq!(run.player.lives, 2);
    }

    #[test]
    fn test_request_restart_shortens_timer() {
        let mut run = playing();
        run.player.lives = 0;
        run.damage_player(HEALTH_MAX);
        run.game_over_check();
        assert_eq!(run.timers.restart.remaining(), GAME_OVER_AUTO_RESTART_MS);
        run.request_restart();
        assert_eq!(run.timers.restart.remaining(), RESTART_DELAY_MS);
    }

    #[test]
    fn test_snapshot_serializes() {
        let run = playing();
        let json = serde_json::to_string(&Snapshot::from(&run)).unwrap();
        assert!(json.contains("\"Playing\""));
    }
}

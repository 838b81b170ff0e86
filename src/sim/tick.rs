//! Per-frame simulation pass
//!
//! Order within a frame: countdowns, cutscene transitions, respawn expiry,
//! player control, special sequence, entities and collisions, stage clock,
//! transient effects. Inputs arrive between frames as held directions and
//! one-shot pulses on the run's `InputTranslator`.

use glam::Vec2;

use super::collision::{Rect, collect_powerups, resolve_player_bullets, take_hostile_hit};
use super::cutscene::Transition;
use super::entities::EffectSignal;
use super::stage::StageEnd;
use super::state::Playthrough;
use crate::audio::SoundCue;
use crate::consts::*;
use crate::frames_elapsed;

/// What the owner of the run has to do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// The restart timer ran out; build a fresh run
    Restart,
}

/// Playfield in world coordinates
pub fn playfield() -> Rect {
    Rect::new(Vec2::ZERO, Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT))
}

/// Advance the run by one frame of `elapsed_ms`
pub fn tick(run: &mut Playthrough, elapsed_ms: i32) -> TickOutcome {
    let elapsed_ms = elapsed_ms.max(0);
    let expired = run.timers.advance(elapsed_ms);

    if expired.restart && run.game_over {
        log::info!("Restart timer elapsed");
        return TickOutcome::Restart;
    }

    if let Some(transition) = run.director.advance(elapsed_ms) {
        on_transition(run, transition);
    }

    if !run.director.is_playing() {
        // Inputs aimed at gameplay are dropped during cutscenes
        run.input.clear_pulses();
        update_effects(run, elapsed_ms);
        return TickOutcome::Continue;
    }

    if expired.respawn {
        run.on_respawn_timer();
    }

    update_control(run, elapsed_ms);

    if run.update_special(elapsed_ms) {
        // Stage clock and combat hold still while a power plays out
        update_effects(run, elapsed_ms);
        return TickOutcome::Continue;
    }

    update_entities(run, elapsed_ms);
    resolve_collisions(run);
    update_stage(run, elapsed_ms);
    update_effects(run, elapsed_ms);

    TickOutcome::Continue
}

fn on_transition(run: &mut Playthrough, transition: Transition) {
    match transition {
        Transition::TitleStep(phase) => {
            log::debug!("Title phase {}", phase);
            run.cue(SoundCue::Cutscene);
        }
        Transition::TitleFinished => {
            log::info!("Title finished, starting world {}", run.progress.world);
        }
        Transition::WorldCompleteFinished => {
            run.progress.next_world();
            run.timers.stage_clock_ms = 0;
            let rng = &mut run.rng;
            run.progress.load_stage(rng);
            log::info!("Entering world {}", run.progress.world);
        }
    }
}

/// Movement, special trigger and fire, in that order
fn update_control(run: &mut Playthrough, elapsed_ms: i32) {
    let special = run.input.take_special();
    let fire = run.input.take_fire();

    if !run.player_has_control() {
        run.player.moving = false;
        return;
    }

    match run.input.active_direction() {
        Some(direction) => {
            run.player
                .move_by(direction.sign() * PLAYER_SPEED * frames_elapsed(elapsed_ms));
            run.player.moving = true;
            run.player.mirrored = direction.sign() < 0.0;
        }
        None => run.player.moving = false,
    }

    if special && run.try_start_special() {
        return;
    }
    if fire && run.can_fire() {
        run.fire();
    }
}

fn update_entities(run: &mut Playthrough, elapsed_ms: i32) {
    let due = run.progress.due_spawns(run.timers.stage_clock_ms);
    for enemy in due {
        run.entities.add_enemy(enemy);
    }

    run.entities.update_bullets(elapsed_ms, playfield());
    run.entities.update_enemies(elapsed_ms);
    run.entities.update_powerups(elapsed_ms);
}

fn resolve_collisions(run: &mut Playthrough) {
    let report = resolve_player_bullets(&mut run.entities, PLAYER_DAMAGE);
    run.stats.hits += report.hits;
    let survived = report.hits as usize - report.kills.len();
    for _ in 0..survived {
        run.cue(SoundCue::EnemyHit);
    }
    for center in report.kills {
        run.on_enemy_killed(center);
    }

    let player_box = run.player.bounds();

    // One hostile hit at most: the hit itself starts invincibility or death
    if !run.timers.invincibility.is_active()
        && !run.player.respawning
        && take_hostile_hit(&mut run.entities, &player_box)
    {
        run.damage_player(ENEMY_DAMAGE);
    }

    for kind in collect_powerups(&mut run.entities, &player_box) {
        run.apply_powerup(kind);
    }
}

fn update_stage(run: &mut Playthrough, elapsed_ms: i32) {
    if run.player.respawning {
        return;
    }
    run.timers.advance_stage_clock(elapsed_ms);

    if !run
        .progress
        .stage_finished(run.timers.stage_clock_ms, run.entities.enemies.len())
    {
        return;
    }

    run.timers.stage_clock_ms = 0;
    match run.progress.finish_stage() {
        StageEnd::NextStage => {
            let rng = &mut run.rng;
            run.progress.load_stage(rng);
            log::info!(
                "World {} stage {} begins",
                run.progress.world,
                run.progress.stage
            );
        }
        StageEnd::WorldComplete => {
            run.entities.halt_combat();
            run.entities.powerups.clear();
            run.director.enter_world_complete();
            run.cue(SoundCue::WorldComplete);
            log::info!("World {} complete", run.progress.world);
        }
    }
}

fn update_effects(run: &mut Playthrough, elapsed_ms: i32) {
    for signal in run.entities.update_effects(elapsed_ms) {
        match signal {
            EffectSignal::GameOverCheck => run.game_over_check(),
        }
    }
}

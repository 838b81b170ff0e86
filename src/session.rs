//! Arcade session
//!
//! Host-facing orchestrator. Owns the settings, the atlas handle, the master
//! RNG and the current `Playthrough`; routes raw input into the run, steps
//! it once per host frame and draws it. A restart swaps in a new
//! `Playthrough` seeded from the master RNG.

use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::assets::{AtlasSource, TextureHandle};
use crate::audio::{AudioSink, CueQueue, SoundCue};
use crate::consts::*;
use crate::error::SessionError;
use crate::host::Minigame;
use crate::renderer::atlas::{self, SpriteRegion};
use crate::renderer::{Color, DrawSurface, SpriteDraw};
use crate::settings::Settings;
use crate::sim::animation::{PoseInput, base_layer, pose_parts, select_pose};
use crate::sim::input::{Action, Key};
use crate::sim::state::{Playthrough, Snapshot};
use crate::sim::tick::{TickOutcome, tick};
use crate::sim::{GameOverOption, Mode, Rect, playfield};

/// Identifier the host uses to recognise this session type
pub const MINIGAME_ID: &str = "LightGunArcade";

// Draw layers, back to front. The player sorts inside 0.1..0.9 by depth.
const LAYER_BACKGROUND: f32 = 0.0;
const LAYER_POWERUP: f32 = 0.05;
const LAYER_BULLET: f32 = 0.92;
const LAYER_EFFECT: f32 = 0.94;
const LAYER_HUD: f32 = 0.96;
const LAYER_FLASH: f32 = 0.98;
const LAYER_OVERLAY: f32 = 0.99;

/// Powerups blink once this little time is left (ms)
const POWERUP_BLINK_MS: i32 = 1000;

/// Game-over prompt layout (world px)
const GAME_OVER_TEXT_POS: Vec2 = Vec2::new(64.0, 80.0);
const RETRY_POS: Vec2 = Vec2::new(56.0, 140.0);
const QUIT_POS: Vec2 = Vec2::new(152.0, 140.0);

/// Title layout (world px)
const TITLE_BANNER_POS: Vec2 = Vec2::new(48.0, 72.0);
const TITLE_TEXT_POS: Vec2 = Vec2::new(48.0, 140.0);
const TITLE_TEXT_SPACING: f32 = 18.0;

pub struct ArcadeSession {
    settings: Settings,
    atlas: TextureHandle,
    master_rng: Pcg32,
    run: Playthrough,
    cues: CueQueue,
    quit: bool,
    restarts: u32,
}

impl ArcadeSession {
    /// Build a session. Fails without a usable atlas.
    pub fn new(settings: Settings, source: &mut impl AtlasSource) -> Result<Self, SessionError> {
        let settings = settings.validated();
        let atlas = source
            .load_atlas(Path::new(&settings.atlas_path))
            .inspect_err(|e| log::error!("Arcade session not started: {}", e))?;

        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let mut master_rng = Pcg32::seed_from_u64(seed);
        let run = Playthrough::new(
            master_rng.random(),
            settings.starting_lives,
            !settings.skip_title,
        );
        log::info!(
            "Arcade session created (seed {}, atlas {})",
            seed,
            atlas.path().display()
        );

        Ok(Self {
            cues: CueQueue::new(settings.sfx_volume, settings.muted),
            settings,
            atlas,
            master_rng,
            run,
            quit: false,
            restarts: 0,
        })
    }

    /// Build a session from a settings file. An unreadable or malformed file
    /// is an error here, unlike `Settings::load`.
    pub fn from_settings_file(
        path: impl AsRef<Path>,
        source: &mut impl AtlasSource,
    ) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let settings = Settings::load_from_path(path).inspect_err(|e| {
            log::error!("Arcade session not started ({}): {}", path.display(), e)
        })?;
        Self::new(settings, source)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn atlas(&self) -> &TextureHandle {
        &self.atlas
    }

    /// The current run
    pub fn playthrough(&self) -> &Playthrough {
        &self.run
    }

    pub fn playthrough_mut(&mut self) -> &mut Playthrough {
        &mut self.run
    }

    pub fn mode(&self) -> Mode {
        self.run.mode()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Number of runs started after the first
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.run)
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.cues.set_muted(muted);
    }

    /// Cues raised since the last drain
    pub fn drain_sound_cues(&mut self) -> Vec<SoundCue> {
        self.collect_cues();
        self.cues.drain()
    }

    pub fn flush_sound_cues(&mut self, sink: &mut dyn AudioSink) {
        self.collect_cues();
        self.cues.flush_to(sink);
    }

    fn collect_cues(&mut self) {
        for cue in self.run.take_cues() {
            self.cues.push(cue);
        }
    }

    fn request_quit(&mut self) {
        if !self.quit {
            log::info!("Quit requested");
        }
        self.quit = true;
    }

    /// Replace the run with a fresh one that skips the title
    fn restart(&mut self) {
        let cursor = self.run.input.cursor();
        self.run = Playthrough::new(
            self.master_rng.random(),
            self.settings.starting_lives,
            false,
        );
        self.run.input.set_cursor(cursor);
        self.restarts += 1;
        log::info!("Restarted (run {})", self.restarts + 1);
    }

    fn confirm_game_over(&mut self) {
        match self.run.director.selected_option() {
            Some(GameOverOption::Retry) => {
                self.run.request_restart();
                self.run.cue(SoundCue::MenuSelect);
            }
            Some(GameOverOption::Quit) => self.request_quit(),
            None => {}
        }
    }

    fn change_selection(&mut self, changed: bool) {
        if changed {
            self.run.cue(SoundCue::MenuSelect);
        }
    }

    fn advance_title(&mut self) {
        if let Some(transition) = self.run.director.click_title() {
            log::debug!("Title advanced by input: {:?}", transition);
            self.run.cue(SoundCue::Cutscene);
        }
    }

    /// Prompt option under a world-space point
    fn option_at(world: Vec2) -> Option<GameOverOption> {
        [GameOverOption::Retry, GameOverOption::Quit]
            .into_iter()
            .find(|&option| option_rect(option).contains_point(world))
    }

    // === Drawing ===

    fn sprite(&self, region: SpriteRegion, world: Vec2, layer: f32) -> SpriteDraw {
        SpriteDraw::new(
            region,
            self.settings.world_to_screen(world),
            self.settings.pixel_zoom,
            layer,
        )
    }

    fn screen_rect(&self, world: Rect) -> Rect {
        Rect::new(
            self.settings.world_to_screen(world.pos),
            world.size * self.settings.pixel_zoom,
        )
    }

    fn draw_playfield(&self, surface: &mut dyn DrawSurface) {
        let run = &self.run;
        let texture = &self.atlas;

        surface.draw_sprite(texture, self.sprite(atlas::BACKGROUND, Vec2::ZERO, LAYER_BACKGROUND));

        for powerup in &run.entities.powerups {
            let left = powerup.remaining.remaining();
            if left < POWERUP_BLINK_MS && (left / FLICKER_HALF_PERIOD_MS) % 2 == 1 {
                continue;
            }
            let sprite = self.sprite(atlas::powerup_sprite(powerup.kind), powerup.pos, LAYER_POWERUP);
            surface.draw_sprite(texture, sprite);
        }

        for enemy in &run.entities.enemies {
            let layer = base_layer(enemy.pos.y);
            let mut sprite = self.sprite(atlas::enemy_sprite(enemy.kind), enemy.pos, layer);
            if enemy.flash.is_active() {
                sprite = sprite.tinted(Color::RED);
            }
            surface.draw_sprite(texture, sprite);
        }

        for bullet in run
            .entities
            .player_bullets
            .iter()
            .chain(&run.entities.hostile_bullets)
        {
            let region = atlas::bullet_sprite(bullet.kind);
            let top_left = bullet.pos - Vec2::new(region.w as f32, region.h as f32) / 2.0;
            let sprite = self.sprite(region, top_left, LAYER_BULLET).rotated(bullet.rotation);
            surface.draw_sprite(texture, sprite);
        }

        self.draw_player(surface);

        for effect in &run.entities.effects {
            let region = atlas::effect_sprite(effect.kind, effect.current_frame());
            surface.draw_sprite(texture, self.sprite(region, effect.pos, LAYER_EFFECT));
        }

        self.draw_hud(surface);

        if run.timers.screen_flash.is_active() {
            surface.fill_rect(self.screen_rect(playfield()), Color::FLASH, LAYER_FLASH);
        }
    }

    fn draw_player(&self, surface: &mut dyn DrawSurface) {
        let run = &self.run;
        if !run.player_visible() {
            return;
        }
        let player = &run.player;
        let timers = &run.timers;

        let input = PoseInput {
            trigger_phase: timers
                .special_trigger
                .is_running()
                .then(|| timers.special_trigger.phase(&SPECIAL_TRIGGER_THRESHOLDS_MS)),
            power: player
                .power
                .group()
                .filter(|_| timers.power_active.is_running())
                .map(|group| (group, timers.power_active.phase(&POWER_ACTIVE_THRESHOLDS_MS))),
            respawning: player.respawning,
            firing: timers.fire.is_active(),
            moving: player.moving,
            aim: player.aim,
            mirrored: player.mirrored,
            clock_ms: timers.anim_clock_ms,
        };

        for part in pose_parts(select_pose(&input), player.pos.y, player.mirrored) {
            let sprite = self
                .sprite(part.region, player.pos + part.offset, part.layer)
                .flipped(part.flip_x);
            surface.draw_sprite(&self.atlas, sprite);
        }
    }

    fn draw_hud(&self, surface: &mut dyn DrawSurface) {
        let player = &self.run.player;
        let texture = &self.atlas;

        for i in 0..HEALTH_MAX {
            let region = if i < player.health {
                atlas::HUD_HEART
            } else {
                atlas::HUD_HEART_EMPTY
            };
            let pos = Vec2::new(4.0 + i as f32 * 9.0, 4.0);
            surface.draw_sprite(texture, self.sprite(region, pos, LAYER_HUD));
        }

        for i in 0..player.lives.max(0) {
            let pos = Vec2::new(4.0 + i as f32 * 9.0, 14.0);
            surface.draw_sprite(texture, self.sprite(atlas::HUD_LIFE, pos, LAYER_HUD));
        }

        let frame = atlas::HUD_ENERGY_FRAME;
        let bar_pos = Vec2::new(PLAYFIELD_WIDTH - frame.w as f32 - 4.0, 4.0);
        surface.draw_sprite(texture, self.sprite(frame, bar_pos, LAYER_HUD));

        let fill = atlas::HUD_ENERGY_FILL;
        let width = (fill.w as i32 * player.energy / ENERGY_MAX) as u16;
        if width > 0 {
            let region = SpriteRegion::new(fill.x, fill.y, width, fill.h);
            surface.draw_sprite(texture, self.sprite(region, bar_pos, LAYER_HUD + 0.001));
        }
    }

    fn draw_title(&self, surface: &mut dyn DrawSurface, phase: u8, elapsed_ms: i32) {
        let texture = &self.atlas;
        surface.fill_rect(self.screen_rect(playfield()), Color::BLACK, LAYER_BACKGROUND);

        // Phase 0 pans the light shaft down into place
        let shaft = atlas::TITLE_LIGHTSHAFT;
        let pan = if phase == 0 {
            (elapsed_ms as f32 / TITLE_PHASE_MS[0] as f32).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let shaft_pos = Vec2::new(0.0, -(shaft.h as f32) * (1.0 - pan));
        surface.draw_sprite(texture, self.sprite(shaft, shaft_pos, LAYER_OVERLAY));

        if phase >= 1 {
            surface.draw_sprite(
                texture,
                self.sprite(atlas::TITLE_BANNER, TITLE_BANNER_POS, LAYER_OVERLAY),
            );
        }
        for (i, line) in atlas::TITLE_TEXT.iter().enumerate() {
            if (phase as usize) < 2 + i {
                break;
            }
            let pos = TITLE_TEXT_POS + Vec2::new(0.0, i as f32 * TITLE_TEXT_SPACING);
            surface.draw_sprite(texture, self.sprite(*line, pos, LAYER_OVERLAY));
        }
    }

    fn draw_game_over(&self, surface: &mut dyn DrawSurface, selected: GameOverOption) {
        let texture = &self.atlas;
        surface.draw_sprite(
            texture,
            self.sprite(atlas::GAME_OVER_TEXT, GAME_OVER_TEXT_POS, LAYER_OVERLAY),
        );

        let blink_on = (self.run.timers.anim_clock_ms / GAME_OVER_BLINK_MS) % 2 == 0;
        for option in [GameOverOption::Retry, GameOverOption::Quit] {
            if option == selected && !blink_on {
                continue;
            }
            let region = match option {
                GameOverOption::Retry => atlas::GAME_OVER_RETRY,
                GameOverOption::Quit => atlas::GAME_OVER_QUIT,
            };
            surface.draw_sprite(texture, self.sprite(region, option_rect(option).pos, LAYER_OVERLAY));
        }

        let pointer = atlas::GAME_OVER_POINTER;
        let target = option_rect(selected);
        let pointer_pos = target.pos + Vec2::new(-(pointer.w as f32) - 2.0, 4.0);
        surface.draw_sprite(texture, self.sprite(pointer, pointer_pos, LAYER_OVERLAY));
    }

    fn draw_world_complete(&self, surface: &mut dyn DrawSurface, elapsed_ms: i32) {
        let scroll = atlas::WORLD_COMPLETE_SCROLL;
        let t = (elapsed_ms as f32 / WORLD_COMPLETE_MS as f32).clamp(0.0, 1.0);
        let travel = scroll.h as f32 - PLAYFIELD_HEIGHT;
        let pos = Vec2::new(0.0, -travel * t);
        surface.draw_sprite(&self.atlas, self.sprite(scroll, pos, LAYER_BACKGROUND));
        self.draw_hud(surface);
    }
}

/// Hit box of a prompt option (world px)
fn option_rect(option: GameOverOption) -> Rect {
    let (pos, region) = match option {
        GameOverOption::Retry => (RETRY_POS, atlas::GAME_OVER_RETRY),
        GameOverOption::Quit => (QUIT_POS, atlas::GAME_OVER_QUIT),
    };
    Rect::new(pos, Vec2::new(region.w as f32, region.h as f32))
}

impl Minigame for ArcadeSession {
    fn tick(&mut self, elapsed: Duration) -> bool {
        if self.quit {
            return false;
        }
        let elapsed_ms = i32::try_from(elapsed.as_millis()).unwrap_or(i32::MAX);
        if tick(&mut self.run, elapsed_ms) == TickOutcome::Restart {
            self.restart();
        }
        self.collect_cues();
        !self.quit
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        match self.run.mode() {
            Mode::Title { phase, elapsed_ms } => self.draw_title(surface, phase, elapsed_ms),
            Mode::Playing => self.draw_playfield(surface),
            Mode::GameOver { selected } => {
                self.draw_playfield(surface);
                self.draw_game_over(surface, selected);
            }
            Mode::WorldComplete { elapsed_ms } => self.draw_world_complete(surface, elapsed_ms),
        }
    }

    fn receive_key_press(&mut self, key: Key) {
        let Some(action) = self.settings.action_for(key) else {
            return;
        };
        if action == Action::Quit {
            self.request_quit();
            return;
        }
        match self.run.mode() {
            Mode::Title { .. } => {
                if action == Action::Confirm {
                    self.advance_title();
                }
            }
            Mode::GameOver { .. } => match action {
                Action::MenuUp | Action::MenuDown => {
                    let changed = self.run.director.toggle_selection();
                    self.change_selection(changed);
                }
                Action::Confirm => self.confirm_game_over(),
                _ => {}
            },
            Mode::Playing => {
                self.run.input.press(action);
            }
            Mode::WorldComplete { .. } => {}
        }
    }

    fn receive_key_release(&mut self, key: Key) {
        if let Some(action) = self.settings.action_for(key) {
            self.run.input.release(action);
        }
    }

    fn receive_left_click(&mut self, x: f32, y: f32) {
        let world = self.settings.screen_to_world(x, y);
        self.run.input.set_cursor(world);
        match self.run.mode() {
            Mode::Title { .. } => self.advance_title(),
            Mode::GameOver { .. } => {
                if let Some(option) = Self::option_at(world) {
                    let changed = self.run.director.select(option);
                    self.change_selection(changed);
                    self.confirm_game_over();
                }
            }
            Mode::Playing => self.run.input.trigger_fire(world),
            Mode::WorldComplete { .. } => {}
        }
    }

    fn receive_left_click_held(&mut self, x: f32, y: f32) {
        let world = self.settings.screen_to_world(x, y);
        if self.run.director.is_playing() {
            self.run.input.trigger_fire(world);
        } else {
            self.run.input.set_cursor(world);
        }
    }

    fn receive_right_click(&mut self, x: f32, y: f32) {
        let world = self.settings.screen_to_world(x, y);
        self.run.input.set_cursor(world);
        if self.run.director.is_playing() {
            self.run.input.trigger_special();
        }
    }

    fn receive_cursor_moved(&mut self, x: f32, y: f32) {
        let world = self.settings.screen_to_world(x, y);
        self.run.input.set_cursor(world);
        if let Some(option) = Self::option_at(world) {
            let changed = self.run.director.select(option);
            self.change_selection(changed);
        }
    }

    fn minigame_id(&self) -> &'static str {
        MINIGAME_ID
    }
}

//! Headless runner
//!
//! Drives a scripted session for a fixed number of frames and prints a JSON
//! summary. Usage: `lightgun-arcade [--no-atlas] [settings.json] [frames]`
//!
//! Without `--no-atlas` a missing sprite atlas stops the run.

use std::collections::BTreeMap;
use std::error::Error;
use std::time::Duration;

use glam::Vec2;
use lightgun_arcade::assets::{FsAtlasSource, PreloadedAtlas, TextureHandle};
use lightgun_arcade::consts::*;
use lightgun_arcade::renderer::DrawList;
use lightgun_arcade::sim::{Key, Mode};
use lightgun_arcade::{ArcadeSession, Minigame, Settings};

const DEFAULT_FRAMES: u32 = 60 * 60;
const FRAME: Duration = Duration::from_millis(16);

/// Frames between direction changes of the scripted player
const STRAFE_FRAMES: u32 = 120;

fn main() {
    env_logger::init();
    log::info!("Light-gun arcade (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut no_atlas = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--no-atlas" => no_atlas = true,
            _ => positional.push(arg),
        }
    }
    let mut positional = positional.into_iter();
    let settings_path = positional.next();
    let frames = match positional.next() {
        Some(n) => n.parse()?,
        None => DEFAULT_FRAMES,
    };

    let mut session = match (settings_path, no_atlas) {
        (Some(path), false) => ArcadeSession::from_settings_file(path, &mut FsAtlasSource::new())?,
        (Some(path), true) => ArcadeSession::new(Settings::load(path), &mut placeholder_atlas())?,
        (None, false) => ArcadeSession::new(headless_settings(), &mut FsAtlasSource::new())?,
        (None, true) => ArcadeSession::new(headless_settings(), &mut placeholder_atlas())?,
    };
    let mut cue_counts: BTreeMap<&'static str, u32> = BTreeMap::new();
    let mut draw = DrawList::new();
    let mut ran = 0;

    for frame in 0..frames {
        script_input(&mut session, frame);
        let keep_running = session.tick(FRAME);
        for cue in session.drain_sound_cues() {
            *cue_counts.entry(cue.name()).or_default() += 1;
        }
        draw.clear();
        session.draw(&mut draw);
        ran = frame + 1;
        if !keep_running {
            break;
        }
    }

    let summary = serde_json::json!({
        "minigame": session.minigame_id(),
        "frames": ran,
        "restarts": session.restarts(),
        "quit": session.quit_requested(),
        "accuracy": session.playthrough().stats.accuracy(),
        "snapshot": session.snapshot(),
        "last_frame_draws": draw.commands.len(),
        "cues": cue_counts,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn headless_settings() -> Settings {
    Settings {
        skip_title: true,
        ..Settings::default()
    }
}

/// Stand-in texture for runs that never present a frame
fn placeholder_atlas() -> PreloadedAtlas {
    log::warn!("Running without a sprite atlas (--no-atlas)");
    PreloadedAtlas::new(TextureHandle::new(0, "placeholder", 0))
}

/// Strafe back and forth, sweep the cursor across the top, hold fire, and
/// fire the special whenever it is charged. Clicks through cutscenes and
/// picks Retry on the game-over prompt.
fn script_input(session: &mut ArcadeSession, frame: u32) {
    let zoom = session.settings().pixel_zoom;
    let origin = session.settings().playfield_origin;
    let sweep = (frame as f32 * 0.02).sin() * 0.5 + 0.5;
    let cursor = origin + Vec2::new(sweep * PLAYFIELD_WIDTH, 32.0) * zoom;

    match session.mode() {
        Mode::Title { .. } => {
            if frame % 30 == 0 {
                session.receive_left_click(cursor.x, cursor.y);
            }
        }
        Mode::GameOver { .. } => {
            if frame % 60 == 0 {
                session.receive_key_press(Key::Enter);
            }
        }
        Mode::WorldComplete { .. } => {}
        Mode::Playing => {
            if frame % STRAFE_FRAMES == 0 {
                let (press, release) = if (frame / STRAFE_FRAMES) % 2 == 0 {
                    (Key::Left, Key::Right)
                } else {
                    (Key::Right, Key::Left)
                };
                session.receive_key_release(release);
                session.receive_key_press(press);
            }
            session.receive_cursor_moved(cursor.x, cursor.y);
            session.receive_left_click_held(cursor.x, cursor.y);
            if session.playthrough().player.energy >= ENERGY_THRESHOLD_LOW {
                session.receive_right_click(cursor.x, cursor.y);
            }
        }
    }
}

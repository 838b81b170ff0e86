//! Host contract
//!
//! What the surrounding application calls on a running minigame. Screen
//! coordinates are host pixels; the session maps them into the playfield.

use std::time::Duration;

use crate::renderer::DrawSurface;
use crate::renderer::atlas::{self, SpriteRegion};
use crate::sim::input::Key;

pub trait Minigame {
    /// Advance one frame. Returns false once the host should dispose the session.
    fn tick(&mut self, elapsed: Duration) -> bool;

    /// Issue every draw call for the current state. Never mutates the session.
    fn draw(&self, surface: &mut dyn DrawSurface);

    fn receive_key_press(&mut self, key: Key);
    fn receive_key_release(&mut self, key: Key);
    fn receive_left_click(&mut self, x: f32, y: f32);
    fn receive_left_click_held(&mut self, x: f32, y: f32);
    fn receive_right_click(&mut self, x: f32, y: f32);
    fn receive_cursor_moved(&mut self, x: f32, y: f32);

    /// Stable identifier for this session type
    fn minigame_id(&self) -> &'static str;

    /// Atlas region the host patches into its cursor while the session runs
    fn cursor_sprite(&self) -> SpriteRegion {
        atlas::CROSSHAIR
    }
}

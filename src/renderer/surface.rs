//! Draw surface seam
//!
//! The session never talks to a graphics API. It issues sprite blits and
//! solid fills in screen space; the host implements `DrawSurface` over
//! whatever batcher it owns. `DrawList` records commands for tests and
//! headless runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::atlas::SpriteRegion;
use crate::assets::TextureHandle;
use crate::sim::collision::Rect;

/// RGBA color, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const RED: Color = Color::rgba(255, 64, 64, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    /// Full-screen damage flash
    pub const FLASH: Color = Color::rgba(255, 0, 0, 96);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// One sprite blit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteDraw {
    pub region: SpriteRegion,
    /// Screen-space top-left
    pub dest: Vec2,
    pub scale: f32,
    /// Radians, about the sprite centre
    pub rotation: f32,
    pub flip_x: bool,
    pub tint: Color,
    /// 0 = back, 1 = front
    pub layer: f32,
}

impl SpriteDraw {
    pub fn new(region: SpriteRegion, dest: Vec2, scale: f32, layer: f32) -> Self {
        Self {
            region,
            dest,
            scale,
            rotation: 0.0,
            flip_x: false,
            tint: Color::WHITE,
            layer,
        }
    }

    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn flipped(mut self, flip_x: bool) -> Self {
        self.flip_x = flip_x;
        self
    }

    pub fn tinted(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

/// Host-provided render target
pub trait DrawSurface {
    fn draw_sprite(&mut self, texture: &TextureHandle, sprite: SpriteDraw);
    fn fill_rect(&mut self, rect: Rect, color: Color, layer: f32);
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Sprite { texture: u32, sprite: SpriteDraw },
    Fill { rect: Rect, color: Color, layer: f32 },
}

/// Records draw calls in issue order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn sprites(&self) -> impl Iterator<Item = &SpriteDraw> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Sprite { sprite, .. } => Some(sprite),
            DrawCommand::Fill { .. } => None,
        })
    }

    pub fn contains_region(&self, region: SpriteRegion) -> bool {
        self.sprites().any(|s| s.region == region)
    }

    /// Commands sorted back-to-front by layer (stable)
    pub fn sorted_by_layer(&self) -> Vec<DrawCommand> {
        let mut sorted = self.commands.clone();
        sorted.sort_by(|a, b| layer_of(a).total_cmp(&layer_of(b)));
        sorted
    }
}

fn layer_of(command: &DrawCommand) -> f32 {
    match command {
        DrawCommand::Sprite { sprite, .. } => sprite.layer,
        DrawCommand::Fill { layer, .. } => *layer,
    }
}

impl DrawSurface for DrawList {
    fn draw_sprite(&mut self, texture: &TextureHandle, sprite: SpriteDraw) {
        self.commands.push(DrawCommand::Sprite {
            texture: texture.id(),
            sprite,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, layer: f32) {
        self.commands.push(DrawCommand::Fill { rect, color, layer });
    }
}

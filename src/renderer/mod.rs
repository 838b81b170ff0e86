//! Rendering seam
//!
//! The atlas table names every sprite; the surface trait is how draw calls
//! reach the host.

pub mod atlas;
pub mod surface;

pub use atlas::SpriteRegion;
pub use surface::{Color, DrawCommand, DrawList, DrawSurface, SpriteDraw};

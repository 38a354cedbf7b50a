//! Rendering module
//!
//! `scene` turns game state into textured quads (pure); `sprite_pipeline`
//! draws them with wgpu.

pub mod scene;
pub mod sprite_pipeline;
pub mod vertex;

pub use scene::{Sprite, compose_scene};
pub use sprite_pipeline::SpriteRenderState;

//! Render step: game state to a list of textured quads
//!
//! Pure and GPU-free, so draw order and placement are testable natively.

use glam::{Mat3, Vec2};

use super::vertex::Vertex;
use crate::assets::TextureSlot;
use crate::consts::SPRITE_SIZE;
use crate::sim::GameState;
use crate::sim::transform::{apply, compose, scale, translation};

/// One quad to draw: a unit square mapped through `matrix`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub slot: TextureSlot,
    pub matrix: Mat3,
}

/// Build the frame: background, shooter, projectiles, blocks (back to front)
pub fn compose_scene(state: &GameState) -> Vec<Sprite> {
    let mut sprites = Vec::with_capacity(2 + state.projectiles.len() + state.blocks.len());
    let canvas = state.canvas;

    sprites.push(Sprite {
        slot: TextureSlot::Background,
        matrix: compose(
            translation(canvas.x / 2.0, canvas.y / 2.0),
            scale(canvas.x, canvas.y),
        ),
    });

    sprites.push(Sprite {
        slot: TextureSlot::Shooter,
        matrix: compose(
            state.shooter.transform(),
            scale(state.shooter.width, state.shooter.height),
        ),
    });

    let sprite_scale = scale(SPRITE_SIZE, SPRITE_SIZE);
    sprites.extend(state.projectiles.iter().map(|p| Sprite {
        slot: TextureSlot::Paint(p.color),
        matrix: compose(p.transform(), sprite_scale),
    }));
    sprites.extend(state.blocks.iter().map(|b| Sprite {
        slot: TextureSlot::Block,
        matrix: compose(b.transform(), sprite_scale),
    }));

    sprites
}

/// Unit quad corners with texture coordinates; images are stored top row
/// first, so the top edge samples v = 0
const UNIT_QUAD: [(Vec2, [f32; 2]); 6] = [
    (Vec2::new(-0.5, -0.5), [0.0, 1.0]),
    (Vec2::new(0.5, -0.5), [1.0, 1.0]),
    (Vec2::new(-0.5, 0.5), [0.0, 0.0]),
    (Vec2::new(-0.5, 0.5), [0.0, 0.0]),
    (Vec2::new(0.5, -0.5), [1.0, 1.0]),
    (Vec2::new(0.5, 0.5), [1.0, 0.0]),
];

pub const VERTICES_PER_SPRITE: u32 = UNIT_QUAD.len() as u32;

/// Convert logical pixels (origin bottom-left) to clip space
pub fn to_clip(point: Vec2, canvas: Vec2) -> Vec2 {
    if canvas.x <= 0.0 || canvas.y <= 0.0 {
        return Vec2::ZERO;
    }
    point / canvas * 2.0 - Vec2::ONE
}

/// Two triangles for one sprite
pub fn quad_vertices(sprite: &Sprite, canvas: Vec2) -> [Vertex; 6] {
    UNIT_QUAD.map(|(corner, uv)| {
        let clip = to_clip(apply(sprite.matrix, corner), canvas);
        Vertex::new(clip.x, clip.y, uv[0], uv[1])
    })
}

/// Vertices for a whole scene, sprite `i` occupying `i * 6 .. i * 6 + 6`
pub fn scene_vertices(sprites: &[Sprite], canvas: Vec2) -> Vec<Vertex> {
    sprites
        .iter()
        .flat_map(|sprite| quad_vertices(sprite, canvas))
        .collect()
}

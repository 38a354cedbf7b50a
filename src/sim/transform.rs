//! 3x3 affine transforms for placing quads in screen space
//!
//! Matrices are column-major: translation sits in the third column, so
//! `translation(tx, ty).to_cols_array()` is `[1, 0, 0, 0, 1, 0, tx, ty, 1]`.

use glam::{Mat3, Vec2};

/// Matrix that moves points by (tx, ty)
#[inline]
pub fn translation(tx: f32, ty: f32) -> Mat3 {
    Mat3::from_translation(Vec2::new(tx, ty))
}

/// Matrix that scales points by (sx, sy) around the origin
#[inline]
pub fn scale(sx: f32, sy: f32) -> Mat3 {
    Mat3::from_scale(Vec2::new(sx, sy))
}

/// Compose two transforms: the result applies `b` first, then `a`
#[inline]
pub fn compose(a: Mat3, b: Mat3) -> Mat3 {
    a * b
}

/// Map a point through a transform
#[inline]
pub fn apply(m: Mat3, point: Vec2) -> Vec2 {
    m.transform_point2(point)
}

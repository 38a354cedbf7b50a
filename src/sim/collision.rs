//! Axis-aligned overlap tests and per-block outcome resolution

use glam::Vec2;

use super::state::{Block, Projectile, Shooter};

/// Strict box overlap: boxes that only touch at an edge do not collide
#[inline]
pub fn boxes_overlap(a_center: Vec2, a_half: Vec2, b_center: Vec2, b_half: Vec2) -> bool {
    let delta = (a_center - b_center).abs();
    let reach = a_half + b_half;
    delta.x < reach.x && delta.y < reach.y
}

/// A projectile hits a block when its center lies strictly inside the
/// block's box of the given half-extent
#[inline]
pub fn projectile_hits_block(block: &Block, projectile: &Projectile, half_extent: f32) -> bool {
    boxes_overlap(block.pos, Vec2::splat(half_extent), projectile.pos, Vec2::ZERO)
}

/// A block reaches the shooter when its center lies strictly inside the
/// shooter's box
#[inline]
pub fn block_hits_shooter(block: &Block, shooter: &Shooter) -> bool {
    boxes_overlap(shooter.pos, shooter.half_extents(), block.pos, Vec2::ZERO)
}

/// What happens to one block this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// Nothing touched it; it stays
    Survives,
    /// It landed on the shooter
    HitShooter,
    /// Shot by the projectile at this index
    Shot { projectile_index: usize },
    /// It fell past the bottom edge
    Escaped,
}

/// Decide a block's fate. Shooter contact wins over projectile hits, and the
/// first overlapping projectile in index order wins over later ones.
pub fn resolve_block(
    block: &Block,
    shooter: &Shooter,
    projectiles: &[Projectile],
    half_extent: f32,
) -> BlockOutcome {
    if block_hits_shooter(block, shooter) {
        return BlockOutcome::HitShooter;
    }

    if let Some(projectile_index) = projectiles
        .iter()
        .position(|p| projectile_hits_block(block, p, half_extent))
    {
        return BlockOutcome::Shot { projectile_index };
    }

    if block.pos.y <= 0.0 {
        return BlockOutcome::Escaped;
    }

    BlockOutcome::Survives
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PaintColor;
    use proptest::prelude::*;

    fn block_at(x: f32, y: f32) -> Block {
        Block {
            id: 1,
            pos: Vec2::new(x, y),
            velocity: 2.0,
        }
    }

    fn projectile_at(id: u32, x: f32, y: f32) -> Projectile {
        Projectile {
            id,
            pos: Vec2::new(x, y),
            velocity: 10.0,
            color: PaintColor::Green,
        }
    }

    #[test]
    fn test_projectile_inside_block() {
        let block = block_at(300.0, 300.0);
        assert!(projectile_hits_block(&block, &projectile_at(1, 349.0, 251.0), 50.0));
    }

    #[test]
    fn test_touching_edge_is_not_a_hit() {
        let block = block_at(300.0, 300.0);
        assert!(!projectile_hits_block(&block, &projectile_at(1, 350.0, 300.0), 50.0));
        assert!(!projectile_hits_block(&block, &projectile_at(1, 300.0, 250.0), 50.0));
        assert!(!projectile_hits_block(&block, &projectile_at(1, 250.0, 350.0), 50.0));
    }

    #[test]
    fn test_block_on_shooter() {
        let shooter = Shooter::new(800.0); // (400, 50), 100x100
        assert!(block_hits_shooter(&block_at(420.0, 90.0), &shooter));
        assert!(!block_hits_shooter(&block_at(450.0, 90.0), &shooter));
        assert!(!block_hits_shooter(&block_at(420.0, 100.0), &shooter));
    }

    #[test]
    fn test_shooter_contact_beats_projectile_hit() {
        let shooter = Shooter::new(800.0);
        let block = block_at(400.0, 80.0);
        let projectiles = [projectile_at(1, 400.0, 80.0)];
        assert_eq!(
            resolve_block(&block, &shooter, &projectiles, 50.0),
            BlockOutcome::HitShooter
        );
    }

    #[test]
    fn test_first_projectile_wins() {
        let shooter = Shooter::new(800.0);
        let block = block_at(100.0, 400.0);
        let projectiles = [
            projectile_at(1, 700.0, 400.0),
            projectile_at(2, 110.0, 390.0),
            projectile_at(3, 100.0, 400.0),
        ];
        assert_eq!(
            resolve_block(&block, &shooter, &projectiles, 50.0),
            BlockOutcome::Shot { projectile_index: 1 }
        );
    }

    #[test]
    fn test_escape_at_bottom() {
        let shooter = Shooter::new(800.0);
        assert_eq!(
            resolve_block(&block_at(700.0, 0.0), &shooter, &[], 50.0),
            BlockOutcome::Escaped
        );
        assert_eq!(
            resolve_block(&block_at(700.0, 0.5), &shooter, &[], 50.0),
            BlockOutcome::Survives
        );
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            ah in 0.0f32..100.0, bh in 0.0f32..100.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(
                boxes_overlap(a, Vec2::splat(ah), b, Vec2::splat(bh)),
                boxes_overlap(b, Vec2::splat(bh), a, Vec2::splat(ah))
            );
        }

        #[test]
        fn prop_hit_matches_per_axis_test(
            dx in -120i32..120, dy in -120i32..120,
        ) {
            // Integer offsets keep the edge cases exact
            let block = block_at(400.0, 400.0);
            let projectile = projectile_at(1, 400.0 + dx as f32, 400.0 + dy as f32);
            let expected = dx.abs() < 50 && dy.abs() < 50;
            prop_assert_eq!(projectile_hits_block(&block, &projectile, 50.0), expected);
        }
    }
}

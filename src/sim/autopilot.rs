//! Demo mode: the game plays itself
//!
//! Chases the lowest crate and fires when lined up. It emits the same
//! `TickInput` a player would, including releasing fire between shots.

use super::state::{Block, GameState};
use super::tick::TickInput;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Fire was requested last tick; must release before the next shot
    fire_held: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_tick_input(&mut self, state: &GameState) -> TickInput {
        let Some(target) = lowest_block(&state.blocks) else {
            self.fire_held = false;
            return TickInput::default();
        };

        let half_extent = state.tuning.hit_half_extent;
        let dx = target.pos.x - state.shooter.pos.x;
        // Dead zone avoids jittering around the target
        let dead_zone = state.tuning.shooter_step / 2.0;

        let aligned = dx.abs() < half_extent;
        let column_busy = state.projectiles.iter().any(|p| {
            (p.pos.x - target.pos.x).abs() < half_extent && p.pos.y < target.pos.y
        });
        let fire = aligned && !column_busy && !self.fire_held;
        self.fire_held = fire;

        TickInput {
            move_left: dx < -dead_zone,
            move_right: dx > dead_zone,
            fire,
        }
    }
}

fn lowest_block(blocks: &[Block]) -> Option<&Block> {
    blocks.iter().min_by(|a, b| {
        a.pos
            .y
            .partial_cmp(&b.pos.y)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

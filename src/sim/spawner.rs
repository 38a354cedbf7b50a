//! Block spawning and difficulty ramp
//!
//! Both run on their own fixed-interval clocks, independent of the frame
//! rate. The browser host drives them with `setInterval`; headless runs and
//! tests drive them through [`Schedule`].

use rand::Rng;

use super::state::GameState;
use crate::tuning::Tuning;

/// Spawn one block at a random x along the top edge.
/// Returns the new block's id, or `None` once the run is over.
pub fn spawn_block(state: &mut GameState, rng: &mut impl Rng) -> Option<u32> {
    if state.is_game_over() {
        return None;
    }
    let x = rng.random::<f32>() * state.canvas.x;
    let id = state.add_block(x);
    log::debug!("Spawned block {} at x={:.1}", id, x);
    Some(id)
}

/// Speed every block up by the configured increment.
/// Returns `false` once the run is over.
pub fn ramp_difficulty(state: &mut GameState) -> bool {
    if state.is_game_over() {
        return false;
    }
    state.speed_multiplier += state.tuning.difficulty_increment;
    log::debug!("Speed multiplier now {:.2}", state.speed_multiplier);
    true
}

/// Fixed-period clock fed with elapsed milliseconds
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period_ms: f64,
    elapsed_ms: f64,
}

impl IntervalTimer {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Add elapsed time; returns how many periods completed
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        self.elapsed_ms += dt_ms.max(0.0);
        let mut fired = 0;
        while self.elapsed_ms >= self.period_ms {
            self.elapsed_ms -= self.period_ms;
            fired += 1;
        }
        fired
    }
}

/// The spawn and difficulty clocks together
#[derive(Debug, Clone)]
pub struct Schedule {
    spawn: IntervalTimer,
    difficulty: IntervalTimer,
}

impl Schedule {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            spawn: IntervalTimer::new(tuning.spawn_interval_ms),
            difficulty: IntervalTimer::new(tuning.difficulty_interval_ms),
        }
    }

    /// Run every spawn and ramp that fell due within `dt_ms`
    pub fn advance(&mut self, state: &mut GameState, rng: &mut impl Rng, dt_ms: f64) {
        for _ in 0..self.spawn.advance(dt_ms) {
            spawn_block(state, rng);
        }
        for _ in 0..self.difficulty.advance(dt_ms) {
            ramp_difficulty(state);
        }
    }
}

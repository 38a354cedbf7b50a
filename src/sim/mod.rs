//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per fixed timestep
//! - Randomness only through a caller-supplied RNG
//! - Stable iteration order (creation order)
//! - No rendering, audio or DOM dependencies; effects come back as events

pub mod autopilot;
pub mod collision;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod transform;

pub use autopilot::Autopilot;
pub use collision::{BlockOutcome, boxes_overlap, resolve_block};
pub use spawner::{IntervalTimer, Schedule, ramp_difficulty, spawn_block};
pub use state::{Block, GamePhase, GameState, PaintColor, Projectile, Shooter};
pub use tick::{GameEvent, LossCause, TickInput, tick};

//! Data-driven game balance
//!
//! Every gameplay number lives here so a run can be retuned from JSON
//! without touching the simulation.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Gameplay constants, in logical pixels, ticks and milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Horizontal shooter movement per tick while an arrow key is held
    pub shooter_step: f32,
    /// Upward projectile speed per tick
    pub projectile_velocity: f32,
    /// Downward block speed per tick, before the speed multiplier
    pub block_velocity: f32,
    /// Half-size of the projectile/block hit box
    pub hit_half_extent: f32,
    /// Milliseconds between block spawns
    pub spawn_interval_ms: f64,
    /// Milliseconds between difficulty ramps
    pub difficulty_interval_ms: f64,
    /// Added to the speed multiplier on every ramp
    pub difficulty_increment: f32,
    /// Delay before the final-score notification is shown
    pub game_over_notice_delay_ms: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            shooter_step: 10.0,
            projectile_velocity: 10.0,
            block_velocity: 2.0,
            hit_half_extent: 50.0,
            spawn_interval_ms: 2000.0,
            difficulty_interval_ms: 5000.0,
            difficulty_increment: 0.1,
            game_over_notice_delay_ms: 100,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), GameError> {
        let positive_f32 = [
            ("shooter_step", self.shooter_step),
            ("projectile_velocity", self.projectile_velocity),
            ("block_velocity", self.block_velocity),
            ("hit_half_extent", self.hit_half_extent),
        ];
        for (name, value) in positive_f32 {
            if !value.is_finite() || value <= 0.0 {
                return Err(GameError::InvalidTuning(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let positive_ms = [
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("difficulty_interval_ms", self.difficulty_interval_ms),
        ];
        for (name, value) in positive_ms {
            if !value.is_finite() || value <= 0.0 {
                return Err(GameError::InvalidTuning(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        // Zero is allowed: a flat difficulty curve
        if !self.difficulty_increment.is_finite() || self.difficulty_increment < 0.0 {
            return Err(GameError::InvalidTuning(format!(
                "difficulty_increment must not be negative, got {}",
                self.difficulty_increment
            )));
        }

        if self.game_over_notice_delay_ms < 0 {
            return Err(GameError::InvalidTuning(format!(
                "game_over_notice_delay_ms must not be negative, got {}",
                self.game_over_notice_delay_ms
            )));
        }

        Ok(())
    }
}

//! Paintball Mayhem - a single-screen paintball shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, tick, spawning)
//! - `input`: Key state to per-tick intent
//! - `renderer`: Sprite composition and the wgpu pipeline
//! - `assets`: Texture and sound manifest, async image loading
//! - `timestep`: Frame time to fixed ticks
//! - `tuning`: Data-driven game balance
//! - `settings` / `highscores`: LocalStorage-backed player data

pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod timestep;
pub mod tuning;

pub use error::GameError;
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame gap fed to the accumulator, in seconds
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Shooter box, in logical pixels
    pub const SHOOTER_WIDTH: f32 = 100.0;
    pub const SHOOTER_HEIGHT: f32 = 100.0;
    /// Shooter center height above the bottom edge
    pub const SHOOTER_Y: f32 = 50.0;

    /// Drawn size of blocks and paint projectiles
    pub const SPRITE_SIZE: f32 = 100.0;
}

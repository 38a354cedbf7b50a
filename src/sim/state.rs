//! Game state and entity types
//!
//! `GameState` is the entity store: it exclusively owns the shooter and the
//! ordered projectile and block lists. Physics and rendering only borrow it.

use glam::{Mat3, Vec2};
use rand::Rng;

use super::transform::translation;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended (terminal)
    GameOver,
}

/// Paint colors a projectile can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaintColor {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Pink,
}

impl PaintColor {
    pub const ALL: [PaintColor; 6] = [
        PaintColor::Red,
        PaintColor::Green,
        PaintColor::Blue,
        PaintColor::Yellow,
        PaintColor::Orange,
        PaintColor::Pink,
    ];

    /// Pick a color uniformly at random
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaintColor::Red => "red",
            PaintColor::Green => "green",
            PaintColor::Blue => "blue",
            PaintColor::Yellow => "yellow",
            PaintColor::Orange => "orange",
            PaintColor::Pink => "pink",
        }
    }
}

/// The player's paint gun
#[derive(Debug, Clone, PartialEq)]
pub struct Shooter {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Shooter {
    /// Centered horizontally near the bottom edge
    pub fn new(canvas_width: f32) -> Self {
        Self {
            pos: Vec2::new(canvas_width / 2.0, SHOOTER_Y),
            width: SHOOTER_WIDTH,
            height: SHOOTER_HEIGHT,
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Current placement transform
    pub fn transform(&self) -> Mat3 {
        translation(self.pos.x, self.pos.y)
    }

    /// Shift horizontally, never leaving [half width, canvas width - half width]
    pub fn move_by(&mut self, dx: f32, canvas_width: f32) {
        self.pos.x = (self.pos.x + dx).clamp(self.min_x(), self.max_x(canvas_width));
    }

    /// Pull back inside the canvas after a resize
    pub fn clamp_to(&mut self, canvas_width: f32) {
        self.move_by(0.0, canvas_width);
    }

    fn min_x(&self) -> f32 {
        self.width / 2.0
    }

    fn max_x(&self, canvas_width: f32) -> f32 {
        // A canvas narrower than the shooter pins it to the left bound
        (canvas_width - self.width / 2.0).max(self.min_x())
    }
}

/// A paint ball in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Upward speed per tick
    pub velocity: f32,
    pub color: PaintColor,
}

impl Projectile {
    pub fn transform(&self) -> Mat3 {
        translation(self.pos.x, self.pos.y)
    }
}

/// A falling crate
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: u32,
    pub pos: Vec2,
    /// Downward speed per tick, before the speed multiplier
    pub velocity: f32,
}

impl Block {
    pub fn transform(&self) -> Mat3 {
        translation(self.pos.x, self.pos.y)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Playfield size in logical pixels (origin bottom-left, y up)
    pub canvas: Vec2,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u32,
    /// Applied to every block's velocity; only ever grows
    pub speed_multiplier: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub shooter: Shooter,
    /// Active projectiles in firing order
    pub projectiles: Vec<Projectile>,
    /// Active blocks in spawn order
    pub blocks: Vec<Block>,
    next_id: u32,
}

impl GameState {
    pub fn new(width: f32, height: f32, tuning: Tuning) -> Self {
        Self {
            canvas: Vec2::new(width, height),
            tuning,
            phase: GamePhase::Playing,
            score: 0,
            speed_multiplier: 1.0,
            time_ticks: 0,
            shooter: Shooter::new(width),
            projectiles: Vec::new(),
            blocks: Vec::new(),
            next_id: 1,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fire a projectile from the shooter's current position
    pub fn add_projectile(&mut self, color: PaintColor) -> u32 {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile {
            id,
            pos: self.shooter.pos,
            velocity: self.tuning.projectile_velocity,
            color,
        });
        id
    }

    /// Drop a block in at the top edge
    pub fn add_block(&mut self, x: f32) -> u32 {
        let id = self.next_entity_id();
        self.blocks.push(Block {
            id,
            pos: Vec2::new(x, self.canvas.y),
            velocity: self.tuning.block_velocity,
        });
        id
    }

    /// Remove every projectile matching `pred`; returns how many were removed
    pub fn remove_projectiles_where(&mut self, mut pred: impl FnMut(&Projectile) -> bool) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(|p| !pred(p));
        before - self.projectiles.len()
    }

    /// Remove every block matching `pred`; returns how many were removed
    pub fn remove_blocks_where(&mut self, mut pred: impl FnMut(&Block) -> bool) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|b| !pred(b));
        before - self.blocks.len()
    }

    /// Follow a window resize; entities keep their positions
    pub fn resize(&mut self, width: f32, height: f32) {
        self.canvas = Vec2::new(width, height);
        self.shooter.clamp_to(width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_state() {
        let state = GameState::new(800.0, 600.0, Tuning::default());
        assert_eq!(state.shooter.pos, Vec2::new(400.0, 50.0));
        assert_eq!(state.score, 0);
        assert_eq!(state.speed_multiplier, 1.0);
        assert!(!state.is_game_over());
        assert!(state.projectiles.is_empty());
        assert!(state.blocks.is_empty());
    }

    #[test]
    fn test_shooter_clamped_to_bounds() {
        let mut shooter = Shooter::new(800.0);
        shooter.move_by(-1000.0, 800.0);
        assert_eq!(shooter.pos.x, 50.0);
        shooter.move_by(1000.0, 800.0);
        assert_eq!(shooter.pos.x, 750.0);
    }

    #[test]
    fn test_shooter_on_tiny_canvas() {
        let mut shooter = Shooter::new(60.0);
        shooter.move_by(10.0, 60.0);
        assert_eq!(shooter.pos.x, 50.0);
    }

    #[test]
    fn test_resize_pulls_shooter_inside() {
        let mut state = GameState::new(800.0, 600.0, Tuning::default());
        state.shooter.move_by(1000.0, 800.0);
        state.resize(400.0, 300.0);
        assert_eq!(state.shooter.pos.x, 350.0);
        assert_eq!(state.canvas, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_add_and_remove_by_predicate() {
        let mut state = GameState::new(800.0, 600.0, Tuning::default());
        let a = state.add_block(100.0);
        let b = state.add_block(200.0);
        assert_ne!(a, b);
        assert_eq!(state.blocks[0].pos, Vec2::new(100.0, 600.0));
        assert_eq!(state.blocks[1].velocity, 2.0);

        let removed = state.remove_blocks_where(|blk| blk.id == a);
        assert_eq!(removed, 1);
        assert_eq!(state.blocks.len(), 1);
        assert_eq!(state.blocks[0].id, b);

        state.add_projectile(PaintColor::Red);
        state.add_projectile(PaintColor::Blue);
        let removed = state.remove_projectiles_where(|p| p.color == PaintColor::Red);
        assert_eq!(removed, 1);
        assert_eq!(state.projectiles[0].color, PaintColor::Blue);
    }

    #[test]
    fn test_random_color_covers_palette() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(PaintColor::random(&mut rng));
        }
        assert_eq!(seen.len(), PaintColor::ALL.len());
    }

    #[test]
    fn test_transform_tracks_position() {
        let state = GameState::new(800.0, 600.0, Tuning::default());
        let m = state.shooter.transform();
        assert_eq!(m.transform_point2(Vec2::ZERO), Vec2::new(400.0, 50.0));
    }
}

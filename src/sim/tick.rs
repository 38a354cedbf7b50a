//! Fixed timestep simulation tick
//!
//! One call advances the game by one frame's worth of movement and returns
//! the outcomes (shots, hits, game over) for the host to turn into sounds,
//! score updates and notifications.

use rand::Rng;

use super::collision::{BlockOutcome, resolve_block};
use super::state::{GamePhase, GameState, PaintColor};

/// Player intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Fire one projectile (already edge-triggered by the caller)
    pub fire: bool,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossCause {
    /// A block landed on the shooter
    ShooterHit,
    /// A block reached the bottom edge
    BlockEscaped,
}

/// Side effects produced by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A projectile left the gun
    Fired { projectile_id: u32, color: PaintColor },
    /// A projectile destroyed a block; `score` is the new total
    BlockDestroyed { block_id: u32, score: u32 },
    /// The run ended (emitted exactly once)
    GameOver { final_score: u32, cause: LossCause },
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput, rng: &mut impl Rng) -> Vec<GameEvent> {
    if state.is_game_over() {
        return Vec::new();
    }

    let mut events = Vec::new();
    state.time_ticks += 1;

    // Movement and firing
    let step = state.tuning.shooter_step;
    let width = state.canvas.x;
    if input.move_left {
        state.shooter.move_by(-step, width);
    }
    if input.move_right {
        state.shooter.move_by(step, width);
    }
    if input.fire {
        let color = PaintColor::random(rng);
        let projectile_id = state.add_projectile(color);
        log::trace!("Fired projectile {} ({})", projectile_id, color.as_str());
        events.push(GameEvent::Fired { projectile_id, color });
    }

    // Projectiles rise and leave through the top
    for projectile in &mut state.projectiles {
        projectile.pos.y += projectile.velocity;
    }
    let top = state.canvas.y;
    state.remove_projectiles_where(|p| p.pos.y > top);

    // Blocks fall
    let multiplier = state.speed_multiplier;
    for block in &mut state.blocks {
        block.pos.y -= block.velocity * multiplier;
    }

    // Partition blocks into survivors and resolved outcomes
    let half_extent = state.tuning.hit_half_extent;
    let mut pending = std::mem::take(&mut state.blocks).into_iter();
    let mut survivors = Vec::with_capacity(pending.len());

    for block in pending.by_ref() {
        match resolve_block(&block, &state.shooter, &state.projectiles, half_extent) {
            BlockOutcome::Survives => survivors.push(block),
            BlockOutcome::Shot { projectile_index } => {
                state.projectiles.remove(projectile_index);
                state.score += 1;
                log::debug!("Block {} destroyed, score {}", block.id, state.score);
                events.push(GameEvent::BlockDestroyed {
                    block_id: block.id,
                    score: state.score,
                });
            }
            BlockOutcome::HitShooter => {
                events.push(end_run(state, LossCause::ShooterHit));
                break;
            }
            BlockOutcome::Escaped => {
                events.push(end_run(state, LossCause::BlockEscaped));
                break;
            }
        }
    }

    // After a game over the rest stay exactly where they are
    survivors.extend(pending);
    state.blocks = survivors;

    events
}

fn end_run(state: &mut GameState, cause: LossCause) -> GameEvent {
    state.phase = GamePhase::GameOver;
    log::info!("Game over ({:?}) with score {}", cause, state.score);
    GameEvent::GameOver {
        final_score: state.score,
        cause,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn new_state() -> GameState {
        GameState::new(800.0, 600.0, Tuning::default())
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(12345)
    }

    const FIRE: TickInput = TickInput {
        move_left: false,
        move_right: false,
        fire: true,
    };

    #[test]
    fn test_fire_spawns_projectile_at_shooter() {
        let mut state = new_state();
        let mut rng = rng();
        let events = tick(&mut state, &FIRE, &mut rng);

        assert_eq!(state.projectiles.len(), 1);
        // Fired this tick and already moved once
        assert_eq!(state.projectiles[0].pos, Vec2::new(400.0, 60.0));
        assert!(matches!(events[0], GameEvent::Fired { .. }));
    }

    #[test]
    fn test_projectile_leaves_through_top() {
        let mut state = GameState::new(800.0, 100.0, Tuning::default());
        let mut rng = rng();
        tick(&mut state, &FIRE, &mut rng); // y = 60
        let idle = TickInput::default();
        tick(&mut state, &idle, &mut rng); // 70
        tick(&mut state, &idle, &mut rng); // 80
        tick(&mut state, &idle, &mut rng); // 90
        tick(&mut state, &idle, &mut rng); // 100, still on screen
        assert_eq!(state.projectiles.len(), 1);
        tick(&mut state, &idle, &mut rng); // 110, gone
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_hit_scores_and_removes_both() {
        let mut state = new_state();
        let mut rng = rng();
        state.add_block(400.0);
        state.blocks[0].pos.y = 300.0;
        state.add_projectile(PaintColor::Pink);
        state.projectiles[0].pos.y = 280.0;

        let events = tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.score, 1);
        assert!(state.blocks.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(
            events,
            vec![GameEvent::BlockDestroyed {
                block_id: 1,
                score: 1
            }]
        );
    }

    #[test]
    fn test_one_projectile_per_block() {
        let mut state = new_state();
        let mut rng = rng();
        state.add_block(200.0);
        state.blocks[0].pos.y = 300.0;
        state.add_block(600.0);
        state.blocks[1].pos.y = 300.0;
        // Two projectiles inside the first block, none near the second
        for _ in 0..2 {
            state.add_projectile(PaintColor::Red);
        }
        state.projectiles[0].pos = Vec2::new(210.0, 290.0);
        state.projectiles[1].pos = Vec2::new(190.0, 290.0);

        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.score, 1);
        assert_eq!(state.blocks.len(), 1);
        assert_eq!(state.blocks[0].pos.x, 600.0);
        // The second projectile survives the tick
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos.x, 190.0);
    }

    #[test]
    fn test_block_on_shooter_ends_run() {
        let mut state = new_state();
        let mut rng = rng();
        state.add_block(400.0);
        state.blocks[0].pos.y = 100.0; // falls to 98, inside the shooter box

        let events = tick(&mut state, &TickInput::default(), &mut rng);
        assert!(state.is_game_over());
        assert!(state.blocks.is_empty());
        assert_eq!(
            events,
            vec![GameEvent::GameOver {
                final_score: 0,
                cause: LossCause::ShooterHit
            }]
        );
    }

    #[test]
    fn test_game_over_reported_once() {
        let mut state = new_state();
        let mut rng = rng();
        // Two blocks escape on the same tick
        state.add_block(100.0);
        state.blocks[0].pos.y = 1.0;
        state.add_block(700.0);
        state.blocks[1].pos.y = 1.0;

        let events = tick(&mut state, &TickInput::default(), &mut rng);
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        // The second block is left untouched
        assert_eq!(state.blocks.len(), 1);
        assert_eq!(state.blocks[0].pos.x, 700.0);
    }

    #[test]
    fn test_no_mutation_after_game_over() {
        let mut state = new_state();
        let mut rng = rng();
        state.add_block(100.0);
        state.blocks[0].pos.y = 1.0;
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(state.is_game_over());

        let before_ticks = state.time_ticks;
        let before_shooter = state.shooter.clone();
        let input = TickInput {
            move_left: true,
            move_right: false,
            fire: true,
        };
        let events = tick(&mut state, &input, &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, before_ticks);
        assert_eq!(state.shooter, before_shooter);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_speed_multiplier_scales_fall() {
        let mut state = new_state();
        let mut rng = rng();
        state.speed_multiplier = 1.5;
        state.add_block(100.0);
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!((state.blocks[0].pos.y - 597.0).abs() < 1e-4);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = new_state();
        let mut state2 = new_state();
        let mut rng1 = rng();
        let mut rng2 = rng();

        let inputs = [
            FIRE,
            TickInput {
                move_left: true,
                ..Default::default()
            },
            FIRE,
            TickInput::default(),
        ];
        for input in &inputs {
            tick(&mut state1, input, &mut rng1);
            tick(&mut state2, input, &mut rng2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.projectiles, state2.projectiles);
        assert_eq!(state1.shooter, state2.shooter);
    }

    proptest! {
        #[test]
        fn prop_shooter_stays_in_bounds(moves in prop::collection::vec(0u8..4, 0..300)) {
            let mut state = new_state();
            let mut rng = rng();
            let half = state.shooter.width / 2.0;
            for m in moves {
                let input = TickInput {
                    move_left: m & 1 != 0,
                    move_right: m & 2 != 0,
                    fire: false,
                };
                tick(&mut state, &input, &mut rng);
                prop_assert!(state.shooter.pos.x >= half);
                prop_assert!(state.shooter.pos.x <= state.canvas.x - half);
            }
        }

        #[test]
        fn prop_score_increases_by_hits(xs in prop::collection::vec(60.0f32..740.0, 1..8)) {
            let mut state = new_state();
            let mut rng = rng();
            for &x in &xs {
                state.add_block(x);
                let last = state.blocks.len() - 1;
                state.blocks[last].pos.y = 400.0;
                state.add_projectile(PaintColor::Blue);
                let last = state.projectiles.len() - 1;
                state.projectiles[last].pos = Vec2::new(x, 380.0);
            }
            let events = tick(&mut state, &TickInput::default(), &mut rng);
            let hits = events
                .iter()
                .filter(|e| matches!(e, GameEvent::BlockDestroyed { .. }))
                .count() as u32;
            prop_assert_eq!(state.score, hits);
            prop_assert!(hits >= 1);
        }
    }
}

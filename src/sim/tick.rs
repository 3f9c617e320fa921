//! Fixed timestep simulation tick
//!
//! Owns the run state machine and sequences the per-tick systems:
//! difficulty, spawning, player motion, then collisions.

use super::collision::{nearest_obstacle_ahead, resolve_collisions};
use super::effects::update_particles;
use super::motion::{self, Direction};
use super::spawner::spawn_entities;
use super::state::{GameState, RunState};
use crate::layout::ROAD_MARK_PERIOD;

/// How close an obstacle must be before the autopilot dodges it
const AUTOPILOT_LOOKAHEAD: f32 = 260.0;

/// Input intents gathered between ticks
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Change lane to the left
    pub move_left: bool,
    /// Change lane to the right
    pub move_right: bool,
    /// Start from the menu / dismiss the game-over screen
    pub primary: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot drives
    pub idle_mode: bool,
}

impl TickInput {
    /// Forget one-shot intents once a tick has consumed them
    pub fn clear_one_shots(&mut self) {
        self.move_left = false;
        self.move_right = false;
        self.primary = false;
        self.pause = false;
    }
}

/// Advance the game by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            RunState::Playing => {
                state.phase = RunState::Paused;
                log::info!("Paused");
                return;
            }
            RunState::Paused => {
                state.phase = RunState::Playing;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    match state.phase {
        RunState::Menu => {
            if input.primary || input.idle_mode {
                state.start_game();
            }
            return;
        }
        RunState::GameOver => {
            if input.primary {
                state.phase = RunState::Menu;
                log::info!("Back to menu");
            }
            return;
        }
        RunState::Paused => return,
        RunState::Playing => {}
    }

    // Intents are applied before anything moves
    let dir = if input.idle_mode {
        autopilot(state)
    } else if input.move_left {
        Some(Direction::Left)
    } else if input.move_right {
        Some(Direction::Right)
    } else {
        None
    };
    if let Some(dir) = dir {
        motion::request_move(&mut state.player, dir, &state.tuning);
    }

    state.time_ticks += 1;

    // Difficulty
    state.difficulty.ramp(&state.tuning);
    state.score += state.difficulty.score_gain(&state.tuning);
    state.road_offset = (state.road_offset + state.difficulty.speed) % ROAD_MARK_PERIOD;

    spawn_entities(state);

    motion::advance(&mut state.player, &state.tuning, &state.layout);
    motion::tick_shield(&mut state.player);

    update_particles(&mut state.particles, state.difficulty.speed);

    resolve_collisions(state);
}

/// Pick a dodge for the demo mode: head for the adjacent lane with the most
/// room ahead when the current one is about to be blocked
fn autopilot(state: &GameState) -> Option<Direction> {
    if state.player.moving {
        return None;
    }

    let clearance = |lane: u8| -> f32 {
        nearest_obstacle_ahead(state, lane)
            .map(|o| state.player.y - o.pos.y)
            .unwrap_or(f32::INFINITY)
    };

    let lane = state.player.current_lane;
    let here = clearance(lane);
    if here > AUTOPILOT_LOOKAHEAD {
        return None;
    }

    let left = lane.checked_sub(1).map(clearance).unwrap_or(f32::NEG_INFINITY);
    let right = if lane < state.tuning.last_lane() {
        clearance(lane + 1)
    } else {
        f32::NEG_INFINITY
    };

    if left >= right && left > here {
        Some(Direction::Left)
    } else if right > here {
        Some(Direction::Right)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::sim::state::{EntityKind, GameEvent, PowerUpKind};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn new_state() -> GameState {
        GameState::new(Tuning::default(), Layout::default(), 12345)
    }

    fn primary() -> TickInput {
        TickInput {
            primary: true,
            ..Default::default()
        }
    }

    fn pause() -> TickInput {
        TickInput {
            pause: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_menu_to_playing() {
        let mut state = new_state();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, RunState::Menu);
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &primary());
        assert_eq!(state.phase, RunState::Playing);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, 1);
        assert!(state.score > 0.0);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = new_state();
        tick(&mut state, &primary());
        tick(&mut state, &TickInput::default());

        tick(&mut state, &pause());
        assert_eq!(state.phase, RunState::Paused);
        let frozen_score = state.score;
        let frozen_speed = state.difficulty.speed;

        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score, frozen_score);
        assert_eq!(state.difficulty.speed, frozen_speed);

        // Unpause resumes where we left off
        tick(&mut state, &pause());
        assert_eq!(state.phase, RunState::Playing);
        assert!(state.score > frozen_score);
    }

    #[test]
    fn test_pause_ignored_outside_play() {
        let mut state = new_state();
        tick(&mut state, &pause());
        assert_eq!(state.phase, RunState::Menu);
    }

    #[test]
    fn test_crash_then_back_to_menu() {
        let mut state = new_state();
        tick(&mut state, &primary());
        let y = state.player.y;
        state.place_entity(EntityKind::Obstacle, 1, y);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, RunState::GameOver);
        let score = state.score;

        // Game over is frozen until dismissed
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, score);

        tick(&mut state, &primary());
        assert_eq!(state.phase, RunState::Menu);
    }

    #[test]
    fn test_move_intent_applied_in_tick() {
        let mut state = new_state();
        tick(&mut state, &primary());
        let input = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert!(state.player.moving);
        assert_eq!(state.player.target_lane, 0);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.player.current_lane, 0);
        assert_eq!(state.player.x, state.layout.lane_x(0));
    }

    #[test]
    fn test_moves_ignored_while_not_playing() {
        let mut state = new_state();
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert!(!state.player.moving);
    }

    #[test]
    fn test_shield_counts_down_while_playing() {
        let mut state = new_state();
        tick(&mut state, &primary());
        state.player.shield_ticks = 3;
        for _ in 0..5 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.player.shield_ticks, 0);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = new_state();
        tick(&mut state, &primary());
        for _ in 0..400 {
            tick(&mut state, &TickInput::default());
            if state.phase != RunState::Playing {
                break;
            }
        }
        state.player.shield_ticks = 50;
        state.place_entity(EntityKind::PowerUp(PowerUpKind::SlowMo), 0, 10.0);
        state.phase = RunState::GameOver;

        state.start_game();

        assert_eq!(state.phase, RunState::Playing);
        assert_eq!(state.player.current_lane, 1);
        assert_eq!(state.player.shield_ticks, 0);
        assert!(!state.player.moving);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.difficulty.speed, 5.0);
        assert_eq!(state.entity_count(), 0);
        assert_eq!(state.timers.obstacle, 0);
    }

    #[test]
    fn test_autopilot_dodges() {
        let mut state = new_state();
        tick(&mut state, &primary());
        let y = state.player.y;
        state.place_entity(EntityKind::Obstacle, 1, y - 200.0);
        state.place_entity(EntityKind::Obstacle, 0, y - 250.0);

        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &idle);

        assert!(state.player.moving);
        assert_eq!(state.player.target_lane, 2);
    }

    #[test]
    fn test_autopilot_survives_a_while() {
        let mut state = new_state();
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &idle);
        }
        assert_eq!(state.phase, RunState::Playing);
        assert!(state.floored_score() > 0);
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state();
        let mut b = new_state();
        let inputs = [
            primary(),
            TickInput {
                move_left: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                move_right: true,
                ..Default::default()
            },
        ];

        for _ in 0..300 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }

        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score, b.score);
        assert_eq!(a.entity_count(), b.entity_count());
        assert_eq!(a.player.x, b.player.x);
    }

    #[test]
    fn test_game_over_event_emitted_once() {
        let mut state = new_state();
        tick(&mut state, &primary());
        let y = state.player.y;
        state.place_entity(EntityKind::Obstacle, 1, y);
        tick(&mut state, &TickInput::default());
        tick(&mut state, &TickInput::default());

        let count = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(count, 1);
    }

    #[derive(Debug, Clone)]
    enum Intent {
        None,
        Left,
        Right,
    }

    fn intent() -> impl Strategy<Value = Intent> {
        prop_oneof![Just(Intent::None), Just(Intent::Left), Just(Intent::Right)]
    }

    proptest! {
        #[test]
        fn prop_moves_locked_while_moving(
            seed in any::<u64>(),
            intents in proptest::collection::vec(intent(), 1..300),
        ) {
            let mut state = GameState::new(Tuning::default(), Layout::default(), seed);
            state.start_game();
            for intent in intents {
                if state.phase != RunState::Playing {
                    break;
                }
                let was_moving = state.player.moving;
                let target = state.player.target_lane;
                let input = TickInput {
                    move_left: matches!(intent, Intent::Left),
                    move_right: matches!(intent, Intent::Right),
                    ..Default::default()
                };
                tick(&mut state, &input);
                if was_moving {
                    prop_assert_eq!(state.player.target_lane, target);
                }
                prop_assert!(state.player.current_lane < 3);
                prop_assert!(state.player.target_lane < 3);
            }
        }

        #[test]
        fn prop_speed_bounded_and_ramping(seed in any::<u64>(), ticks in 1usize..3000) {
            let tuning = Tuning::default();
            let mut state = GameState::new(tuning.clone(), Layout::default(), seed);
            state.start_game();
            let mut last_speed = state.difficulty.speed;
            let mut last_score = state.score;
            for _ in 0..ticks {
                state.drain_events();
                tick(&mut state, &TickInput { idle_mode: true, ..Default::default() });
                if state.phase != RunState::Playing {
                    break;
                }
                let slowed = state
                    .events
                    .contains(&GameEvent::PowerUpCollected(PowerUpKind::SlowMo));
                if !slowed {
                    prop_assert!(state.difficulty.speed >= last_speed);
                }
                prop_assert!(state.difficulty.speed >= tuning.min_speed);
                prop_assert!(state.difficulty.speed <= tuning.max_speed);
                prop_assert!(state.score > last_score);
                last_speed = state.difficulty.speed;
                last_score = state.score;
            }
        }
    }
}

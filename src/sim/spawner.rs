//! Timed entity spawning
//!
//! Three independent tick timers. Each expires when it exceeds its
//! threshold, places one entity in a uniformly random lane and starts over.

use rand::Rng;

use super::state::{EntityKind, GameState, PowerUpKind};

/// Run all spawn timers for one tick
pub fn spawn_entities(state: &mut GameState) {
    let lanes = state.tuning.lane_count;

    // Obstacles get denser as speed rises
    state.timers.obstacle += 1;
    let obstacle_threshold = state.tuning.obstacle_threshold(state.difficulty.speed);
    if state.timers.obstacle as f32 > obstacle_threshold {
        let lane = state.rng.random_range(0..lanes);
        state.spawn_entity(EntityKind::Obstacle, lane);
        state.timers.obstacle = 0;
    }

    // Coins only show up on some expiries
    state.timers.coin += 1;
    if state.timers.coin > state.tuning.coin_threshold {
        if state.rng.random_bool(state.tuning.coin_spawn_chance) {
            let lane = state.rng.random_range(0..lanes);
            state.spawn_entity(EntityKind::Coin, lane);
        }
        state.timers.coin = 0;
    }

    state.timers.powerup += 1;
    if state.timers.powerup > state.tuning.powerup_threshold {
        let lane = state.rng.random_range(0..lanes);
        let kind = if state.rng.random_bool(0.5) {
            PowerUpKind::Shield
        } else {
            PowerUpKind::SlowMo
        };
        state.spawn_entity(EntityKind::PowerUp(kind), lane);
        state.timers.powerup = 0;
        log::debug!("Spawned {:?} power-up in lane {}", kind, lane);
    }
}

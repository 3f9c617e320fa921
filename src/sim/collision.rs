//! Collision and scoring for scrolling entities
//!
//! Each category is walked once per tick in spawn order. Every entity scrolls
//! down by the current speed, is tested against the player with that
//! category's forgiving hit box, and is kept or dropped in the same pass, so
//! nothing is tested twice or skipped.

use glam::Vec2;

use super::effects::emit_burst;
use super::state::{Entity, EntityKind, GameEvent, GameState, PowerUpKind, RunState};

/// Axis-aligned overlap with a symmetric half-extent `reach`
#[inline]
pub fn overlaps(a: Vec2, b: Vec2, reach: f32) -> bool {
    (a.x - b.x).abs() < reach && (a.y - b.y).abs() < reach
}

/// Scroll every entity and apply collision outcomes for one tick.
///
/// May end the run. Once it has, the remaining entities of the pass still
/// scroll and retire, but nothing else scores or takes effect.
pub fn resolve_collisions(state: &mut GameState) {
    resolve_obstacles(state);
    resolve_coins(state);
    resolve_powerups(state);
}

fn resolve_obstacles(state: &mut GameState) {
    let GameState {
        tuning,
        layout,
        phase,
        player,
        obstacles,
        particles,
        difficulty,
        score,
        events,
        rng,
        ..
    } = state;
    let speed = difficulty.speed;
    let reach = EntityKind::Obstacle.reach(tuning);
    let despawn_y = layout.despawn_y();

    obstacles.retain_mut(|obstacle| {
        obstacle.pos.y += speed;

        if *phase == RunState::Playing && overlaps(player.pos(), obstacle.pos, reach) {
            if player.shield_active() {
                player.shield_ticks = 0;
                emit_burst(particles, rng, obstacle.pos, tuning.burst_particles);
                events.push(GameEvent::ShieldAbsorbed { pos: obstacle.pos });
                log::debug!("Shield absorbed obstacle {}", obstacle.id);
                return false;
            }

            *phase = RunState::GameOver;
            let final_score = score.max(0.0).floor() as u64;
            let coins_earned = (score.max(0.0) / tuning.score_per_coin).floor() as u64;
            events.push(GameEvent::GameOver {
                score: final_score,
                coins_earned,
            });
            log::info!(
                "Crashed into obstacle {} (score {}, +{} coins)",
                obstacle.id,
                final_score,
                coins_earned
            );
            // The wreck stays on screen
            return true;
        }

        obstacle.pos.y <= despawn_y
    });
}

fn resolve_coins(state: &mut GameState) {
    let GameState {
        tuning,
        layout,
        phase,
        player,
        coins,
        difficulty,
        score,
        events,
        ..
    } = state;
    let speed = difficulty.speed;
    let reach = EntityKind::Coin.reach(tuning);
    let despawn_y = layout.despawn_y();

    coins.retain_mut(|coin| {
        coin.pos.y += speed;

        if *phase == RunState::Playing && overlaps(player.pos(), coin.pos, reach) {
            *score += tuning.coin_score_bonus;
            events.push(GameEvent::CoinCollected {
                value: tuning.coin_value,
            });
            return false;
        }

        coin.pos.y <= despawn_y
    });
}

fn resolve_powerups(state: &mut GameState) {
    let GameState {
        tuning,
        layout,
        phase,
        player,
        powerups,
        difficulty,
        events,
        ..
    } = state;
    // Scroll by the speed at the start of the pass, even if a SlowMo lands mid-pass
    let speed = difficulty.speed;
    let reach = tuning.powerup_reach;
    let despawn_y = layout.despawn_y();

    powerups.retain_mut(|powerup| {
        powerup.pos.y += speed;

        if *phase == RunState::Playing && overlaps(player.pos(), powerup.pos, reach) {
            if let EntityKind::PowerUp(kind) = powerup.kind {
                match kind {
                    PowerUpKind::Shield => player.shield_ticks = tuning.shield_ticks,
                    PowerUpKind::SlowMo => difficulty.slow_down(tuning),
                }
                events.push(GameEvent::PowerUpCollected(kind));
                log::debug!("Collected {:?}", kind);
            }
            return false;
        }

        powerup.pos.y <= despawn_y
    });
}

/// Nearest obstacle still ahead of the player in `lane`, if any
pub fn nearest_obstacle_ahead(state: &GameState, lane: u8) -> Option<&Entity> {
    state
        .obstacles
        .iter()
        .filter(|o| o.lane == lane && o.pos.y < state.player.y + state.tuning.obstacle_reach)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
}

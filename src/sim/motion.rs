//! Lane-change motion and status timers for the player
//!
//! Lanes are discrete; only the horizontal position between two lane centers
//! is continuous. A move is locked in until it lands.

use super::state::Player;
use crate::layout::Layout;
use crate::tuning::{LaneEasing, Tuning};
use crate::{ease_out_cubic, lerp};

/// Lane-change direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    fn apply(self, lane: u8, last_lane: u8) -> Option<u8> {
        match self {
            Direction::Left => lane.checked_sub(1),
            Direction::Right if lane < last_lane => Some(lane + 1),
            Direction::Right => None,
        }
    }
}

/// Request a lane change. Returns whether the move was accepted.
///
/// Ignored while a move is in flight or when it would leave the road.
pub fn request_move(player: &mut Player, dir: Direction, tuning: &Tuning) -> bool {
    if player.moving {
        return false;
    }
    let Some(target) = dir.apply(player.current_lane, tuning.last_lane()) else {
        return false;
    };
    player.target_lane = target;
    player.moving = true;
    player.progress = 0.0;
    true
}

/// Advance an in-flight lane change by one tick
pub fn advance(player: &mut Player, tuning: &Tuning, layout: &Layout) {
    if !player.moving {
        return;
    }

    player.progress = (player.progress + tuning.lane_move_step).min(1.0);
    if player.progress >= 1.0 {
        // Land exactly on the lane center so drift never accumulates
        player.current_lane = player.target_lane;
        player.moving = false;
        player.progress = 0.0;
        player.x = layout.lane_x(player.current_lane);
    } else {
        sync_player_x(player, layout, tuning.lane_easing);
    }
}

/// Recompute the player's x from lanes and progress
pub fn sync_player_x(player: &mut Player, layout: &Layout, easing: LaneEasing) {
    let start = layout.lane_x(player.current_lane);
    if !player.moving {
        player.x = start;
        return;
    }
    let end = layout.lane_x(player.target_lane);
    let t = player.progress.min(1.0);
    let t = match easing {
        LaneEasing::Linear => t,
        LaneEasing::CubicOut => ease_out_cubic(t),
    };
    player.x = lerp(start, end, t);
}

/// Count the shield down by one tick
pub fn tick_shield(player: &mut Player) {
    player.shield_ticks = player.shield_ticks.saturating_sub(1);
}

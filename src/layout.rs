//! Viewport-derived geometry
//!
//! Recomputed whenever the host viewport changes. Nothing here is simulation
//! state: a resize swaps the layout and re-derives entity x positions, but
//! never resets a run.

use serde::{Deserialize, Serialize};

/// Portrait aspect the road is designed for (width / height)
pub const TARGET_ASPECT: f32 = 9.0 / 16.0;
/// Fraction of the canvas width covered by the road
pub const ROAD_WIDTH_FRACTION: f32 = 0.8;
/// Distance from the bottom edge to the player's center
pub const PLAYER_BOTTOM_OFFSET: f32 = 120.0;
/// Entities are retired once this far below the bottom edge
pub const DESPAWN_MARGIN: f32 = 50.0;
/// Obstacles appear this far above the top edge
pub const OBSTACLE_SPAWN_Y: f32 = -50.0;
/// Coins and power-ups appear this far above the top edge
pub const PICKUP_SPAWN_Y: f32 = -30.0;
/// Lane markings repeat every this many pixels
pub const ROAD_MARK_PERIOD: f32 = 40.0;

/// Default viewport used by headless runs and tests
pub const DEFAULT_VIEWPORT: (f32, f32) = (405.0, 720.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Canvas width after the aspect clamp
    pub width: f32,
    pub height: f32,
    pub road_left: f32,
    pub road_width: f32,
    pub lane_width: f32,
    pub lane_count: u8,
    /// Fixed vertical position of the player
    pub player_y: f32,
}

impl Layout {
    /// Derive the layout for a viewport, keeping at most a 9:16 width
    pub fn from_viewport(width: f32, height: f32, lane_count: u8) -> Self {
        let height = height.max(1.0);
        let mut width = width.max(1.0);
        if width / height > TARGET_ASPECT {
            width = height * TARGET_ASPECT;
        }

        let road_width = width * ROAD_WIDTH_FRACTION;
        let lanes = lane_count.max(1);
        Self {
            width,
            height,
            road_left: (width - road_width) / 2.0,
            road_width,
            lane_width: road_width / lanes as f32,
            lane_count: lanes,
            player_y: height - PLAYER_BOTTOM_OFFSET,
        }
    }

    /// Horizontal center of a lane
    #[inline]
    pub fn lane_x(&self, lane: u8) -> f32 {
        self.road_left + self.lane_width * lane as f32 + self.lane_width / 2.0
    }

    /// Entities below this y are off screen and get retired
    #[inline]
    pub fn despawn_y(&self) -> f32 {
        self.height + DESPAWN_MARGIN
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::from_viewport(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_viewport_clamped_to_portrait() {
        let layout = Layout::from_viewport(1920.0, 1080.0, 3);
        assert!((layout.width - 1080.0 * TARGET_ASPECT).abs() < 0.001);
        assert_eq!(layout.height, 1080.0);
    }

    #[test]
    fn test_lanes_centered_on_road() {
        let layout = Layout::from_viewport(400.0, 800.0, 3);
        // Road is 320 wide starting at 40, lanes are ~106.67 wide
        assert!((layout.lane_x(0) - (40.0 + 320.0 / 6.0)).abs() < 0.001);
        assert!((layout.lane_x(1) - 200.0).abs() < 0.001);
        assert!(layout.lane_x(2) < layout.road_left + layout.road_width);
        assert_eq!(layout.player_y, 680.0);
        assert_eq!(layout.despawn_y(), 850.0);
    }
}

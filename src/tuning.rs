//! Data-driven game balance
//!
//! Every constant that shapes a run lives here. Defaults reproduce the
//! classic Neon Drift feel at 60 ticks per second; any field can be
//! overridden from JSON and missing fields keep their default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading tuning overrides
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// How the player's horizontal position follows lane-change progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LaneEasing {
    /// Constant velocity (reads best on touch screens)
    #[default]
    Linear,
    /// Fast start, soft landing
    CubicOut,
}

/// Game balance parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Lanes ===
    /// Number of lanes on the road
    pub lane_count: u8,
    /// Lane the player starts each run in
    pub start_lane: u8,
    /// Lane-change progress added per tick (1.0 = full move)
    pub lane_move_step: f32,
    /// Interpolation curve for lane changes
    pub lane_easing: LaneEasing,

    // === Difficulty ===
    /// Starting speed, also the floor for SlowMo (pixels per tick)
    pub min_speed: f32,
    /// Speed ceiling (pixels per tick)
    pub max_speed: f32,
    /// Speed added every playing tick
    pub speed_ramp: f32,
    /// Score gained per tick, per unit of speed
    pub score_per_speed: f64,

    // === Spawning ===
    /// Obstacle threshold before speed is applied (ticks)
    pub obstacle_base_threshold: f32,
    /// Threshold reduction per unit of speed
    pub obstacle_speed_factor: f32,
    /// Obstacle threshold never drops below this (ticks)
    pub obstacle_min_threshold: f32,
    /// Coin timer threshold (ticks)
    pub coin_threshold: u32,
    /// Probability that a coin timer expiry actually spawns a coin
    pub coin_spawn_chance: f64,
    /// Power-up timer threshold (ticks)
    pub powerup_threshold: u32,

    // === Pickups ===
    /// Score bonus per collected coin
    pub coin_score_bonus: f64,
    /// Coins credited per collected coin
    pub coin_value: u64,
    /// Shield duration (ticks)
    pub shield_ticks: u32,
    /// Speed removed by SlowMo
    pub slowmo_amount: f32,
    /// Score points per coin earned at game over
    pub score_per_coin: f64,

    // === Collision reach (half-extent of the forgiving hit box) ===
    pub obstacle_reach: f32,
    pub coin_reach: f32,
    pub powerup_reach: f32,

    // === Effects ===
    /// Particles emitted when a shield absorbs an obstacle
    pub burst_particles: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_count: 3,
            start_lane: 1,
            lane_move_step: 0.15,
            lane_easing: LaneEasing::Linear,

            min_speed: 5.0,
            max_speed: 20.0,
            speed_ramp: 0.002,
            score_per_speed: 0.1,

            obstacle_base_threshold: 90.0,
            obstacle_speed_factor: 2.0,
            obstacle_min_threshold: 30.0,
            coin_threshold: 60,
            coin_spawn_chance: 0.3,
            powerup_threshold: 500,

            coin_score_bonus: 50.0,
            coin_value: 1,
            shield_ticks: 300,
            slowmo_amount: 5.0,
            score_per_coin: 10.0,

            obstacle_reach: 30.0,
            coin_reach: 40.0,
            powerup_reach: 40.0,

            burst_particles: 12,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject combinations the simulation cannot honor
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lane_count == 0 {
            return Err(TuningError::Invalid("lane_count must be at least 1".into()));
        }
        if self.start_lane >= self.lane_count {
            return Err(TuningError::Invalid(format!(
                "start_lane {} outside 0..{}",
                self.start_lane, self.lane_count
            )));
        }
        if !(self.lane_move_step > 0.0 && self.lane_move_step <= 1.0) {
            return Err(TuningError::Invalid("lane_move_step must be in (0, 1]".into()));
        }
        if !(self.min_speed > 0.0 && self.min_speed <= self.max_speed) {
            return Err(TuningError::Invalid(
                "speeds must satisfy 0 < min_speed <= max_speed".into(),
            ));
        }
        if self.speed_ramp < 0.0 || self.slowmo_amount < 0.0 {
            return Err(TuningError::Invalid("speed deltas must be non-negative".into()));
        }
        if !(0.0..=1.0).contains(&self.coin_spawn_chance) {
            return Err(TuningError::Invalid("coin_spawn_chance must be in [0, 1]".into()));
        }
        if self.score_per_coin <= 0.0 {
            return Err(TuningError::Invalid("score_per_coin must be positive".into()));
        }
        Ok(())
    }

    /// Obstacle spawn threshold at the given speed.
    ///
    /// Shrinks linearly with speed so density rises with difficulty.
    pub fn obstacle_threshold(&self, speed: f32) -> f32 {
        (self.obstacle_base_threshold - speed * self.obstacle_speed_factor)
            .max(self.obstacle_min_threshold)
    }

    /// Highest lane index
    pub fn last_lane(&self) -> u8 {
        self.lane_count.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_obstacle_threshold_curve() {
        let t = Tuning::default();
        assert_eq!(t.obstacle_threshold(5.0), 80.0);
        assert_eq!(t.obstacle_threshold(20.0), 50.0);
        // Floor kicks in for very high speeds
        assert_eq!(t.obstacle_threshold(40.0), 30.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "lane_count": 4, "max_speed": 25.0 }"#).unwrap();
        assert_eq!(t.lane_count, 4);
        assert_eq!(t.max_speed, 25.0);
        assert_eq!(t.min_speed, 5.0);
        assert_eq!(t.shield_ticks, 300);
    }

    #[test]
    fn test_easing_from_json() {
        let t = Tuning::from_json(r#"{ "lane_easing": "cubic_out" }"#).unwrap();
        assert_eq!(t.lane_easing, LaneEasing::CubicOut);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        assert!(matches!(
            Tuning::from_json(r#"{ "min_speed": 30.0 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "lane_count": 2, "start_lane": 2 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }
}

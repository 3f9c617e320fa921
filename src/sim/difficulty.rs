//! Speed ramp and score accrual

use super::state::DifficultyState;
use crate::tuning::Tuning;

impl DifficultyState {
    /// Ramp speed by one tick, capped at the ceiling
    pub fn ramp(&mut self, tuning: &Tuning) {
        self.speed = (self.speed + tuning.speed_ramp).min(tuning.max_speed);
    }

    /// SlowMo: knock speed down, never below the starting speed
    pub fn slow_down(&mut self, tuning: &Tuning) {
        self.speed = (self.speed - tuning.slowmo_amount).max(tuning.min_speed);
    }

    /// Score earned for one tick at the current speed
    pub fn score_gain(&self, tuning: &Tuning) -> f64 {
        self.speed as f64 * tuning.score_per_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ramp_caps_at_max() {
        let tuning = Tuning::default();
        let mut d = DifficultyState { speed: 19.999 };
        d.ramp(&tuning);
        assert_eq!(d.speed, 20.0);
        d.ramp(&tuning);
        assert_eq!(d.speed, 20.0);
    }

    #[test]
    fn test_slow_down_floors_at_min() {
        let tuning = Tuning::default();
        let mut d = DifficultyState { speed: 12.0 };
        d.slow_down(&tuning);
        assert_eq!(d.speed, 7.0);
        d.slow_down(&tuning);
        assert_eq!(d.speed, 5.0);
    }

    #[test]
    fn test_score_gain_linear_in_speed() {
        let tuning = Tuning::default();
        let slow = DifficultyState { speed: 5.0 }.score_gain(&tuning);
        let fast = DifficultyState { speed: 10.0 }.score_gain(&tuning);
        assert!((slow - 0.5).abs() < 1e-9);
        assert!((fast - 2.0 * slow).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_speed_stays_in_bounds(ops in proptest::collection::vec(any::<bool>(), 0..2000)) {
            let tuning = Tuning::default();
            let mut d = DifficultyState { speed: tuning.min_speed };
            for slow in ops {
                let before = d.speed;
                if slow {
                    d.slow_down(&tuning);
                } else {
                    d.ramp(&tuning);
                    prop_assert!(d.speed >= before);
                }
                prop_assert!(d.speed >= tuning.min_speed);
                prop_assert!(d.speed <= tuning.max_speed);
            }
        }
    }
}

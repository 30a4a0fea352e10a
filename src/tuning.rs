//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be reconfigured from JSON
//! without touching the simulation. Missing fields fall back to [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::platform::Storage;

/// Failure to build a [`Tuning`] from external data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay constants for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawner ===
    pub spawn_interval_ms: f64,
    pub min_obstacle_distance: f32,
    pub min_obstacle_size: f32,
    pub max_obstacle_size: f32,
    pub obstacle_width_ratio: f32,
    pub max_obstacles: usize,

    // === Motion / scoring ===
    pub base_speed: f32,
    pub score_increment: u64,
    pub removal_margin: f32,
    pub collision_tolerance: f32,

    // === Player ===
    pub jump_duration_ms: f64,
    pub jump_height: f32,
    pub player_x: f32,
    pub player_size: f32,

    // === Flow ===
    pub countdown_steps: u32,
    pub countdown_step_ms: f64,
    pub initial_delay_ms: f64,

    // === Layout ===
    pub lane_count: u32,
    pub lane_height: f32,
    pub viewport_width: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            min_obstacle_distance: MIN_OBSTACLE_DISTANCE,
            min_obstacle_size: MIN_OBSTACLE_SIZE,
            max_obstacle_size: MAX_OBSTACLE_SIZE,
            obstacle_width_ratio: OBSTACLE_WIDTH_RATIO,
            max_obstacles: MAX_OBSTACLES,

            base_speed: BASE_SPEED,
            score_increment: SCORE_INCREMENT,
            removal_margin: REMOVAL_MARGIN,
            collision_tolerance: COLLISION_TOLERANCE,

            jump_duration_ms: JUMP_DURATION_MS,
            jump_height: JUMP_HEIGHT,
            player_x: PLAYER_X,
            player_size: PLAYER_SIZE,

            countdown_steps: COUNTDOWN_STEPS,
            countdown_step_ms: COUNTDOWN_STEP_MS,
            initial_delay_ms: INITIAL_DELAY_MS,

            lane_count: LANE_COUNT,
            lane_height: LANE_HEIGHT,
            viewport_width: VIEWPORT_WIDTH,
        }
    }
}

impl Tuning {
    /// Storage key for an optional JSON override
    pub const STORAGE_KEY: &'static str = "tuning";

    /// Parse a (possibly partial) JSON object over the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load the stored override, falling back to defaults when it is missing or bad
    pub fn load(storage: &dyn Storage) -> Self {
        let Some(json) = storage.get_item(Self::STORAGE_KEY) else {
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning override");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring stored tuning: {}", e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field, reason| Err(TuningError::Invalid { field, reason });

        let timings = [
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("jump_duration_ms", self.jump_duration_ms),
            ("countdown_step_ms", self.countdown_step_ms),
            ("initial_delay_ms", self.initial_delay_ms),
        ];
        for (field, value) in timings {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(field, "must be a finite, non-negative duration");
            }
        }

        let lengths = [
            ("min_obstacle_distance", self.min_obstacle_distance),
            ("removal_margin", self.removal_margin),
            ("collision_tolerance", self.collision_tolerance),
            ("jump_height", self.jump_height),
            ("player_x", self.player_x),
        ];
        for (field, value) in lengths {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(field, "must be finite and non-negative");
            }
        }

        if self.lane_count == 0 {
            return invalid("lane_count", "must be at least 1");
        }
        if self.max_obstacles == 0 {
            return invalid("max_obstacles", "must be at least 1");
        }
        if self.score_increment == 0 {
            return invalid("score_increment", "must be positive");
        }
        if !(self.min_obstacle_size > 0.0 && self.min_obstacle_size <= self.max_obstacle_size) {
            return invalid("min_obstacle_size", "must be positive and <= max_obstacle_size");
        }
        if !(self.max_obstacle_size.is_finite() && self.max_obstacle_size <= self.lane_height) {
            return invalid("max_obstacle_size", "must fit inside one lane");
        }
        if !(self.obstacle_width_ratio.is_finite() && self.obstacle_width_ratio > 0.0) {
            return invalid("obstacle_width_ratio", "must be positive");
        }
        if !(self.player_size.is_finite() && self.player_size > 0.0) {
            return invalid("player_size", "must be positive");
        }
        if !(self.base_speed.is_finite() && self.base_speed > 0.0) {
            return invalid("base_speed", "must be positive");
        }
        if !(self.viewport_width.is_finite() && self.viewport_width > self.player_x) {
            return invalid("viewport_width", "must be wider than player_x");
        }
        if !(self.lane_height.is_finite() && self.lane_height >= self.player_size + self.jump_height) {
            return invalid("lane_height", "must fit the player at the top of a jump");
        }
        Ok(())
    }

    /// Full arena height (all lanes stacked)
    pub fn viewport_height(&self) -> f32 {
        self.lane_count as f32 * self.lane_height
    }

    /// Y coordinate of a lane's floor (bottom edge of its band)
    pub fn lane_floor(&self, lane: u32) -> f32 {
        (lane + 1) as f32 * self.lane_height
    }

    /// Lane the player starts each run in
    pub fn center_lane(&self) -> u32 {
        self.lane_count / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.center_lane(), 1);
        assert_eq!(tuning.viewport_height(), 600.0);
        assert_eq!(tuning.lane_floor(0), 200.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "lane_count": 5, "base_speed": 7.5 }"#).unwrap();
        assert_eq!(tuning.lane_count, 5);
        assert_eq!(tuning.base_speed, 7.5);
        assert_eq!(tuning.max_obstacles, MAX_OBSTACLES);
        assert_eq!(tuning.center_lane(), 2);
    }

    #[test]
    fn test_rejects_zero_lanes() {
        let err = Tuning::from_json(r#"{ "lane_count": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "lane_count", .. }));
    }

    #[test]
    fn test_rejects_obstacle_taller_than_lane() {
        let err = Tuning::from_json(r#"{ "min_obstacle_size": 250, "max_obstacle_size": 300 }"#)
            .unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "max_obstacle_size", .. }));

        // Exactly one lane tall still fits
        let tuning = Tuning {
            max_obstacle_size: LANE_HEIGHT,
            ..Default::default()
        };
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_width_ratio() {
        for ratio in ["0", "-0.5"] {
            let json = format!(r#"{{ "obstacle_width_ratio": {} }}"#, ratio);
            let err = Tuning::from_json(&json).unwrap_err();
            assert!(matches!(err, TuningError::Invalid { field: "obstacle_width_ratio", .. }));
        }
    }

    #[test]
    fn test_rejects_non_finite_timings() {
        let tuning = Tuning {
            spawn_interval_ms: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid { field: "spawn_interval_ms", .. })
        ));

        let tuning = Tuning {
            jump_duration_ms: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid { field: "jump_duration_ms", .. })
        ));

        let tuning = Tuning {
            initial_delay_ms: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid { field: "initial_delay_ms", .. })
        ));
    }

    #[test]
    fn test_load_from_storage() {
        let mut storage = MemoryStorage::new();
        assert_eq!(Tuning::load(&storage), Tuning::default());

        storage
            .set_item(Tuning::STORAGE_KEY, r#"{ "base_speed": 8 }"#)
            .unwrap();
        assert_eq!(Tuning::load(&storage).base_speed, 8.0);

        storage
            .set_item(Tuning::STORAGE_KEY, r#"{ "lane_count": 0 }"#)
            .unwrap();
        assert_eq!(Tuning::load(&storage), Tuning::default());
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ lane_count: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }
}

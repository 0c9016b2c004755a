//! Data-driven physics tuning
//!
//! Every constant the tick reads lives here so a level or a config file can
//! override it. Missing fields fall back to the defaults in `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::StoreError;

/// Physics constants used by `sim::tick`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub movement_speed: f32,
    pub jump_force: f32,
    pub player_size: f32,
    pub player_weight: f32,
    pub coyote_time: f32,
    pub jump_buffer: f32,
    pub trampoline_tolerance: f32,
    pub fall_death_margin: f32,
    /// Seconds between falling off the level and the reset
    pub fall_reset_delay: f64,
    /// Seconds between a spike hit and the full-state reset
    pub spike_reset_delay: f64,
    pub max_frame_dt: f32,
    pub level_width: f32,
    pub level_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            movement_speed: MOVEMENT_SPEED,
            jump_force: JUMP_FORCE,
            player_size: PLAYER_SIZE,
            player_weight: PLAYER_WEIGHT,
            coyote_time: COYOTE_TIME_DURATION,
            jump_buffer: JUMP_BUFFER_DURATION,
            trampoline_tolerance: TRAMPOLINE_TOLERANCE,
            fall_death_margin: FALL_DEATH_MARGIN,
            fall_reset_delay: FALL_RESET_DELAY,
            spike_reset_delay: SPIKE_RESET_DELAY,
            max_frame_dt: MAX_FRAME_DT,
            level_width: LEVEL_WIDTH,
            level_height: LEVEL_HEIGHT,
        }
    }
}

impl Tuning {
    /// Y coordinate past which the player is considered to have fallen off
    pub fn fall_limit(&self) -> f32 {
        self.level_height + self.fall_death_margin
    }

    /// Largest X the player's left edge may take
    pub fn max_player_x(&self) -> f32 {
        self.level_width - self.player_size
    }

    /// Reject values the tick cannot run with. NaN fails every check.
    pub fn validate(&self) -> Result<(), StoreError> {
        let checks = [
            (self.max_frame_dt > 0.0, "tuning.max_frame_dt must be positive"),
            (self.player_size > 0.0, "tuning.player_size must be positive"),
            (self.player_weight > 0.0, "tuning.player_weight must be positive"),
            (
                self.level_width > self.player_size,
                "tuning.level_width must exceed player_size",
            ),
            (self.level_height > 0.0, "tuning.level_height must be positive"),
            (
                self.fall_reset_delay >= 0.0 && self.spike_reset_delay >= 0.0,
                "tuning reset delays must not be negative",
            ),
        ];
        match checks.into_iter().find(|(ok, _)| !ok) {
            Some((_, reason)) => Err(StoreError::InvalidSettings(reason)),
            None => Ok(()),
        }
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
    fn test_validate_rejects_bad_values() {
        let negative_dt = Tuning {
            max_frame_dt: -1.0,
            ..Tuning::default()
        };
        assert!(matches!(
            negative_dt.validate(),
            Err(StoreError::InvalidSettings(_))
        ));
        let nan_size = Tuning {
            player_size: f32::NAN,
            ..Tuning::default()
        };
        assert!(nan_size.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{ "gravity": 1000.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 1000.0);
        assert_eq!(tuning.jump_force, JUMP_FORCE);
        assert_eq!(tuning.player_size, PLAYER_SIZE);
    }

    #[test]
    fn test_derived_limits() {
        let tuning = Tuning::default();
        assert_eq!(tuning.fall_limit(), 800.0);
        assert_eq!(tuning.max_player_x(), 770.0);
    }
}

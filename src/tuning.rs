//! Data-driven game balance
//!
//! Defaults match `consts`. A JSON override can be loaded for playtesting;
//! every field is optional in the JSON and falls back to the default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Balance knobs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Speed at run start (units/s)
    pub base_speed: f32,
    /// Speed ceiling
    pub max_speed: f32,
    /// Speed gained per recycled segment
    pub speed_increment: f32,
    pub segment_reward: u64,
    pub coin_reward: u64,
    pub gravity: f32,
    /// Upward velocity on jump
    pub jump_impulse: f32,
    /// Slide posture lock (seconds)
    pub slide_duration: f32,
    pub lane_lerp_rate: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            max_speed: MAX_SPEED,
            speed_increment: SPEED_INCREMENT,
            segment_reward: SEGMENT_REWARD,
            coin_reward: COIN_REWARD,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            slide_duration: SLIDE_DURATION,
            lane_lerp_rate: LANE_LERP_RATE,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.base_speed > 0.0) {
            return invalid("base_speed", "must be positive");
        }
        if self.max_speed < self.base_speed {
            return invalid("max_speed", "must not be below base_speed");
        }
        // One tick must not carry the player across an obstacle's depth band
        if self.max_speed * SIM_DT > 2.0 * OBSTACLE_DEPTH_TOLERANCE {
            return invalid("max_speed", "travels past an obstacle in one simulation step");
        }
        if self.speed_increment < 0.0 {
            return invalid("speed_increment", "must not be negative");
        }
        if !(self.gravity > 0.0) {
            return invalid("gravity", "must be positive");
        }
        if !(self.jump_impulse > 0.0) {
            return invalid("jump_impulse", "must be positive");
        }
        if !(self.slide_duration > 0.0) {
            return invalid("slide_duration", "must be positive");
        }
        if !(self.lane_lerp_rate > 0.0) {
            return invalid("lane_lerp_rate", "must be positive");
        }
        Ok(())
    }

    /// Number of recycles it takes to reach `max_speed`
    pub fn segments_to_max_speed(&self) -> u32 {
        if self.speed_increment <= 0.0 {
            return 0;
        }
        ((self.max_speed - self.base_speed) / self.speed_increment).round() as u32
    }
}

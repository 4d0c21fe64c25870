//! Player kinematics and intent handling

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ease_toward;
use crate::lane_offset;
use crate::tuning::Tuning;

/// Discrete commands from any input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
    Slide,
}

/// Why the player ignored an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Already in the outermost lane on that side
    EdgeLane,
    /// Jump or slide while already jumping or sliding
    PostureLocked,
}

/// The runner. Rebuilt from scratch on every run start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Target lane: -1 left, 0 center, 1 right
    pub lane: i8,
    /// Actual lateral offset, eased toward the lane center
    pub x: f32,
    /// Height above the floor
    pub height: f32,
    pub vertical_velocity: f32,
    /// Longitudinal position; decreases as the player runs
    pub z: f32,
    pub is_jumping: bool,
    pub is_sliding: bool,
    /// Seconds of slide left
    pub slide_timer: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            lane: 0,
            x: 0.0,
            height: 0.0,
            vertical_velocity: 0.0,
            z: 0.0,
            is_jumping: false,
            is_sliding: false,
            slide_timer: 0.0,
        }
    }
}

impl Player {
    /// Apply one intent, or say why it changed nothing
    ///
    /// Phase gating is the caller's job.
    pub fn apply_intent(&mut self, intent: Intent, tuning: &Tuning) -> Result<(), Refusal> {
        match intent {
            Intent::MoveLeft | Intent::MoveRight => {
                let step = if intent == Intent::MoveLeft { -1 } else { 1 };
                let lane = (self.lane + step).clamp(-1, 1);
                if lane == self.lane {
                    return Err(Refusal::EdgeLane);
                }
                self.lane = lane;
            }
            Intent::Jump => {
                if self.is_busy() {
                    return Err(Refusal::PostureLocked);
                }
                self.is_jumping = true;
                self.vertical_velocity = tuning.jump_impulse;
            }
            Intent::Slide => {
                if self.is_busy() {
                    return Err(Refusal::PostureLocked);
                }
                self.is_sliding = true;
                self.slide_timer = tuning.slide_duration;
            }
        }
        Ok(())
    }

    /// Jumping or sliding
    pub fn is_busy(&self) -> bool {
        self.is_jumping || self.is_sliding
    }

    /// Advance position, lane easing, jump arc and slide timer by `dt`
    pub fn integrate(&mut self, speed: f32, dt: f32, tuning: &Tuning) {
        self.z -= speed * dt;

        self.x = ease_toward(self.x, lane_offset(self.lane), dt * tuning.lane_lerp_rate);

        if self.is_jumping {
            self.vertical_velocity -= tuning.gravity * dt;
            self.height += self.vertical_velocity * dt;
            if self.height <= 0.0 {
                self.height = 0.0;
                self.vertical_velocity = 0.0;
                self.is_jumping = false;
            }
        }

        if self.is_sliding {
            self.slide_timer -= dt;
            if self.slide_timer <= 0.0 {
                self.slide_timer = 0.0;
                self.is_sliding = false;
            }
        }
    }

    /// World position for presentation (x lateral, y up, z longitudinal)
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.height, self.z)
    }
}

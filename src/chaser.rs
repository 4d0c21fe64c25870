//! The antagonist that runs behind the player
//!
//! Pure presentation: reads speed and phase, keeps its own position,
//! never writes to the simulation.

use glam::Vec3;
use serde::Serialize;

use crate::ease_toward;
use crate::sim::difficulty::chaser_gap;
use crate::sim::{GamePhase, GameState};

/// Per-frame easing toward the target distance
const FOLLOW_Z_FACTOR: f32 = 0.1;
/// Per-frame easing toward the target lateral position
const FOLLOW_X_FACTOR: f32 = 0.05;
/// Share of the player's lateral offset the chaser mirrors
const LATERAL_SHARE: f32 = 0.6;

const BOB_BASE: f32 = 1.0;
const BOB_AMPLITUDE: f32 = 0.1;
const BOB_BASE_RATE: f32 = 10.0;
const BOB_SPEED_RATE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Chaser {
    pub x: f32,
    pub z: f32,
    /// Seconds of presentation time, drives the bob
    pub time: f32,
}

impl Default for Chaser {
    fn default() -> Self {
        Self {
            x: 0.0,
            z: chaser_gap(0.0, GamePhase::Menu),
            time: 0.0,
        }
    }
}

impl Chaser {
    /// Snap behind a freshly started run
    pub fn reset(&mut self, state: &GameState) {
        *self = Self {
            z: state.player().z + chaser_gap(state.intensity(), state.phase()),
            ..Self::default()
        };
    }

    /// Ease toward the follow point for this frame
    pub fn follow(&mut self, state: &GameState, dt: f32) {
        let player = state.player();
        let target_z = player.z + chaser_gap(state.intensity(), state.phase());
        self.z = ease_toward(self.z, target_z, FOLLOW_Z_FACTOR);
        self.x = ease_toward(self.x, player.x * LATERAL_SHARE, FOLLOW_X_FACTOR);
        self.time += dt;
    }

    /// Hover height; bobs faster as the run speeds up
    pub fn bob_height(&self, speed: f32) -> f32 {
        let rate = BOB_BASE_RATE + BOB_SPEED_RATE * speed;
        BOB_BASE + (self.time * rate).sin() * BOB_AMPLITUDE
    }

    pub fn position(&self, speed: f32) -> Vec3 {
        Vec3::new(self.x, self.bob_height(speed), self.z)
    }
}

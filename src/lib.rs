//! Torelli's Run - a corridor endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (segments, player physics, collisions, game phase)
//! - `audio`: Speed-driven step sequencer and its Web Audio voice
//! - `renderer`: Read-only scene snapshot and GPU instance data for a presenter
//! - `input`: Keyboard/swipe to intent mapping
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod chaser;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use chaser::Chaser;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz, so one step never outruns a collision band)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 12;
    /// Nominal frame timestep (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta fed to the simulation (tab switches, hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Track geometry
    pub const LANE_COUNT: usize = 3;
    pub const LANE_WIDTH: f32 = 2.5;
    pub const SEGMENT_LENGTH: f32 = 10.0;
    pub const VISIBLE_SEGMENTS: usize = 12;
    /// Leading segments forced empty on a fresh run
    pub const SAFE_START_SEGMENTS: usize = 3;

    /// Forward speed (units/s)
    pub const BASE_SPEED: f32 = 10.0;
    pub const MAX_SPEED: f32 = 25.0;
    /// Speed gained per recycled segment
    pub const SPEED_INCREMENT: f32 = 0.1;

    /// Score rewards
    pub const SEGMENT_REWARD: u64 = 10;
    pub const COIN_REWARD: u64 = 50;

    /// Player physics
    pub const GRAVITY: f32 = 35.0;
    pub const JUMP_IMPULSE: f32 = 12.0;
    /// Slide posture lock (seconds)
    pub const SLIDE_DURATION: f32 = 0.8;
    /// Lateral easing rate (per second, multiplied by dt and clamped to 1)
    pub const LANE_LERP_RATE: f32 = 10.0;

    /// Segments farther than this from the player are not collision-tested
    pub const COLLISION_WINDOW: f32 = 10.0;
    pub const LATERAL_TOLERANCE: f32 = 0.8;
    pub const OBSTACLE_DEPTH_TOLERANCE: f32 = 0.8;
    pub const COIN_DEPTH_TOLERANCE: f32 = 1.0;
}

/// Lateral world offset of a lane (-1, 0, 1)
#[inline]
pub fn lane_offset(lane: i8) -> f32 {
    lane as f32 * consts::LANE_WIDTH
}

/// Lane value (-1, 0, 1) for a lane array index (0, 1, 2)
#[inline]
pub fn lane_for_index(index: usize) -> i8 {
    index as i8 - 1
}

/// Lane array index (0, 1, 2) for a lane value, if it is on the track
#[inline]
pub fn index_for_lane(lane: i8) -> Option<usize> {
    match lane {
        -1..=1 => Some((lane + 1) as usize),
        _ => None,
    }
}

/// Linear interpolation with the factor clamped to [0, 1]
#[inline]
pub fn ease_toward(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor.clamp(0.0, 1.0)
}

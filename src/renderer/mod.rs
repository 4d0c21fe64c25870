//! Presentation boundary
//!
//! Nothing here draws. The simulation is exposed as a read-only
//! `SceneSnapshot` (JSON for a JS presenter) and as packed instance buffers
//! for a GPU presenter.

pub mod instances;

pub use instances::{CoinInstance, ObstacleInstance, as_bytes, coin_instances, obstacle_instances};

use glam::Vec3;
use serde::Serialize;

use crate::chaser::Chaser;
use crate::sim::{GamePhase, GameState, Segment};

/// Player pose for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerPose {
    pub position: Vec3,
    pub lane: i8,
    pub is_jumping: bool,
    pub is_sliding: bool,
}

/// Everything a presenter needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub coins: u32,
    pub speed: f32,
    /// 0 at base speed, 1 at max speed
    pub intensity: f32,
    pub player: PlayerPose,
    pub chaser: Vec3,
    pub segments: Vec<Segment>,
}

impl SceneSnapshot {
    pub fn capture(state: &GameState, chaser: &Chaser) -> Self {
        let player = state.player();
        Self {
            phase: state.phase(),
            score: state.score(),
            coins: state.coins(),
            speed: state.speed(),
            intensity: state.intensity(),
            player: PlayerPose {
                position: player.position(),
                lane: player.lane,
                is_jumping: player.is_jumping,
                is_sliding: player.is_sliding,
            },
            chaser: chaser.position(state.speed()),
            segments: state.segments().iter().cloned().collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::VISIBLE_SEGMENTS;

    #[test]
    fn test_capture_reflects_state() {
        let mut state = GameState::new(5);
        state.start_game().unwrap();
        let mut chaser = Chaser::default();
        chaser.reset(&state);

        let snapshot = SceneSnapshot::capture(&state, &chaser);
        assert_eq!(snapshot.phase, GamePhase::Playing);
        assert_eq!(snapshot.speed, 10.0);
        assert_eq!(snapshot.intensity, 0.0);
        assert_eq!(snapshot.segments.len(), VISIBLE_SEGMENTS);
        assert_eq!(snapshot.player.position, Vec3::ZERO);
        assert_eq!(snapshot.chaser.z, 3.5);
    }

    #[test]
    fn test_json_shape() {
        let mut state = GameState::new(5);
        state.start_game().unwrap();
        let snapshot = SceneSnapshot::capture(&state, &Chaser::default());

        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["phase"], "Playing");
        assert_eq!(value["score"], 0);
        assert_eq!(value["segments"].as_array().unwrap().len(), VISIBLE_SEGMENTS);
        assert_eq!(value["player"]["position"].as_array().unwrap().len(), 3);
        assert_eq!(value["segments"][0]["lanes"][0], "None");
    }

    #[test]
    fn test_menu_snapshot_is_empty_track() {
        let state = GameState::new(5);
        let snapshot = SceneSnapshot::capture(&state, &Chaser::default());
        assert_eq!(snapshot.phase, GamePhase::Menu);
        assert!(snapshot.segments.is_empty());
    }
}

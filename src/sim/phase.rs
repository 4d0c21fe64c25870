//! Top-level game phase machine
//!
//! Menu --start--> Playing --hit--> GameOver --reset--> Menu. Nothing else.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a run to start
    #[default]
    Menu,
    /// Active run; the only phase that accepts gameplay mutations
    Playing,
    /// Run ended by a collision; final score/coins kept for display
    GameOver,
}

/// A request to move the phase machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseRequest {
    Start,
    Hit,
    Reset,
}

/// Rejected phase request. State is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {request:?} while in {from:?}")]
pub struct TransitionError {
    pub from: GamePhase,
    pub request: PhaseRequest,
}

impl GamePhase {
    /// Next phase for `request`, or an error if the transition does not exist
    pub fn transition(self, request: PhaseRequest) -> Result<GamePhase, TransitionError> {
        match (self, request) {
            (GamePhase::Menu, PhaseRequest::Start) => Ok(GamePhase::Playing),
            (GamePhase::Playing, PhaseRequest::Hit) => Ok(GamePhase::GameOver),
            (GamePhase::GameOver, PhaseRequest::Reset) => Ok(GamePhase::Menu),
            (from, request) => Err(TransitionError { from, request }),
        }
    }

    pub fn is_playing(self) -> bool {
        self == GamePhase::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cycle() {
        let phase = GamePhase::default();
        assert_eq!(phase, GamePhase::Menu);
        let phase = phase.transition(PhaseRequest::Start).unwrap();
        assert_eq!(phase, GamePhase::Playing);
        let phase = phase.transition(PhaseRequest::Hit).unwrap();
        assert_eq!(phase, GamePhase::GameOver);
        let phase = phase.transition(PhaseRequest::Reset).unwrap();
        assert_eq!(phase, GamePhase::Menu);
    }

    #[test]
    fn test_game_over_cannot_start_directly() {
        let err = GamePhase::GameOver
            .transition(PhaseRequest::Start)
            .unwrap_err();
        assert_eq!(err.from, GamePhase::GameOver);
        assert_eq!(err.request, PhaseRequest::Start);
        assert_eq!(err.to_string(), "cannot Start while in GameOver");
    }

    #[test]
    fn test_only_three_transitions_exist() {
        let phases = [GamePhase::Menu, GamePhase::Playing, GamePhase::GameOver];
        let requests = [PhaseRequest::Start, PhaseRequest::Hit, PhaseRequest::Reset];
        let valid = phases
            .iter()
            .flat_map(|p| requests.iter().map(move |r| p.transition(*r)))
            .filter(Result::is_ok)
            .count();
        assert_eq!(valid, 3);
    }
}

//! Soundtrack and sound effects
//!
//! `scheduler` decides *when* and *what* (pure, testable anywhere);
//! `web` voices it through the Web Audio API in the browser.

pub mod scheduler;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use scheduler::{LOOKAHEAD_SECS, MusicScheduler, SCHEDULER_INTERVAL_MS, ScheduledEvent, Voice};
#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

use crate::sim::GameEvent;

/// One-shot effects layered over the music
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Jump takeoff
    Jump,
    /// Coin picked up
    Coin,
    /// Run lost
    Crash,
}

impl SoundEffect {
    /// Effect to play for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::CoinCollected { .. } => Some(SoundEffect::Coin),
            GameEvent::Crashed { .. } => Some(SoundEffect::Crash),
            GameEvent::Slid | GameEvent::LaneChanged { .. } | GameEvent::SegmentPassed { .. } => {
                None
            }
        }
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, drawn in a fixed order
//! - Time only through the `dt` passed to `tick`
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod phase;
pub mod player;
pub mod segment;
pub mod state;
pub mod tick;

pub use collision::{Contact, coin_contacts, in_collision_window, obstacle_hit};
pub use difficulty::{chaser_gap, filter_cutoff_hz, intensity, speed_for_segments, tempo_bpm};
pub use phase::{GamePhase, PhaseRequest, TransitionError};
pub use player::{Intent, Player, Refusal};
pub use segment::{Decoration, HIGH_WALL_LABELS, Obstacle, Segment, SegmentId, generate_segment};
pub use state::GameState;
pub use tick::{FixedStep, GameEvent, TickInput, autopilot_intents, tick};

//! Per-frame simulation step
//!
//! `tick(state, input, dt)` is the only per-frame writer of `GameState`:
//! intents -> integrate -> recycle -> collide. No rendering, no clocks.
//! `FixedStep` turns variable frame times into whole `SIM_DT` ticks.

use serde::{Deserialize, Serialize};

use super::collision::{Contact, coin_contacts, in_collision_window, obstacle_hit, obstacle_in_lane};
use super::player::Intent;
use super::segment::{Obstacle, Segment};
use super::state::GameState;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, OBSTACLE_DEPTH_TOLERANCE, SIM_DT};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Intents captured since the last tick, in arrival order
    pub intents: Vec<Intent>,
    /// Idle/demo mode - the autopilot plays
    pub autopilot: bool,
}

impl TickInput {
    pub fn with_intents(intents: &[Intent]) -> Self {
        Self {
            intents: intents.to_vec(),
            autopilot: false,
        }
    }
}

/// Something that happened during a tick (for sound effects, HUD, logs)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Slid,
    LaneChanged { lane: i8 },
    SegmentPassed { speed: f32 },
    CoinCollected { lane: usize },
    Crashed { obstacle: Obstacle },
}

/// Seconds of travel ahead at which the autopilot commits to a jump or slide
const AUTOPILOT_REACT_SECS: f32 = 0.3;
/// Seconds of travel ahead the autopilot scans for pillars
const AUTOPILOT_SCAN_SECS: f32 = 0.6;
/// Minimum scan distance at low speed
const AUTOPILOT_MIN_SCAN: f32 = 6.0;

/// Advance the game by `dt` seconds
///
/// Does nothing outside `Playing`. A tick that ends in a crash collects no coins.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.phase().is_playing() {
        return events;
    }

    let mut intents = input.intents.clone();
    if input.autopilot {
        intents.extend(autopilot_intents(state));
    }
    for intent in intents {
        if state.apply_intent(intent) {
            events.push(match intent {
                Intent::Jump => GameEvent::Jumped,
                Intent::Slide => GameEvent::Slid,
                Intent::MoveLeft | Intent::MoveRight => GameEvent::LaneChanged {
                    lane: state.player().lane,
                },
            });
        }
    }

    state.integrate_player(dt);

    if state.player_passed_oldest() && state.recycle_segment() {
        events.push(GameEvent::SegmentPassed {
            speed: state.speed(),
        });
    }

    let player = state.player().clone();
    let hit = state
        .segments()
        .iter()
        .filter(|seg| in_collision_window(seg, player.z))
        .find_map(|seg| obstacle_hit(seg, &player));

    if let Some(Contact::Hit { lane, obstacle }) = hit {
        log::info!("Crashed into {:?} in lane {}", obstacle, lane);
        // Playing -> GameOver always exists here
        if state.end_game().is_ok() {
            events.push(GameEvent::Crashed { obstacle });
        }
        return events;
    }

    let touched: Vec<(usize, usize)> = state
        .segments()
        .iter()
        .enumerate()
        .filter(|(_, seg)| in_collision_window(seg, player.z))
        .flat_map(|(index, seg)| {
            coin_contacts(seg, &player).filter_map(move |contact| match contact {
                Contact::Coin { lane } => Some((index, lane)),
                Contact::Hit { .. } => None,
            })
        })
        .collect();

    for (index, lane) in touched {
        if state.collect_coin(index, lane) {
            events.push(GameEvent::CoinCollected { lane });
        }
    }

    events
}

/// Fixed-step accumulator between the frame clock and `tick`
///
/// Every tick it runs is exactly `SIM_DT` long, so at any valid speed the
/// player moves less than an obstacle's depth band per tick.
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    /// Run as many `SIM_DT` ticks as `frame_dt` (clamped to `MAX_FRAME_DT`) covers
    ///
    /// Intents in `input` are consumed by the first tick that runs; on a frame
    /// too short for a whole tick they wait for the next one.
    pub fn advance(
        &mut self,
        state: &mut GameState,
        input: &mut TickInput,
        frame_dt: f32,
    ) -> Vec<GameEvent> {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(tick(state, input, SIM_DT));
            self.accumulator -= SIM_DT;
            substeps += 1;
            // Clear one-shot inputs after processing
            input.intents.clear();
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of carrying it into the next frame
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        events
    }
}

/// Intents the demo autopilot would issue this tick
///
/// Looks at the nearest segment ahead with something in the player's lane:
/// jumps low walls, slides under high walls, and steers around pillars (or
/// around a wall it cannot clear because it is already mid-move).
pub fn autopilot_intents(state: &GameState) -> Vec<Intent> {
    let player = state.player();
    let speed = state.speed();
    let scan = (speed * AUTOPILOT_SCAN_SECS).max(AUTOPILOT_MIN_SCAN);
    let react = speed * AUTOPILOT_REACT_SECS;

    let threat = state.segments().iter().find_map(|seg| {
        let distance = player.z - seg.z;
        if distance < -OBSTACLE_DEPTH_TOLERANCE || distance > scan {
            return None;
        }
        match obstacle_in_lane(seg, player.lane) {
            Obstacle::None => None,
            obstacle => Some((seg, obstacle, distance)),
        }
    });

    let Some((segment, obstacle, distance)) = threat else {
        return Vec::new();
    };

    let posture = match obstacle {
        Obstacle::LowWall if !player.is_sliding => Some(Intent::Jump),
        Obstacle::HighWall if !player.is_jumping => Some(Intent::Slide),
        _ => None,
    };

    match posture {
        Some(intent) if distance <= react => {
            if player.is_busy() {
                // Already jumping over a low wall / sliding under a high wall
                Vec::new()
            } else {
                vec![intent]
            }
        }
        Some(_) => Vec::new(),
        None => steer_toward_open_lane(segment, player.lane)
            .into_iter()
            .collect(),
    }
}

/// One lane step toward the closest lane with no obstacle in `segment`
fn steer_toward_open_lane(segment: &Segment, lane: i8) -> Option<Intent> {
    let target = [lane - 1, lane + 1, lane - 2, lane + 2]
        .into_iter()
        .filter(|l| (-1..=1).contains(l))
        .find(|&l| obstacle_in_lane(segment, l) == Obstacle::None)?;
    if target < lane {
        Some(Intent::MoveLeft)
    } else {
        Some(Intent::MoveRight)
    }
}

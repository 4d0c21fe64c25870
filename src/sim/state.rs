//! World state and its mutation API
//!
//! `GameState` is the single owner of everything the simulation mutates.
//! Presentation, audio and input read it through accessors; the only writers
//! are the phase requests below and the per-tick step in `tick`.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::difficulty::{intensity, speed_for_segments};
use super::phase::{GamePhase, PhaseRequest, TransitionError};
use super::player::{Intent, Player, Refusal};
use super::segment::{Segment, SegmentId, generate_segment};
use crate::consts::*;
use crate::tuning::Tuning;

/// Complete simulation state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    seed: u64,
    rng: Pcg32,
    tuning: Tuning,
    phase: GamePhase,
    score: u64,
    coins: u32,
    /// Current forward speed; 0 outside a run
    speed: f32,
    /// Recycles this run; speed is derived from it
    segments_passed: u32,
    /// Rolling window, oldest (nearest the player) in front
    segments: VecDeque<Segment>,
    player: Player,
    /// Ticks spent in `Playing` this run
    time_ticks: u64,
    next_segment_id: u64,
}

impl GameState {
    /// Create an idle state in `Menu` with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Menu,
            score: 0,
            coins: 0,
            speed: 0.0,
            segments_passed: 0,
            segments: VecDeque::with_capacity(VISIBLE_SEGMENTS),
            player: Player::default(),
            time_ticks: 0,
            next_segment_id: 1,
        }
    }

    // === Read accessors ===

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Where the current speed sits in the tuning's range, 0 to 1
    pub fn intensity(&self) -> f32 {
        intensity(&self.tuning, self.speed)
    }

    pub fn segments_passed(&self) -> u32 {
        self.segments_passed
    }

    /// Live window, oldest first
    pub fn segments(&self) -> &VecDeque<Segment> {
        &self.segments
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    // === Phase requests ===

    /// Menu -> Playing. Resets counters, rebuilds the player and the window.
    pub fn start_game(&mut self) -> Result<(), TransitionError> {
        self.phase = self.request(PhaseRequest::Start)?;
        self.score = 0;
        self.coins = 0;
        self.segments_passed = 0;
        self.speed = speed_for_segments(&self.tuning, 0);
        self.time_ticks = 0;
        self.player = Player::default();

        self.segments.clear();
        for i in 0..VISIBLE_SEGMENTS {
            let z = -(i as f32 * SEGMENT_LENGTH);
            let id = self.next_segment_id();
            let segment = if i < SAFE_START_SEGMENTS {
                Segment::empty(id, z)
            } else {
                generate_segment(&mut self.rng, id, z)
            };
            self.segments.push_back(segment);
        }

        log::info!("Run started (seed {}, speed {})", self.seed, self.speed);
        Ok(())
    }

    /// Playing -> GameOver. Freezes speed at 0 and keeps score/coins.
    pub fn end_game(&mut self) -> Result<(), TransitionError> {
        self.phase = self.request(PhaseRequest::Hit)?;
        self.speed = 0.0;
        log::info!(
            "Game over: score {}, coins {}, {} segments",
            self.score,
            self.coins,
            self.segments_passed
        );
        Ok(())
    }

    /// GameOver -> Menu. Clears counters; the segment window stays until the next start.
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        self.phase = self.request(PhaseRequest::Reset)?;
        self.score = 0;
        self.coins = 0;
        self.speed = 0.0;
        self.segments_passed = 0;
        log::info!("Back to menu");
        Ok(())
    }

    fn request(&self, request: PhaseRequest) -> Result<GamePhase, TransitionError> {
        self.phase.transition(request).inspect_err(|err| {
            log::warn!("Phase request rejected: {}", err);
        })
    }

    // === Gameplay mutations (Playing only) ===

    /// Drop the oldest segment, append a fresh one, speed up and score
    ///
    /// Returns false outside `Playing`. Panics if the window is empty, which
    /// cannot happen once a run has started.
    pub fn recycle_segment(&mut self) -> bool {
        if !self.phase.is_playing() {
            return false;
        }

        let Some(last_z) = self.segments.back().map(|s| s.z) else {
            panic!("segment window is empty; nothing to recycle");
        };

        let id = self.next_segment_id();
        let fresh = generate_segment(&mut self.rng, id, last_z - SEGMENT_LENGTH);
        self.segments.pop_front();
        self.segments.push_back(fresh);

        self.segments_passed += 1;
        self.speed = speed_for_segments(&self.tuning, self.segments_passed);
        self.score += self.tuning.segment_reward;

        log::trace!(
            "Recycled segment #{} (speed {:.1}, score {})",
            self.segments_passed,
            self.speed,
            self.score
        );
        true
    }

    /// Take the coin at (`segment_index`, `lane`) if it is still there
    ///
    /// Clearing the flag and granting the reward happen together, so the same
    /// coin can never be counted twice.
    pub fn collect_coin(&mut self, segment_index: usize, lane: usize) -> bool {
        if !self.phase.is_playing() {
            return false;
        }
        let Some(flag) = self
            .segments
            .get_mut(segment_index)
            .and_then(|s| s.coins.get_mut(lane))
        else {
            return false;
        };
        if !*flag {
            return false;
        }

        *flag = false;
        self.coins += 1;
        self.score += self.tuning.coin_reward;
        true
    }

    /// Feed one intent to the player
    ///
    /// Ignored outside `Playing`, at the edge lane, or under a posture lock.
    pub fn apply_intent(&mut self, intent: Intent) -> bool {
        if !self.phase.is_playing() {
            log::trace!("Ignoring {:?} outside a run", intent);
            return false;
        }
        match self.player.apply_intent(intent, &self.tuning) {
            Ok(()) => true,
            Err(Refusal::EdgeLane) => {
                log::trace!("Ignoring {:?} (already in lane {})", intent, self.player.lane);
                false
            }
            Err(Refusal::PostureLocked) => {
                log::trace!("Ignoring {:?} (posture locked)", intent);
                false
            }
        }
    }

    /// Advance the player's kinematics by `dt` at the current speed
    pub(crate) fn integrate_player(&mut self, dt: f32) {
        self.player.integrate(self.speed, dt, &self.tuning);
        self.time_ticks += 1;
    }

    /// True once the player is past the far edge of the oldest segment
    pub fn player_passed_oldest(&self) -> bool {
        self.segments
            .front()
            .is_some_and(|oldest| self.player.z < oldest.z - SEGMENT_LENGTH)
    }

    fn next_segment_id(&mut self) -> SegmentId {
        let id = SegmentId(self.next_segment_id);
        self.next_segment_id += 1;
        id
    }

    #[cfg(test)]
    pub(crate) fn segments_mut(&mut self) -> &mut VecDeque<Segment> {
        &mut self.segments
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }
}

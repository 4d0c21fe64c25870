//! Lookahead step sequencer
//!
//! Polled on its own timer (every `SCHEDULER_INTERVAL_MS`), independent of
//! the frame loop. Each poll emits every sixteenth note that falls inside the
//! lookahead window, timestamped on the audio clock. Reads intensity and
//! phase, never writes simulation state.

use serde::Serialize;

use crate::sim::GamePhase;
use crate::sim::difficulty::{filter_cutoff_hz, sixteenth_secs};

/// How far ahead of the audio clock notes are scheduled (seconds)
pub const LOOKAHEAD_SECS: f64 = 0.1;
/// Poll period of the scheduler timer
pub const SCHEDULER_INTERVAL_MS: i32 = 25;
/// Steps in one bar of the pattern
pub const PATTERN_STEPS: u8 = 16;
/// If the clock jumps further than this past the next note, restart from now
const MAX_CATCH_UP_SECS: f64 = 0.5;

/// C2 and Eb2
const BASS_ROOT_HZ: f32 = 65.41;
const BASS_SECOND_HZ: f32 = 77.78;
const BASS_STEPS: [u8; 8] = [0, 2, 3, 6, 8, 10, 11, 14];
/// C4 Eb4 G4 Bb4
const ARPEGGIO_HZ: [f32; 4] = [261.63, 311.13, 392.00, 466.16];

/// Instrument a note is played on
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Voice {
    Kick,
    Snare,
    HiHat,
    Bass { hz: f32 },
    Lead { hz: f32 },
}

/// Something the audio sink should do
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ScheduledEvent {
    /// Start a note at `time` on the audio clock
    Note { time: f64, voice: Voice },
    /// Glide the master low-pass toward `hz`, starting at `time`
    Cutoff { time: f64, hz: f32 },
}

/// Voices that sound on one step of the bar
pub fn voices_for_step(step: u8) -> Vec<Voice> {
    let mut voices = Vec::with_capacity(3);
    if step % 4 == 0 {
        voices.push(Voice::Kick);
    }
    if step == 4 || step == 12 {
        voices.push(Voice::Snare);
    }
    if step % 4 == 2 {
        voices.push(Voice::HiHat);
    }
    if BASS_STEPS.contains(&step) {
        let hz = if step > 8 { BASS_SECOND_HZ } else { BASS_ROOT_HZ };
        voices.push(Voice::Bass { hz });
    }
    if step % 2 == 1 {
        let hz = ARPEGGIO_HZ[(step / 2) as usize % ARPEGGIO_HZ.len()];
        voices.push(Voice::Lead { hz });
    }
    voices
}

/// Sequencer position
#[derive(Debug, Clone, Default)]
pub struct MusicScheduler {
    step: u8,
    next_note_time: f64,
    running: bool,
}

impl MusicScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    /// One timer poll at audio-clock time `now`
    ///
    /// `intensity` is `GameState::intensity`: it sets tempo and cutoff.
    /// Entering `Playing` restarts the bar at `now`; any other phase stops
    /// emission (already scheduled notes are left to ring out).
    pub fn poll(
        &mut self,
        now: f64,
        intensity: f32,
        phase: GamePhase,
        out: &mut Vec<ScheduledEvent>,
    ) {
        if !phase.is_playing() {
            if self.running {
                log::debug!("Music stopped at step {}", self.step);
            }
            self.running = false;
            return;
        }

        if !self.running || now - self.next_note_time > MAX_CATCH_UP_SECS {
            log::debug!("Music started at {:.3}", now);
            self.running = true;
            self.step = 0;
            self.next_note_time = now;
        }

        while self.next_note_time < now + LOOKAHEAD_SECS {
            let time = self.next_note_time;
            out.extend(
                voices_for_step(self.step)
                    .into_iter()
                    .map(|voice| ScheduledEvent::Note { time, voice }),
            );
            self.advance(now, intensity, out);
        }
    }

    /// Move to the next sixteenth at the tempo of the current intensity
    fn advance(&mut self, now: f64, intensity: f32, out: &mut Vec<ScheduledEvent>) {
        self.next_note_time += sixteenth_secs(intensity);
        self.step = (self.step + 1) % PATTERN_STEPS;
        out.push(ScheduledEvent::Cutoff {
            time: now,
            hz: filter_cutoff_hz(intensity),
        });
    }
}

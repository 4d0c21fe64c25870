//! Difficulty and tempo curves
//!
//! Speed is the only difficulty signal and moves only on segment recycles.
//! `intensity` places it inside the tuning's speed range; everything else
//! (music tempo, filter brightness, how close the chaser runs) is a
//! read-only mapping of that intensity.

use super::phase::GamePhase;
use crate::tuning::Tuning;

/// Tempo at base speed
pub const BASE_TEMPO_BPM: f32 = 100.0;
/// Tempo at max speed
pub const MAX_TEMPO_BPM: f32 = 160.0;
/// Low-pass cutoff at base speed (muffled)
pub const MIN_CUTOFF_HZ: f32 = 800.0;
/// Low-pass cutoff at max speed (bright)
pub const MAX_CUTOFF_HZ: f32 = 3000.0;

/// Chaser distance behind the player at base speed
pub const CHASER_BASE_GAP: f32 = 3.5;
/// Chaser distance behind the player at max speed
pub const CHASER_MIN_GAP: f32 = 2.0;
/// Chaser position relative to the player once the run is lost (ahead of them)
pub const CHASER_CAUGHT_GAP: f32 = -1.5;

/// Speed after `segments_passed` recycles, clamped to the tuning range
///
/// Computed from the count rather than accumulated so repeated increments
/// land on `max_speed` exactly.
pub fn speed_for_segments(tuning: &Tuning, segments_passed: u32) -> f32 {
    let speed = tuning.base_speed + segments_passed as f32 * tuning.speed_increment;
    speed.clamp(tuning.base_speed, tuning.max_speed)
}

/// Normalized intensity in [0, 1] across the tuning's speed range
///
/// A flat range (`max_speed == base_speed`) is all or nothing.
pub fn intensity(tuning: &Tuning, speed: f32) -> f32 {
    let range = tuning.max_speed - tuning.base_speed;
    if range <= 0.0 {
        return if speed >= tuning.max_speed { 1.0 } else { 0.0 };
    }
    ((speed - tuning.base_speed) / range).clamp(0.0, 1.0)
}

/// Music tempo: 100 BPM at intensity 0 up to 160 BPM at intensity 1
pub fn tempo_bpm(intensity: f32) -> f32 {
    BASE_TEMPO_BPM + (MAX_TEMPO_BPM - BASE_TEMPO_BPM) * intensity.clamp(0.0, 1.0)
}

/// Seconds per sixteenth note at `intensity`
pub fn sixteenth_secs(intensity: f32) -> f64 {
    60.0 / tempo_bpm(intensity) as f64 / 4.0
}

/// Low-pass cutoff that opens up as the run speeds up
pub fn filter_cutoff_hz(intensity: f32) -> f32 {
    MIN_CUTOFF_HZ + (MAX_CUTOFF_HZ - MIN_CUTOFF_HZ) * intensity.clamp(0.0, 1.0)
}

/// How far behind the player the chaser aims to be (negative = ahead)
pub fn chaser_gap(intensity: f32, phase: GamePhase) -> f32 {
    match phase {
        GamePhase::GameOver => CHASER_CAUGHT_GAP,
        _ => CHASER_BASE_GAP - (CHASER_BASE_GAP - CHASER_MIN_GAP) * intensity.clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_speed_reaches_max_exactly() {
        let tuning = Tuning::default();
        assert_eq!(speed_for_segments(&tuning, 0), 10.0);
        assert_eq!(speed_for_segments(&tuning, 150), 25.0);
        assert_eq!(speed_for_segments(&tuning, 151), 25.0);
        assert_eq!(speed_for_segments(&tuning, 10_000), 25.0);
        assert!(speed_for_segments(&tuning, 149) < 25.0);
    }

    #[test]
    fn test_intensity_follows_tuning_range() {
        let tuning = Tuning::default();
        assert_eq!(intensity(&tuning, 10.0), 0.0);
        assert_eq!(intensity(&tuning, 25.0), 1.0);
        assert_eq!(intensity(&tuning, 40.0), 1.0);
        // Frozen speed after game over
        assert_eq!(intensity(&tuning, 0.0), 0.0);

        let wide = Tuning {
            base_speed: 20.0,
            max_speed: 60.0,
            ..Tuning::default()
        };
        assert_eq!(intensity(&wide, 25.0), 0.125);
        assert_eq!(intensity(&wide, 60.0), 1.0);
        assert_eq!(tempo_bpm(intensity(&wide, 60.0)), MAX_TEMPO_BPM);
        assert_eq!(filter_cutoff_hz(intensity(&wide, 20.0)), MIN_CUTOFF_HZ);
    }

    #[test]
    fn test_flat_speed_range() {
        let flat = Tuning {
            base_speed: 15.0,
            max_speed: 15.0,
            ..Tuning::default()
        };
        assert_eq!(intensity(&flat, 15.0), 1.0);
        assert_eq!(intensity(&flat, 0.0), 0.0);
    }

    #[test]
    fn test_tempo_endpoints() {
        assert_eq!(tempo_bpm(0.0), 100.0);
        assert_eq!(tempo_bpm(1.0), 160.0);
        assert!((tempo_bpm(0.5) - 130.0).abs() < 1e-4);
        assert_eq!(tempo_bpm(-1.0), 100.0);
    }

    #[test]
    fn test_cutoff_endpoints() {
        assert_eq!(filter_cutoff_hz(0.0), 800.0);
        assert_eq!(filter_cutoff_hz(1.0), 3000.0);
        assert_eq!(filter_cutoff_hz(2.0), 3000.0);
    }

    #[test]
    fn test_sixteenth_at_base_tempo() {
        // 100 BPM -> 0.6 s per beat -> 0.15 s per sixteenth
        assert!((sixteenth_secs(0.0) - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_chaser_gap() {
        let tuning = Tuning::default();
        assert_eq!(chaser_gap(intensity(&tuning, 10.0), GamePhase::Playing), 3.5);
        assert!((chaser_gap(intensity(&tuning, 25.0), GamePhase::Playing) - 2.0).abs() < 1e-5);
        assert_eq!(chaser_gap(1.0, GamePhase::GameOver), CHASER_CAUGHT_GAP);
        // Below base (menu, speed 0) the gap never widens
        assert_eq!(chaser_gap(intensity(&tuning, 0.0), GamePhase::Menu), 3.5);
    }

    proptest! {
        #[test]
        fn prop_speed_monotonic_and_bounded(n in 0u32..1000) {
            let tuning = Tuning::default();
            let a = speed_for_segments(&tuning, n);
            let b = speed_for_segments(&tuning, n + 1);
            prop_assert!(b >= a);
            prop_assert!((10.0..=25.0).contains(&a));
        }

        #[test]
        fn prop_mappings_stay_in_range(speed in 0.0f32..40.0) {
            let level = intensity(&Tuning::default(), speed);
            prop_assert!((0.0..=1.0).contains(&level));
            let bpm = tempo_bpm(level);
            prop_assert!((BASE_TEMPO_BPM..=MAX_TEMPO_BPM).contains(&bpm));
            let hz = filter_cutoff_hz(level);
            prop_assert!((MIN_CUTOFF_HZ..=MAX_CUTOFF_HZ).contains(&hz));
            let gap = chaser_gap(level, GamePhase::Playing);
            prop_assert!((CHASER_MIN_GAP..=CHASER_BASE_GAP).contains(&gap));
        }
    }
}

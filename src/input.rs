//! Keyboard and touch input to intents
//!
//! Platform event plumbing lives in `main.rs`; this module only decides
//! which intent (if any) a key or a finished swipe means.

use glam::Vec2;

use crate::sim::Intent;

/// Minimum travel (CSS px) before a touch counts as a swipe
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// Map a `KeyboardEvent.key` value to an intent
pub fn intent_for_key(key: &str) -> Option<Intent> {
    match key {
        "ArrowLeft" => Some(Intent::MoveLeft),
        "ArrowRight" => Some(Intent::MoveRight),
        "ArrowUp" => Some(Intent::Jump),
        "ArrowDown" => Some(Intent::Slide),
        _ if key.len() == 1 => match key.to_ascii_lowercase().as_str() {
            "a" => Some(Intent::MoveLeft),
            "d" => Some(Intent::MoveRight),
            "w" => Some(Intent::Jump),
            "s" => Some(Intent::Slide),
            _ => None,
        },
        _ => None,
    }
}

/// Classify a drag from `start` to `end` (screen coordinates, y down)
///
/// The dominant axis wins; travel under the threshold is a tap and means nothing.
pub fn intent_for_swipe(start: Vec2, end: Vec2) -> Option<Intent> {
    let delta = end - start;
    if delta.x.abs() > delta.y.abs() {
        if delta.x.abs() <= SWIPE_THRESHOLD {
            None
        } else if delta.x > 0.0 {
            Some(Intent::MoveRight)
        } else {
            Some(Intent::MoveLeft)
        }
    } else if delta.y < -SWIPE_THRESHOLD {
        Some(Intent::Jump)
    } else if delta.y > SWIPE_THRESHOLD {
        Some(Intent::Slide)
    } else {
        None
    }
}

/// Remembers where the current touch began
#[derive(Debug, Clone, Copy, Default)]
pub struct SwipeTracker {
    start: Option<Vec2>,
}

impl SwipeTracker {
    pub fn begin(&mut self, x: f32, y: f32) {
        self.start = Some(Vec2::new(x, y));
    }

    /// Finish the gesture. A touch end with no matching start yields nothing.
    pub fn end(&mut self, x: f32, y: f32) -> Option<Intent> {
        let start = self.start.take()?;
        intent_for_swipe(start, Vec2::new(x, y))
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(intent_for_key("ArrowLeft"), Some(Intent::MoveLeft));
        assert_eq!(intent_for_key("a"), Some(Intent::MoveLeft));
        assert_eq!(intent_for_key("D"), Some(Intent::MoveRight));
        assert_eq!(intent_for_key("ArrowUp"), Some(Intent::Jump));
        assert_eq!(intent_for_key("W"), Some(Intent::Jump));
        assert_eq!(intent_for_key("s"), Some(Intent::Slide));
        assert_eq!(intent_for_key("ArrowDown"), Some(Intent::Slide));
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(intent_for_key(" "), None);
        assert_eq!(intent_for_key("Enter"), None);
        assert_eq!(intent_for_key("i"), None);
        // Multi-char names that merely start with a bound letter
        assert_eq!(intent_for_key("Shift"), None);
        assert_eq!(intent_for_key("Delete"), None);
    }

    #[test]
    fn test_swipe_directions() {
        let o = Vec2::new(100.0, 100.0);
        assert_eq!(intent_for_swipe(o, o + Vec2::new(80.0, 10.0)), Some(Intent::MoveRight));
        assert_eq!(intent_for_swipe(o, o + Vec2::new(-80.0, 30.0)), Some(Intent::MoveLeft));
        assert_eq!(intent_for_swipe(o, o + Vec2::new(5.0, -70.0)), Some(Intent::Jump));
        assert_eq!(intent_for_swipe(o, o + Vec2::new(-20.0, 90.0)), Some(Intent::Slide));
    }

    #[test]
    fn test_short_drags_are_taps() {
        let o = Vec2::ZERO;
        assert_eq!(intent_for_swipe(o, Vec2::new(50.0, 0.0)), None);
        assert_eq!(intent_for_swipe(o, Vec2::new(0.0, -50.0)), None);
        assert_eq!(intent_for_swipe(o, Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_tracker() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.end(0.0, 0.0), None);

        tracker.begin(200.0, 300.0);
        assert_eq!(tracker.end(200.0, 200.0), Some(Intent::Jump));
        // Start consumed
        assert_eq!(tracker.end(0.0, 0.0), None);

        tracker.begin(0.0, 0.0);
        tracker.cancel();
        assert_eq!(tracker.end(100.0, 0.0), None);
    }
}

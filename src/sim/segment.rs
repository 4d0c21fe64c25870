//! Procedural track segments
//!
//! A segment is one `SEGMENT_LENGTH` slice of corridor holding per-lane
//! obstacles, coins and wall dressing. Generation draws every random value as
//! a uniform `f32` so a scripted RNG can pin the output exactly.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::LANE_COUNT;

/// Labels painted on high walls (display only)
pub const HIGH_WALL_LABELS: [&str; 5] = [
    "Collegio Castiglioni",
    "Collegio Nuovo",
    "Collegio Senatore",
    "Collegio Valla",
    "LA CIGNA",
];

/// Opaque per-segment identifier, used only for change tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub u64);

/// What occupies a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Obstacle {
    #[default]
    None,
    /// Jump over
    LowWall,
    /// Slide under
    HighWall,
    /// Fills the lane; change lanes
    Pillar,
}

impl Obstacle {
    /// Stable numeric code for GPU instance data
    pub fn code(self) -> u32 {
        match self {
            Obstacle::None => 0,
            Obstacle::LowWall => 1,
            Obstacle::HighWall => 2,
            Obstacle::Pillar => 3,
        }
    }
}

/// Cosmetic dressing on the side wall. No gameplay effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Decoration {
    #[default]
    None,
    Door,
    NoticeBoard,
    FireExtinguisher,
    Poster,
}

/// One slice of the corridor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub id: SegmentId,
    /// Longitudinal position; more negative is farther down the corridor
    pub z: f32,
    /// Obstacles, indexed left/center/right
    pub lanes: [Obstacle; LANE_COUNT],
    /// Coin presence, indexed left/center/right
    pub coins: [bool; LANE_COUNT],
    /// Label per lane; only set on high walls
    pub high_wall_labels: [Option<&'static str>; LANE_COUNT],
    pub decoration: Decoration,
}

impl Segment {
    /// Obstacle-free, coin-free segment (safe start)
    pub fn empty(id: SegmentId, z: f32) -> Self {
        Self {
            id,
            z,
            lanes: [Obstacle::None; LANE_COUNT],
            coins: [false; LANE_COUNT],
            high_wall_labels: [None; LANE_COUNT],
            decoration: Decoration::None,
        }
    }

    /// True if at least one lane has no obstacle
    pub fn has_open_lane(&self) -> bool {
        self.lanes.contains(&Obstacle::None)
    }

    pub fn coin_count(&self) -> usize {
        self.coins.iter().filter(|&&c| c).count()
    }
}

/// Generate a populated segment at `z`
///
/// One lane is picked as the guaranteed-open lane (coin on a coin flip). Every
/// other lane rolls `r` in [0, 1): above 0.7 a pillar, above 0.5 a low wall,
/// above 0.4 a labelled high wall, otherwise empty with a coin flip.
pub fn generate_segment<R: Rng + ?Sized>(rng: &mut R, id: SegmentId, z: f32) -> Segment {
    let mut segment = Segment::empty(id, z);

    let open_lane = pick_index(rng, LANE_COUNT);

    for lane in 0..LANE_COUNT {
        if lane == open_lane {
            segment.coins[lane] = coin_flip(rng);
            continue;
        }

        let r: f32 = rng.random();
        if r > 0.7 {
            segment.lanes[lane] = Obstacle::Pillar;
        } else if r > 0.5 {
            segment.lanes[lane] = Obstacle::LowWall;
        } else if r > 0.4 {
            segment.lanes[lane] = Obstacle::HighWall;
            let label = HIGH_WALL_LABELS[pick_index(rng, HIGH_WALL_LABELS.len())];
            segment.high_wall_labels[lane] = Some(label);
        } else {
            segment.coins[lane] = coin_flip(rng);
        }
    }

    segment.decoration = roll_decoration(rng);
    segment
}

/// Thresholded draw; `None` takes the bottom 40%
fn roll_decoration<R: Rng + ?Sized>(rng: &mut R) -> Decoration {
    let r: f32 = rng.random();
    if r > 0.8 {
        Decoration::Door
    } else if r > 0.6 {
        Decoration::NoticeBoard
    } else if r > 0.5 {
        Decoration::FireExtinguisher
    } else if r > 0.4 {
        Decoration::Poster
    } else {
        Decoration::None
    }
}

fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.random::<f32>() > 0.5
}

/// Uniform index in [0, len)
fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    let r: f32 = rng.random();
    ((r * len as f32) as usize).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{RngCore, SeedableRng};
    use rand_pcg::Pcg32;

    /// Replays a fixed list of uniform draws
    struct ScriptedRng {
        draws: Vec<f32>,
        cursor: usize,
    }

    impl ScriptedRng {
        fn new(draws: &[f32]) -> Self {
            Self {
                draws: draws.to_vec(),
                cursor: 0,
            }
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            let draw = self.draws[self.cursor % self.draws.len()];
            self.cursor += 1;
            // f32 sampling keeps the top 24 bits
            ((draw * (1u32 << 24) as f32) as u32) << 8
        }

        fn next_u64(&mut self) -> u64 {
            self.next_u32() as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for byte in dest {
                *byte = self.next_u32() as u8;
            }
        }
    }

    #[test]
    fn test_scripted_rng_reproduces_draws() {
        let mut rng = ScriptedRng::new(&[0.25, 0.75]);
        assert_eq!(rng.random::<f32>(), 0.25);
        assert_eq!(rng.random::<f32>(), 0.75);
    }

    #[test]
    fn test_generate_exact_layout() {
        // open lane = 1 (0.5 * 3), its coin = yes (0.75)
        // lane 0: 0.875 -> pillar
        // lane 2: 0.4375 -> high wall, label index 0.0 -> first label
        // decoration 0.875 -> door
        let mut rng = ScriptedRng::new(&[0.5, 0.875, 0.75, 0.4375, 0.0, 0.875]);
        let seg = generate_segment(&mut rng, SegmentId(7), -30.0);

        assert_eq!(seg.id, SegmentId(7));
        assert_eq!(seg.z, -30.0);
        assert_eq!(
            seg.lanes,
            [Obstacle::Pillar, Obstacle::None, Obstacle::HighWall]
        );
        assert_eq!(seg.coins, [false, true, false]);
        assert_eq!(
            seg.high_wall_labels,
            [None, None, Some("Collegio Castiglioni")]
        );
        assert_eq!(seg.decoration, Decoration::Door);
    }

    #[test]
    fn test_generate_low_wall_and_empty_lane() {
        // open lane = 0 (0.125), no coin (0.25)
        // lane 1: 0.625 -> low wall
        // lane 2: 0.25 -> empty, coin 0.875 -> yes
        // decoration 0.125 -> none
        let mut rng = ScriptedRng::new(&[0.125, 0.25, 0.625, 0.25, 0.875, 0.125]);
        let seg = generate_segment(&mut rng, SegmentId(1), 0.0);

        assert_eq!(
            seg.lanes,
            [Obstacle::None, Obstacle::LowWall, Obstacle::None]
        );
        assert_eq!(seg.coins, [false, false, true]);
        assert_eq!(seg.high_wall_labels, [None; 3]);
        assert_eq!(seg.decoration, Decoration::None);
    }

    #[test]
    fn test_threshold_boundaries_are_inclusive_below() {
        // open lane 0 without coin; lane 1 rolls exactly 0.5 (high wall, not low);
        // lane 2 rolls 0.25 then loses its coin flip at exactly 0.5
        let mut rng = ScriptedRng::new(&[0.0, 0.0, 0.5, 0.0, 0.25, 0.5, 0.5]);
        let seg = generate_segment(&mut rng, SegmentId(2), 0.0);
        assert_eq!(seg.lanes[1], Obstacle::HighWall);
        assert_eq!(seg.lanes[2], Obstacle::None);
        assert_eq!(seg.coins, [false; 3]);
        assert_eq!(seg.decoration, Decoration::Poster);
    }

    #[test]
    fn test_pick_index_never_overflows() {
        let mut rng = ScriptedRng::new(&[0.999_999_94]);
        assert_eq!(pick_index(&mut rng, 3), 2);
    }

    #[test]
    fn test_empty_segment() {
        let seg = Segment::empty(SegmentId(3), -10.0);
        assert!(seg.lanes.iter().all(|&o| o == Obstacle::None));
        assert_eq!(seg.coin_count(), 0);
        assert_eq!(seg.decoration, Decoration::None);
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        for i in 0..50 {
            let z = -(i as f32) * 10.0;
            assert_eq!(
                generate_segment(&mut a, SegmentId(i), z),
                generate_segment(&mut b, SegmentId(i), z)
            );
        }
    }

    proptest! {
        #[test]
        fn prop_every_segment_has_an_open_lane(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            for i in 0..64 {
                let seg = generate_segment(&mut rng, SegmentId(i), 0.0);
                prop_assert!(seg.has_open_lane());
            }
        }

        #[test]
        fn prop_labels_only_on_high_walls(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            for i in 0..64 {
                let seg = generate_segment(&mut rng, SegmentId(i), 0.0);
                for lane in 0..LANE_COUNT {
                    let is_high = seg.lanes[lane] == Obstacle::HighWall;
                    prop_assert_eq!(seg.high_wall_labels[lane].is_some(), is_high);
                    // coins never share a lane with an obstacle
                    if seg.lanes[lane] != Obstacle::None {
                        prop_assert!(!seg.coins[lane]);
                    }
                }
            }
        }
    }
}

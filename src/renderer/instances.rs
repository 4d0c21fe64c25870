//! GPU instance data for obstacles and coins
//!
//! Layouts are `#[repr(C)]` and padded to 16 bytes so a presenter can upload
//! them straight into storage buffers.

use bytemuck::{Pod, Zeroable};

use crate::lane_for_index;
use crate::lane_offset;
use crate::sim::{GameState, HIGH_WALL_LABELS, Obstacle};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ObstacleInstance {
    pub position: [f32; 3],
    /// `Obstacle::code`
    pub kind: u32,
    /// Index into `HIGH_WALL_LABELS` plus one; 0 = no label
    pub label: u32,
    pub segment_id: u32,
    _pad: [u32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CoinInstance {
    pub position: [f32; 3],
    /// Spin angle in radians
    pub spin: f32,
}

/// Coin spin rate (radians per second)
const COIN_SPIN_RATE: f32 = 3.0;
/// Coins float at about waist height
const COIN_HEIGHT: f32 = 1.0;

fn label_code(label: Option<&str>) -> u32 {
    label
        .and_then(|l| HIGH_WALL_LABELS.iter().position(|known| *known == l))
        .map_or(0, |i| i as u32 + 1)
}

/// One instance per occupied lane in the live window
pub fn obstacle_instances(state: &GameState) -> Vec<ObstacleInstance> {
    state
        .segments()
        .iter()
        .flat_map(|seg| {
            seg.lanes
                .iter()
                .enumerate()
                .filter(|(_, obstacle)| **obstacle != Obstacle::None)
                .map(move |(lane, obstacle)| ObstacleInstance {
                    position: [lane_offset(lane_for_index(lane)), 0.0, seg.z],
                    kind: obstacle.code(),
                    label: label_code(seg.high_wall_labels[lane]),
                    segment_id: seg.id.0 as u32,
                    _pad: [0; 2],
                })
        })
        .collect()
}

/// One instance per uncollected coin; `time` drives the spin
pub fn coin_instances(state: &GameState, time: f32) -> Vec<CoinInstance> {
    let spin = (time * COIN_SPIN_RATE) % std::f32::consts::TAU;
    state
        .segments()
        .iter()
        .flat_map(|seg| {
            seg.coins
                .iter()
                .enumerate()
                .filter(|(_, present)| **present)
                .map(move |(lane, _)| CoinInstance {
                    position: [lane_offset(lane_for_index(lane)), COIN_HEIGHT, seg.z],
                    spin,
                })
        })
        .collect()
}

/// Raw bytes for a buffer upload
pub fn as_bytes<T: Pod>(instances: &[T]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

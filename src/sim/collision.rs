//! Player vs. segment collision
//!
//! Obstacles and coins are points at (lane center, segment z). The player
//! overlaps one when both the lateral and longitudinal distances are inside
//! fixed tolerances; posture then decides whether an obstacle overlap is a hit.

use super::player::Player;
use super::segment::{Obstacle, Segment};
use crate::consts::*;
use crate::{index_for_lane, lane_for_index, lane_offset};

/// Result of checking one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Player struck an obstacle in this lane index
    Hit { lane: usize, obstacle: Obstacle },
    /// Player is over a coin in this lane index
    Coin { lane: usize },
}

/// Whether a segment is close enough to be tested at all
#[inline]
pub fn in_collision_window(segment: &Segment, player_z: f32) -> bool {
    (segment.z - player_z).abs() <= COLLISION_WINDOW
}

/// Whether the player's posture clears an obstacle
pub fn posture_clears(obstacle: Obstacle, player: &Player) -> bool {
    match obstacle {
        Obstacle::None => true,
        Obstacle::Pillar => false,
        Obstacle::LowWall => player.is_jumping,
        Obstacle::HighWall => player.is_sliding,
    }
}

fn overlaps(player: &Player, lane: usize, z: f32, depth_tolerance: f32) -> bool {
    let lateral = (player.x - lane_offset(lane_for_index(lane))).abs();
    let depth = (player.z - z).abs();
    lateral < LATERAL_TOLERANCE && depth < depth_tolerance
}

/// First obstacle in `segment` the player hits, if any
pub fn obstacle_hit(segment: &Segment, player: &Player) -> Option<Contact> {
    segment
        .lanes
        .iter()
        .enumerate()
        .filter(|(_, obstacle)| **obstacle != Obstacle::None)
        .find(|(lane, obstacle)| {
            overlaps(player, *lane, segment.z, OBSTACLE_DEPTH_TOLERANCE)
                && !posture_clears(**obstacle, player)
        })
        .map(|(lane, obstacle)| Contact::Hit {
            lane,
            obstacle: *obstacle,
        })
}

/// Coins in `segment` the player is touching
pub fn coin_contacts<'a>(
    segment: &'a Segment,
    player: &'a Player,
) -> impl Iterator<Item = Contact> + 'a {
    segment
        .coins
        .iter()
        .enumerate()
        .filter(move |(lane, present)| {
            **present && overlaps(player, *lane, segment.z, COIN_DEPTH_TOLERANCE)
        })
        .map(|(lane, _)| Contact::Coin { lane })
}

/// Obstacle in lane -1/0/1 of `segment`; off-track lanes read as empty
pub fn obstacle_in_lane(segment: &Segment, lane: i8) -> Obstacle {
    index_for_lane(lane)
        .map(|i| segment.lanes[i])
        .unwrap_or(Obstacle::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::segment::SegmentId;

    fn segment_with(lane: usize, obstacle: Obstacle) -> Segment {
        let mut seg = Segment::empty(SegmentId(1), -20.0);
        seg.lanes[lane] = obstacle;
        seg
    }

    fn player_at(lane: i8, z: f32) -> Player {
        Player {
            lane,
            x: lane_offset(lane),
            z,
            ..Default::default()
        }
    }

    #[test]
    fn test_pillar_always_hits() {
        let seg = segment_with(1, Obstacle::Pillar);
        let mut player = player_at(0, -20.0);
        assert!(obstacle_hit(&seg, &player).is_some());
        player.is_jumping = true;
        assert!(obstacle_hit(&seg, &player).is_some());
        player.is_jumping = false;
        player.is_sliding = true;
        assert!(obstacle_hit(&seg, &player).is_some());
    }

    #[test]
    fn test_low_wall_cleared_by_jump() {
        let seg = segment_with(1, Obstacle::LowWall);
        let mut player = player_at(0, -20.0);
        assert_eq!(
            obstacle_hit(&seg, &player),
            Some(Contact::Hit {
                lane: 1,
                obstacle: Obstacle::LowWall
            })
        );
        player.is_jumping = true;
        assert_eq!(obstacle_hit(&seg, &player), None);
    }

    #[test]
    fn test_high_wall_cleared_by_slide() {
        let seg = segment_with(2, Obstacle::HighWall);
        let mut player = player_at(1, -20.0);
        assert!(obstacle_hit(&seg, &player).is_some());
        player.is_sliding = true;
        assert!(obstacle_hit(&seg, &player).is_none());
        // Jumping does not clear a high wall
        player.is_sliding = false;
        player.is_jumping = true;
        assert!(obstacle_hit(&seg, &player).is_some());
    }

    #[test]
    fn test_tolerances() {
        let seg = segment_with(1, Obstacle::Pillar);
        // Just outside longitudinal tolerance
        assert!(obstacle_hit(&seg, &player_at(0, -20.81)).is_none());
        assert!(obstacle_hit(&seg, &player_at(0, -20.79)).is_some());
        // Mid lane change, lateral 0.9 away
        let mut player = player_at(0, -20.0);
        player.x = 0.9;
        assert!(obstacle_hit(&seg, &player).is_none());
        player.x = 0.7;
        assert!(obstacle_hit(&seg, &player).is_some());
    }

    #[test]
    fn test_other_lane_is_safe() {
        let seg = segment_with(0, Obstacle::Pillar);
        assert!(obstacle_hit(&seg, &player_at(0, -20.0)).is_none());
        assert!(obstacle_hit(&seg, &player_at(-1, -20.0)).is_some());
    }

    #[test]
    fn test_coin_tolerance_is_wider() {
        let mut seg = Segment::empty(SegmentId(2), -20.0);
        seg.coins[1] = true;
        let near = player_at(0, -20.9);
        assert_eq!(
            coin_contacts(&seg, &near).collect::<Vec<_>>(),
            vec![Contact::Coin { lane: 1 }]
        );
        let far = player_at(0, -21.1);
        assert_eq!(coin_contacts(&seg, &far).count(), 0);
    }

    #[test]
    fn test_collision_window() {
        let seg = Segment::empty(SegmentId(3), -30.0);
        assert!(in_collision_window(&seg, -20.0));
        assert!(!in_collision_window(&seg, -10.0));
    }

    #[test]
    fn test_obstacle_in_lane() {
        let seg = segment_with(0, Obstacle::LowWall);
        assert_eq!(obstacle_in_lane(&seg, -1), Obstacle::LowWall);
        assert_eq!(obstacle_in_lane(&seg, 0), Obstacle::None);
        assert_eq!(obstacle_in_lane(&seg, 5), Obstacle::None);
    }
}

//! Body segments and their placement along the head trail.

use super::math::Pose;
use super::sampler::sample_at;
use super::trail::PathTrail;

/// One body unit of the snake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Position in the chain, 0 is directly behind the head.
    pub index: usize,
    pub pose: Pose,
}

impl Segment {
    pub fn new(index: usize, pose: Pose) -> Self {
        Self { index, pose }
    }
}

/// Arc length at which segment `index` sits when the head is at `head_distance`.
pub fn target_distance(head_distance: f32, index: usize, spacing: f32) -> f32 {
    head_distance - (index as f32 + 1.0) * spacing
}

/// Places every segment on the trail, `(i + 1) * spacing` behind the head.
///
/// Segments whose target lies before the start of the path keep their current
/// pose until the head has travelled far enough. Returns how many segments
/// were repositioned.
pub fn update_all(
    segments: &mut [Segment],
    trail: &PathTrail,
    head_distance: f32,
    spacing: f32,
) -> usize {
    let mut placed = 0;
    for (i, segment) in segments.iter_mut().enumerate() {
        let target = target_distance(head_distance, i, spacing);
        if target < 0.0 {
            continue;
        }
        if let Some(pose) = sample_at(trail, target) {
            segment.pose = pose;
            placed += 1;
        }
    }
    placed
}

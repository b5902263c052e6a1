//! The recorded path of the snake's head.
//!
//! Samples are stamped with the cumulative distance the head had travelled
//! when they were taken, so the trail is an arc-length parameterisation of the
//! path. Samples are only ever pushed at the tail and dropped from the front.

use std::collections::VecDeque;

use super::math::{Pose, DISTANCE_EPSILON};

/// One recorded head pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub pose: Pose,
    /// Arc length from the start of the path.
    pub distance: f32,
}

/// Ordered, strictly increasing (by distance) history of head poses.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTrail {
    samples: VecDeque<PathSample>,
    min_step: f32,
}

impl PathTrail {
    pub fn new() -> Self {
        Self::with_min_step(DISTANCE_EPSILON)
    }

    /// Trail that ignores appends shorter than `min_step`.
    pub fn with_min_step(min_step: f32) -> Self {
        Self {
            samples: VecDeque::new(),
            min_step: min_step.max(0.0),
        }
    }

    /// Drops all history and starts over with a single sample at distance 0.
    pub fn seed(&mut self, pose: Pose) {
        self.samples.clear();
        self.samples.push_back(PathSample {
            pose,
            distance: 0.0,
        });
    }

    /// Records `pose` `distance_delta` further along the path than the newest
    /// sample.
    ///
    /// Deltas below the minimum step (and non-finite deltas) are ignored so
    /// that no zero-length interval ever enters the trail. Returns whether a
    /// sample was added.
    pub fn append(&mut self, pose: Pose, distance_delta: f32) -> bool {
        if !(distance_delta >= self.min_step) || !distance_delta.is_finite() {
            return false;
        }
        let distance = self.total_distance() + distance_delta;
        self.samples.push_back(PathSample { pose, distance });
        true
    }

    /// Removes leading samples older than `min_required_distance`, always
    /// keeping at least one. Returns how many samples were removed.
    pub fn prune(&mut self, min_required_distance: f32) -> usize {
        let mut removed = 0;
        while self.samples.len() > 1 {
            match self.samples.front() {
                Some(front) if front.distance < min_required_distance => {
                    self.samples.pop_front();
                    removed += 1;
                }
                _ => break,
            }
        }
        removed
    }

    /// Shifts every distance stamp down by `offset`.
    ///
    /// Keeps stamps small on long sessions so that `f32` spacing stays well
    /// below a tick's movement. Intervals between samples are unchanged.
    pub fn rebase(&mut self, offset: f32) {
        for sample in &mut self.samples {
            sample.distance -= offset;
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Distance stamp of the newest sample, 0 for an empty trail.
    pub fn total_distance(&self) -> f32 {
        self.samples.back().map_or(0.0, |s| s.distance)
    }

    pub fn front(&self) -> Option<&PathSample> {
        self.samples.front()
    }

    pub fn back(&self) -> Option<&PathSample> {
        self.samples.back()
    }

    pub fn get(&self, index: usize) -> Option<&PathSample> {
        self.samples.get(index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &PathSample> + '_ {
        self.samples.iter()
    }
}

impl Default for PathTrail {
    fn default() -> Self {
        Self::new()
    }
}

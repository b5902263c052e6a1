//! Continuous snake locomotion.
//!
//! The head moves every tick along a smoothly steered heading and leaves a
//! [`PathTrail`] behind it. Body segments are then placed on that trail at
//! fixed arc-length offsets by the follower. Growth, shrinking and the speed
//! modifiers are requested by the game engine and food effects through the
//! public methods here; nothing else mutates [`SnakeState`].

use glam::{Vec2, Vec3};
use tracing::debug;

use super::config::SnakeConfig;
use super::follower::{self, Segment};
use super::math::{look_rotation, rotate_towards, stick_to_direction, Pose, FORWARD};
use super::trail::PathTrail;

/// Oldest trail stamp allowed before the trail is rebased to zero
pub const REBASE_DISTANCE: f32 = 1024.0;

/// Whether the controller advances on `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocomotionState {
    Idle,
    Active,
}

/// Everything the locomotion subsystem owns.
#[derive(Debug, Clone)]
pub struct SnakeState {
    pub head: Pose,
    pub current_direction: Vec3,
    pub target_direction: Vec3,
    pub speed: f32,
    pub speed_multiplier: f32,
    pub ghost_mode: bool,
    pub segments: Vec<Segment>,
    pub trail: PathTrail,
    /// Arc length of the newest trail sample, relative to the last rebase.
    pub total_distance: f32,
    /// Arc length dropped by rebasing.
    pub rebased_distance: f64,
}

/// Drives the head, the trail and the body.
#[derive(Debug, Clone)]
pub struct SnakeController {
    config: SnakeConfig,
    state: SnakeState,
    locomotion: LocomotionState,
    pending_turn: Option<Vec3>,
}

impl SnakeController {
    /// Create a controller already reset to its starting pose
    pub fn new(config: SnakeConfig) -> Self {
        let direction = config.start_direction.try_normalize().unwrap_or(FORWARD);
        let state = SnakeState {
            head: Pose::looking(config.start_position, direction),
            current_direction: direction,
            target_direction: direction,
            speed: config.move_speed,
            speed_multiplier: 1.0,
            ghost_mode: false,
            segments: Vec::new(),
            trail: PathTrail::with_min_step(config.min_sample_distance),
            total_distance: 0.0,
            rebased_distance: 0.0,
        };
        let mut controller = Self {
            config,
            state,
            locomotion: LocomotionState::Idle,
            pending_turn: None,
        };
        controller.reset();
        controller
    }

    pub fn config(&self) -> &SnakeConfig {
        &self.config
    }

    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    pub fn locomotion(&self) -> LocomotionState {
        self.locomotion
    }

    pub fn set_active(&mut self, active: bool) {
        self.locomotion = if active {
            LocomotionState::Active
        } else {
            LocomotionState::Idle
        };
    }

    pub fn is_active(&self) -> bool {
        self.locomotion == LocomotionState::Active
    }

    /// Queue a steering request from a 2D stick vector.
    ///
    /// Input inside the deadzone or with non-finite components is treated as
    /// no input. Returns whether the request was queued; a queued request can
    /// still be rejected as a reversal when the next tick applies it.
    pub fn request_turn(&mut self, input: Vec2) -> bool {
        match stick_to_direction(input, self.config.input_deadzone) {
            Some(direction) => {
                self.pending_turn = Some(direction);
                true
            }
            None => false,
        }
    }

    /// Whether steering toward `direction` would reverse onto the body.
    pub fn is_reversal(&self, direction: Vec3) -> bool {
        direction.dot(self.state.current_direction) < self.config.reversal_threshold
    }

    /// Advance one simulation step of `dt` seconds.
    ///
    /// Order: apply queued turn, steer, move head, record trail, place
    /// segments, prune trail. Does nothing while idle or for a non-positive
    /// or non-finite `dt`.
    pub fn tick(&mut self, dt: f32) {
        if self.locomotion == LocomotionState::Idle || !(dt > 0.0) || !dt.is_finite() {
            return;
        }

        if let Some(direction) = self.pending_turn.take() {
            if !self.is_reversal(direction) {
                self.state.target_direction = direction;
            }
        }

        let state = &mut self.state;
        if state.current_direction != state.target_direction {
            let max_radians = self.config.turn_speed_degrees.to_radians() * dt;
            state.current_direction =
                rotate_towards(state.current_direction, state.target_direction, max_radians);
        }

        let step = state.speed * state.speed_multiplier * dt;
        let position = state.head.position + state.current_direction * step;
        state.head = Pose::new(position, look_rotation(state.current_direction));

        let last_recorded = state
            .trail
            .back()
            .map_or(position, |sample| sample.pose.position);
        let moved = last_recorded.distance(position);
        if state.trail.append(state.head, moved) {
            state.total_distance = state.trail.total_distance();
        }

        follower::update_all(
            &mut state.segments,
            &state.trail,
            state.total_distance,
            self.config.segment_spacing,
        );

        let min_required = state.total_distance
            - (state.segments.len() as f32 + 2.0) * self.config.segment_spacing;
        state.trail.prune(min_required);

        if let Some(offset) = state
            .trail
            .front()
            .map(|sample| sample.distance)
            .filter(|distance| *distance > REBASE_DISTANCE)
        {
            state.trail.rebase(offset);
            state.total_distance = state.trail.total_distance();
            state.rebased_distance += f64::from(offset);
            debug!(offset, "trail rebased");
        }
    }

    /// Oldest arc length the trail still has to cover: two spacings past the
    /// farthest segment.
    pub fn min_required_distance(&self) -> f32 {
        let count = self.state.segments.len() as f32;
        self.state.total_distance - (count + 2.0) * self.config.segment_spacing
    }

    /// Append one segment behind the current tail.
    ///
    /// The spawn pose is only a placeholder straight behind the tail; the next
    /// tick moves the segment onto the trail.
    pub fn add_segment(&mut self) {
        let spacing = self.config.segment_spacing;
        let direction = self.state.current_direction;
        let anchor = self
            .state
            .segments
            .last()
            .map_or(self.state.head.position, |s| s.pose.position);
        let index = self.state.segments.len();
        self.state.segments.push(Segment::new(
            index,
            Pose::looking(anchor - direction * spacing, direction),
        ));
        debug!(length = self.state.segments.len() + 1, "snake grew");
    }

    pub fn add_segments(&mut self, count: usize) {
        for _ in 0..count {
            self.add_segment();
        }
    }

    /// Remove up to `count` segments from the tail. Returns how many were removed.
    pub fn remove_segments(&mut self, count: usize) -> usize {
        let removed = count.min(self.state.segments.len());
        let keep = self.state.segments.len() - removed;
        self.state.segments.truncate(keep);
        if removed > 0 {
            debug!(removed, length = keep + 1, "snake shrank");
        }
        removed
    }

    /// Negative or non-finite speeds are ignored.
    pub fn set_speed(&mut self, speed: f32) {
        if speed >= 0.0 && speed.is_finite() {
            self.state.speed = speed;
        }
    }

    /// Negative or non-finite multipliers are ignored.
    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        if multiplier >= 0.0 && multiplier.is_finite() {
            self.state.speed_multiplier = multiplier;
        }
    }

    pub fn set_ghost_mode(&mut self, ghost: bool) {
        self.state.ghost_mode = ghost;
    }

    /// Reinitialise head, heading, trail and body from the configuration.
    ///
    /// Speed settings and the idle/active state are left to the caller.
    pub fn reset(&mut self) {
        let direction = self
            .config
            .start_direction
            .try_normalize()
            .unwrap_or(FORWARD);
        let state = &mut self.state;
        state.segments.clear();
        state.head = Pose::looking(self.config.start_position, direction);
        state.current_direction = direction;
        state.target_direction = direction;
        state.total_distance = 0.0;
        state.rebased_distance = 0.0;
        state.trail.seed(state.head);
        self.pending_turn = None;

        self.add_segments(self.config.initial_segment_count);
    }

    pub fn head_pose(&self) -> Pose {
        self.state.head
    }

    pub fn segment_poses(&self) -> Vec<Pose> {
        self.state.segments.iter().map(|s| s.pose).collect()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.state.segments
    }

    pub fn segment_count(&self) -> usize {
        self.state.segments.len()
    }

    /// Head position followed by every segment position, for spawn avoidance.
    pub fn occupied_positions(&self) -> Vec<Vec3> {
        std::iter::once(self.state.head.position)
            .chain(self.state.segments.iter().map(|s| s.pose.position))
            .collect()
    }

    pub fn trail(&self) -> &PathTrail {
        &self.state.trail
    }

    /// Arc length of the head on the current trail.
    ///
    /// Drops back by the oldest stamp whenever the trail is rebased; use
    /// [`Self::odometer`] for the distance travelled since reset.
    pub fn total_distance(&self) -> f32 {
        self.state.total_distance
    }

    /// Distance travelled since the last reset.
    pub fn odometer(&self) -> f64 {
        self.state.rebased_distance + f64::from(self.state.total_distance)
    }

    pub fn current_direction(&self) -> Vec3 {
        self.state.current_direction
    }

    pub fn target_direction(&self) -> Vec3 {
        self.state.target_direction
    }

    pub fn speed(&self) -> f32 {
        self.state.speed
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.state.speed_multiplier
    }

    pub fn effective_speed(&self) -> f32 {
        self.state.speed * self.state.speed_multiplier
    }

    pub fn is_ghost(&self) -> bool {
        self.state.ghost_mode
    }
}

//! Vector and rotation helpers shared by the locomotion code.
//!
//! Positions are `glam::Vec3` (Y up, +Z forward) and orientations are unit
//! `glam::Quat`s. Nothing here knows about segments or trails.

use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Movements shorter than this are treated as no movement at all.
pub const DISTANCE_EPSILON: f32 = 0.001;

/// Smallest trail interval that is still used for interpolation.
pub const INTERVAL_EPSILON: f32 = 1e-6;

/// World forward, the direction a freshly reset snake faces.
pub const FORWARD: Vec3 = Vec3::Z;

/// Position plus orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at `position` looking along `direction`.
    pub fn looking(position: Vec3, direction: Vec3) -> Self {
        Self::new(position, look_rotation(direction))
    }

    /// Linear position, spherical orientation interpolation.
    pub fn interpolate(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            position: self.position.lerp(other.position, t),
            orientation: self.orientation.slerp(other.orientation, t).normalize(),
        }
    }

    /// Unit vector the pose is facing.
    pub fn forward(&self) -> Vec3 {
        self.orientation * FORWARD
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

/// Rotation that turns +Z onto `direction` without roll.
///
/// A zero or non-finite direction yields the identity rotation.
pub fn look_rotation(direction: Vec3) -> Quat {
    let Some(dir) = direction.try_normalize() else {
        return Quat::IDENTITY;
    };
    let yaw = dir.x.atan2(dir.z);
    let pitch = -dir.y.clamp(-1.0, 1.0).asin();
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

/// Rotates the unit vector `current` toward `target` by at most `max_radians`.
///
/// Returns `target` once it is within reach. Exactly opposite vectors rotate
/// around world up so a horizontal snake stays horizontal.
pub fn rotate_towards(current: Vec3, target: Vec3, max_radians: f32) -> Vec3 {
    let (Some(from), Some(to)) = (current.try_normalize(), target.try_normalize()) else {
        return current;
    };
    let angle = from.angle_between(to);
    if !angle.is_finite() || angle <= max_radians.max(0.0) {
        return to;
    }

    let axis = from
        .cross(to)
        .try_normalize()
        .or_else(|| from.cross(Vec3::Y).try_normalize().map(|_| Vec3::Y))
        .unwrap_or_else(|| from.any_orthonormal_vector());

    (Quat::from_axis_angle(axis, max_radians) * from).normalize()
}

/// Maps a 2D stick vector onto the horizontal plane: x → X, y → Z.
///
/// Returns `None` for non-finite input or when the magnitude does not exceed
/// `deadzone`.
pub fn stick_to_direction(input: Vec2, deadzone: f32) -> Option<Vec3> {
    if !input.is_finite() || input.length() <= deadzone {
        return None;
    }
    Vec3::new(input.x, 0.0, input.y).try_normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_look_rotation_maps_forward() {
        for dir in [Vec3::Z, Vec3::X, -Vec3::X, -Vec3::Z, Vec3::new(1.0, 0.0, 1.0)] {
            let rotated = look_rotation(dir) * FORWARD;
            let expected = dir.normalize();
            assert_abs_diff_eq!(rotated.x, expected.x, epsilon = 1e-5);
            assert_abs_diff_eq!(rotated.y, expected.y, epsilon = 1e-5);
            assert_abs_diff_eq!(rotated.z, expected.z, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_look_rotation_degenerate() {
        assert_eq!(look_rotation(Vec3::ZERO), Quat::IDENTITY);
        assert_eq!(look_rotation(Vec3::new(f32::NAN, 0.0, 1.0)), Quat::IDENTITY);
    }

    #[test]
    fn test_rotate_towards_limits_angle() {
        let step = rotate_towards(Vec3::Z, Vec3::X, FRAC_PI_2 / 2.0);
        assert_abs_diff_eq!(step.angle_between(Vec3::Z), FRAC_PI_2 / 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(step.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(step.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotate_towards_snaps_when_close() {
        let step = rotate_towards(Vec3::Z, Vec3::X, 10.0);
        assert_eq!(step, Vec3::X);
    }

    #[test]
    fn test_rotate_towards_opposite_stays_horizontal() {
        let step = rotate_towards(Vec3::Z, -Vec3::Z, 0.1);
        assert_abs_diff_eq!(step.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(step.angle_between(Vec3::Z), 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_stick_to_direction() {
        assert_eq!(stick_to_direction(Vec2::new(0.0, 1.0), 0.3), Some(Vec3::Z));
        assert_eq!(stick_to_direction(Vec2::new(-1.0, 0.0), 0.3), Some(-Vec3::X));
        assert_eq!(stick_to_direction(Vec2::new(0.1, 0.1), 0.3), None);
        assert_eq!(stick_to_direction(Vec2::new(f32::NAN, 1.0), 0.3), None);
        assert_eq!(stick_to_direction(Vec2::new(f32::INFINITY, 0.0), 0.3), None);
    }

    #[test]
    fn test_pose_interpolate_midpoint() {
        let a = Pose::looking(Vec3::ZERO, Vec3::Z);
        let b = Pose::looking(Vec3::new(0.0, 0.0, 2.0), Vec3::X);
        let mid = a.interpolate(&b, 0.5);
        assert_abs_diff_eq!(mid.position.z, 1.0, epsilon = 1e-6);
        let fwd = mid.forward();
        assert_abs_diff_eq!(fwd.angle_between(Vec3::Z), FRAC_PI_2 / 2.0, epsilon = 1e-4);
    }
}

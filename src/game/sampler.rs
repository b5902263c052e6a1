//! Arc-length lookups on the recorded head path.

use super::math::{Pose, INTERVAL_EPSILON};
use super::trail::PathTrail;

/// Pose on the recorded path at arc length `target_distance`.
///
/// Searches from the newest sample backward for the interval that brackets
/// the target and interpolates inside it (lerp for position, slerp for
/// orientation). Degenerate intervals are skipped. When no interval brackets
/// the target (the trail is too short, or holds a single sample) the oldest
/// sample is returned. Only an empty trail yields `None`.
///
/// Pure: repeated queries without intervening mutation return identical poses.
pub fn sample_at(trail: &PathTrail, target_distance: f32) -> Option<Pose> {
    let oldest = trail.front()?;

    for i in (1..trail.len()).rev() {
        let (Some(prev), Some(next)) = (trail.get(i - 1), trail.get(i)) else {
            continue;
        };
        if next.distance < target_distance || prev.distance > target_distance {
            continue;
        }
        let span = next.distance - prev.distance;
        if span < INTERVAL_EPSILON {
            continue;
        }
        let t = ((target_distance - prev.distance) / span).clamp(0.0, 1.0);
        return Some(prev.pose.interpolate(&next.pose, t));
    }

    Some(oldest.pose)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    fn pose_at(x: f32, z: f32, dir: Vec3) -> Pose {
        Pose::looking(Vec3::new(x, 1.0, z), dir)
    }

    /// Straight run along +Z for 1.0, then a right angle and 1.0 along +X.
    fn l_shaped_trail() -> PathTrail {
        let mut trail = PathTrail::new();
        trail.seed(pose_at(0.0, 0.0, Vec3::Z));
        for i in 1..=10 {
            trail.append(pose_at(0.0, i as f32 * 0.1, Vec3::Z), 0.1);
        }
        for i in 1..=10 {
            trail.append(pose_at(i as f32 * 0.1, 1.0, Vec3::X), 0.1);
        }
        trail
    }

    #[test]
    fn test_sample_interpolates_inside_interval() {
        let trail = l_shaped_trail();
        let pose = sample_at(&trail, 0.55).unwrap();
        assert_abs_diff_eq!(pose.position.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(pose.position.z, 0.55, epsilon = 1e-5);
        assert_abs_diff_eq!(pose.position.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sample_follows_corner() {
        let trail = l_shaped_trail();
        let pose = sample_at(&trail, 1.5).unwrap();
        assert_abs_diff_eq!(pose.position.x, 0.5, epsilon = 1e-4);
        assert_abs_diff_eq!(pose.position.z, 1.0, epsilon = 1e-4);
        let fwd = pose.forward();
        assert_abs_diff_eq!(fwd.x, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_sample_at_exact_sample() {
        let trail = l_shaped_trail();
        let expected = trail.get(3).unwrap().pose;
        let pose = sample_at(&trail, trail.get(3).unwrap().distance).unwrap();
        assert_abs_diff_eq!(pose.position.z, expected.position.z, epsilon = 1e-6);
    }

    #[test]
    fn test_sample_slerps_orientation() {
        let mut trail = PathTrail::new();
        trail.seed(pose_at(0.0, 0.0, Vec3::Z));
        trail.append(pose_at(0.0, 1.0, Vec3::X), 1.0);
        let pose = sample_at(&trail, 0.5).unwrap();
        let angle = pose.forward().angle_between(Vec3::Z);
        assert_abs_diff_eq!(angle, std::f32::consts::FRAC_PI_4, epsilon = 1e-4);
    }

    #[test]
    fn test_sample_behind_trail_falls_back_to_oldest() {
        let mut trail = l_shaped_trail();
        trail.prune(0.5);
        let oldest = trail.front().unwrap().pose;
        assert_eq!(sample_at(&trail, 0.1), Some(oldest));
        assert_eq!(sample_at(&trail, -3.0), Some(oldest));
    }

    #[test]
    fn test_sample_single_sample_trail() {
        let mut trail = PathTrail::new();
        let seed = pose_at(2.0, 3.0, Vec3::Z);
        trail.seed(seed);
        assert_eq!(sample_at(&trail, 0.0), Some(seed));
        assert_eq!(sample_at(&trail, 5.0), Some(seed));
    }

    #[test]
    fn test_sample_empty_trail() {
        assert_eq!(sample_at(&PathTrail::new(), 0.0), None);
    }

    #[test]
    fn test_sample_is_idempotent() {
        let trail = l_shaped_trail();
        let first = sample_at(&trail, 1.234);
        let second = sample_at(&trail, 1.234);
        assert_eq!(first, second);
    }
}

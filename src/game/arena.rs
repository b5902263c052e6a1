use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::ArenaConfig;

/// What happens at the edge of the play volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryType {
    /// Solid walls that end the game
    Walls,
    /// Leaving one side re-enters from the opposite side
    Wraparound,
    /// No boundaries at all
    None,
}

/// Axis-aligned play volume with a placement grid.
#[derive(Debug, Clone)]
pub struct Arena {
    pub center: Vec3,
    pub size: Vec3,
    pub grid_step: f32,
    pub boundary: BoundaryType,
}

impl Arena {
    pub fn new(config: &ArenaConfig) -> Self {
        Self {
            center: config.center,
            size: config.size,
            grid_step: config.grid_step,
            boundary: config.boundary,
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents()
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents()
    }

    /// Whether `position` lies outside the volume on any axis.
    pub fn is_out_of_bounds(&self, position: Vec3) -> bool {
        let local = (position - self.center).abs();
        local.cmpgt(self.half_extents()).any()
    }

    /// Whether reaching `position` ends the game.
    pub fn hits_wall(&self, position: Vec3) -> bool {
        self.boundary == BoundaryType::Walls && self.is_out_of_bounds(position)
    }

    /// Maps a position into the volume when wrapping is enabled.
    ///
    /// The snake moves in unbounded space; this folds any distance travelled
    /// past an edge back in from the opposite edge. Other boundary types
    /// return the position unchanged.
    pub fn wrap_position(&self, position: Vec3) -> Vec3 {
        if self.boundary != BoundaryType::Wraparound {
            return position;
        }
        let half = self.half_extents();
        let local = position - self.center + half;
        let wrapped = Vec3::new(
            local.x.rem_euclid(self.size.x),
            local.y.rem_euclid(self.size.y),
            local.z.rem_euclid(self.size.z),
        );
        wrapped - half + self.center
    }

    /// Rounds a position to the nearest grid point, relative to the centre.
    pub fn snap_to_grid(&self, position: Vec3) -> Vec3 {
        let local = (position - self.center) / self.grid_step;
        local.round() * self.grid_step + self.center
    }

    /// Random grid point inside the volume at the given height.
    ///
    /// The snake steers in a horizontal plane, so only X and Z are drawn;
    /// `height` is clamped into the volume.
    pub fn random_position<R: Rng>(&self, height: f32, rng: &mut R) -> Vec3 {
        let half = self.half_extents();
        let mut axis = |h: f32| {
            let value = if h > 0.0 { rng.gen_range(-h..h) } else { 0.0 };
            ((value / self.grid_step).round() * self.grid_step).clamp(-h, h)
        };
        let x = axis(half.x);
        let z = axis(half.z);
        let y = height.clamp(self.min().y, self.max().y);
        Vec3::new(x + self.center.x, y, z + self.center.z)
    }
}

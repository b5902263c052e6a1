use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::arena::Arena;
use super::config::FoodEffectConfig;

/// Placement attempts before a spawn is abandoned
pub const MAX_SPAWN_ATTEMPTS: usize = 50;

/// Kinds of food and the effect they trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodType {
    Normal,
    SpeedBoost,
    SlowMo,
    Shrink,
    SuperGrowth,
    GhostMode,
    PointMultiplier,
    Magnet,
}

impl FoodType {
    pub const ALL: [FoodType; 8] = [
        FoodType::Normal,
        FoodType::SpeedBoost,
        FoodType::SlowMo,
        FoodType::Shrink,
        FoodType::SuperGrowth,
        FoodType::GhostMode,
        FoodType::PointMultiplier,
        FoodType::Magnet,
    ];

    /// Whether eating this food adds the usual single segment.
    ///
    /// Shrink and SuperGrowth change the length themselves.
    pub fn grows_snake(&self) -> bool {
        !matches!(self, FoodType::Shrink | FoodType::SuperGrowth)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FoodType::Normal => "Normal",
            FoodType::SpeedBoost => "Speed Boost",
            FoodType::SlowMo => "Slow-Mo",
            FoodType::Shrink => "Shrink",
            FoodType::SuperGrowth => "Super Growth",
            FoodType::GhostMode => "Ghost",
            FoodType::PointMultiplier => "Points x",
            FoodType::Magnet => "Magnet",
        }
    }
}

/// A piece of food in the arena
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub position: Vec3,
    pub food_type: FoodType,
}

/// Picks food types and free grid positions.
#[derive(Debug, Clone)]
pub struct FoodSpawner {
    weights: Vec<(FoodType, f32)>,
    total_weight: f32,
    clearance: f32,
}

impl FoodSpawner {
    /// `clearance` is the minimum distance kept from every occupied position.
    pub fn new(effects: &[FoodEffectConfig], clearance: f32) -> Self {
        let weights: Vec<(FoodType, f32)> = effects
            .iter()
            .filter(|e| e.spawn_weight > 0.0)
            .map(|e| (e.food_type, e.spawn_weight))
            .collect();
        let total_weight = weights.iter().map(|(_, w)| w).sum();
        Self {
            weights,
            total_weight,
            clearance,
        }
    }

    /// Weighted random food type; `Normal` when nothing is configured.
    pub fn random_food_type<R: Rng>(&self, rng: &mut R) -> FoodType {
        if self.weights.is_empty() || !(self.total_weight > 0.0) {
            return FoodType::Normal;
        }
        let roll = rng.gen_range(0.0..self.total_weight);
        let mut cumulative = 0.0;
        for (food_type, weight) in &self.weights {
            cumulative += weight;
            if roll <= cumulative {
                return *food_type;
            }
        }
        FoodType::Normal
    }

    /// Whether `position` is closer than the clearance to anything occupied.
    pub fn is_occupied(&self, position: Vec3, occupied: &[Vec3]) -> bool {
        occupied
            .iter()
            .any(|p| p.distance(position) < self.clearance)
    }

    /// Try to place a new food on a free grid point at `height`.
    ///
    /// Gives up after [`MAX_SPAWN_ATTEMPTS`] rejected positions and returns
    /// `None`; the caller simply has no food until the next spawn request.
    pub fn spawn<R: Rng>(
        &self,
        arena: &Arena,
        height: f32,
        occupied: &[Vec3],
        rng: &mut R,
    ) -> Option<Food> {
        let food_type = self.random_food_type(rng);
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let position = arena.random_position(height, rng);
            if !self.is_occupied(position, occupied) {
                debug!(?food_type, x = position.x, y = position.y, z = position.z, "food spawned");
                return Some(Food {
                    position,
                    food_type,
                });
            }
        }
        warn!("could not find a free position for food");
        None
    }
}

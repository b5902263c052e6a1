use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::arena::BoundaryType;
use super::food::FoodType;

/// Snake body and movement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    /// Arc length kept between consecutive segments
    pub segment_spacing: f32,
    /// Segments created on every reset
    pub initial_segment_count: usize,
    /// Base head speed in units per second
    pub move_speed: f32,
    /// Maximum steering rate in degrees per second
    pub turn_speed_degrees: f32,
    /// Stick magnitudes at or below this are ignored
    pub input_deadzone: f32,
    /// Turns whose dot product with the current heading is below this are rejected
    pub reversal_threshold: f32,
    /// Shortest head movement recorded in the trail
    pub min_sample_distance: f32,
    pub start_position: Vec3,
    pub start_direction: Vec3,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            segment_spacing: 0.3,
            initial_segment_count: 3,
            move_speed: 2.0,
            turn_speed_degrees: 90.0,
            input_deadzone: 0.3,
            reversal_threshold: -0.9,
            min_sample_distance: 0.001,
            start_position: Vec3::new(0.0, 1.5, 0.0),
            start_direction: Vec3::Z,
        }
    }
}

/// Play volume settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Full extents of the play volume
    pub size: Vec3,
    /// Centre of the play volume
    pub center: Vec3,
    /// Spacing of the placement grid used for food
    pub grid_step: f32,
    pub boundary: BoundaryType,
    /// Radius used for head and segment contact tests
    pub body_radius: f32,
    /// Head-to-food distance that counts as eating
    pub eat_distance: f32,
    /// Segments nearest the head that never count as self-collision
    pub self_collision_skip: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            size: Vec3::new(5.0, 3.0, 5.0),
            center: Vec3::new(0.0, 1.5, 0.0),
            grid_step: 0.3,
            boundary: BoundaryType::Walls,
            body_radius: 0.15,
            eat_distance: 0.3,
            self_collision_skip: 2,
        }
    }
}

/// Score and difficulty progression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub initial_speed: f32,
    pub speed_increase_per_food: f32,
    pub score_per_food: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            initial_speed: 2.0,
            speed_increase_per_food: 0.1,
            score_per_food: 10,
        }
    }
}

/// Tuning for one kind of food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodEffectConfig {
    pub food_type: FoodType,
    /// Relative spawn chance
    pub spawn_weight: f32,
    /// Seconds the effect lasts, 0 for instant effects
    pub duration: f32,
    /// Speed, time-scale or score factor depending on the effect
    pub effect_multiplier: f32,
    /// Segments added (positive) or removed (negative)
    pub segment_change: i32,
    /// Foods boosted by a point multiplier
    pub foods_affected: u32,
    /// Factor applied to `score_per_food` when this food is eaten
    pub point_multiplier: f32,
}

impl Default for FoodEffectConfig {
    fn default() -> Self {
        Self {
            food_type: FoodType::Normal,
            spawn_weight: 1.0,
            duration: 0.0,
            effect_multiplier: 1.0,
            segment_change: 0,
            foods_affected: 0,
            point_multiplier: 1.0,
        }
    }
}

impl FoodEffectConfig {
    fn new(food_type: FoodType, spawn_weight: f32) -> Self {
        Self {
            food_type,
            spawn_weight,
            ..Default::default()
        }
    }
}

/// Default effect table: normal food dominates, special foods are rare.
pub fn default_effects() -> Vec<FoodEffectConfig> {
    vec![
        FoodEffectConfig::new(FoodType::Normal, 10.0),
        FoodEffectConfig {
            duration: 5.0,
            effect_multiplier: 1.5,
            point_multiplier: 1.5,
            ..FoodEffectConfig::new(FoodType::SpeedBoost, 1.0)
        },
        FoodEffectConfig {
            duration: 5.0,
            effect_multiplier: 0.5,
            ..FoodEffectConfig::new(FoodType::SlowMo, 1.0)
        },
        FoodEffectConfig {
            segment_change: -3,
            ..FoodEffectConfig::new(FoodType::Shrink, 1.0)
        },
        FoodEffectConfig {
            segment_change: 3,
            point_multiplier: 2.0,
            ..FoodEffectConfig::new(FoodType::SuperGrowth, 1.0)
        },
        FoodEffectConfig {
            duration: 6.0,
            ..FoodEffectConfig::new(FoodType::GhostMode, 0.5)
        },
        FoodEffectConfig {
            effect_multiplier: 2.0,
            foods_affected: 3,
            ..FoodEffectConfig::new(FoodType::PointMultiplier, 0.5)
        },
        FoodEffectConfig {
            duration: 8.0,
            ..FoodEffectConfig::new(FoodType::Magnet, 0.5)
        },
    ]
}

/// Magnet pull settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnetConfig {
    pub radius: f32,
    /// Pull speed in units per second
    pub force: f32,
}

impl Default for MagnetConfig {
    fn default() -> Self {
        Self {
            radius: 5.0,
            force: 10.0,
        }
    }
}

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub snake: SnakeConfig,
    pub arena: ArenaConfig,
    pub scoring: ScoringConfig,
    pub magnet: MagnetConfig,
    pub effects: Vec<FoodEffectConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            snake: SnakeConfig::default(),
            arena: ArenaConfig::default(),
            scoring: ScoringConfig::default(),
            magnet: MagnetConfig::default(),
            effects: default_effects(),
        }
    }
}

impl GameConfig {
    /// Configuration with only normal food, handy for deterministic tests
    pub fn plain() -> Self {
        Self {
            effects: vec![FoodEffectConfig::new(FoodType::Normal, 1.0)],
            ..Default::default()
        }
    }

    /// Create a larger arena
    pub fn large() -> Self {
        let mut config = Self::default();
        config.arena.size = Vec3::new(10.0, 4.0, 10.0);
        config.arena.center = Vec3::new(0.0, 2.0, 0.0);
        config.snake.start_position = Vec3::new(0.0, 2.0, 0.0);
        config
    }

    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON, creating parent directories.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory {}", parent.display())
                })?;
            }
        }
        let text = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Effect settings for a food type, if configured
    pub fn effect(&self, food_type: FoodType) -> Option<&FoodEffectConfig> {
        self.effects.iter().find(|e| e.food_type == food_type)
    }

    /// Validate configuration parameters
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` describing the
    /// first problem otherwise.
    pub fn validate(&self) -> Result<(), String> {
        let snake = &self.snake;
        if !(snake.segment_spacing > 0.0) || !snake.segment_spacing.is_finite() {
            return Err(format!(
                "snake.segment_spacing must be positive, got {}",
                snake.segment_spacing
            ));
        }
        if !(snake.move_speed >= 0.0) || !snake.move_speed.is_finite() {
            return Err(format!(
                "snake.move_speed must be non-negative, got {}",
                snake.move_speed
            ));
        }
        if !(snake.turn_speed_degrees > 0.0) {
            return Err(format!(
                "snake.turn_speed_degrees must be positive, got {}",
                snake.turn_speed_degrees
            ));
        }
        if !(0.0..1.0).contains(&snake.input_deadzone) {
            return Err(format!(
                "snake.input_deadzone must be in [0, 1), got {}",
                snake.input_deadzone
            ));
        }
        if !(-1.0..=1.0).contains(&snake.reversal_threshold) {
            return Err(format!(
                "snake.reversal_threshold must be in [-1, 1], got {}",
                snake.reversal_threshold
            ));
        }
        if !(snake.min_sample_distance > 0.0)
            || snake.min_sample_distance >= snake.segment_spacing
        {
            return Err(format!(
                "snake.min_sample_distance must be in (0, segment_spacing), got {}",
                snake.min_sample_distance
            ));
        }
        if snake.start_direction.try_normalize().is_none() {
            return Err("snake.start_direction must be a non-zero vector".to_string());
        }

        let arena = &self.arena;
        if arena.size.min_element() <= 0.0 || !arena.size.is_finite() {
            return Err(format!("arena.size must be positive, got {}", arena.size));
        }
        if !(arena.grid_step > 0.0) {
            return Err(format!(
                "arena.grid_step must be positive, got {}",
                arena.grid_step
            ));
        }
        if arena.body_radius < 0.0 || arena.eat_distance < 0.0 {
            return Err("arena radii must be non-negative".to_string());
        }

        if self.scoring.initial_speed < 0.0 || self.scoring.speed_increase_per_food < 0.0 {
            return Err("scoring speeds must be non-negative".to_string());
        }

        for effect in &self.effects {
            if !(effect.spawn_weight >= 0.0) {
                return Err(format!(
                    "effect {:?} spawn_weight must be non-negative, got {}",
                    effect.food_type, effect.spawn_weight
                ));
            }
            if !(effect.duration >= 0.0) {
                return Err(format!(
                    "effect {:?} duration must be non-negative, got {}",
                    effect.food_type, effect.duration
                ));
            }
        }

        Ok(())
    }
}

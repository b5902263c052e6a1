//! Timed special-food effects.
//!
//! Each effect is a countdown advanced by [`EffectManager::update`]. Instead
//! of callbacks the manager returns [`EffectEvent`]s for whoever presents
//! them, and it changes the snake only through [`SnakeController`]'s public
//! methods.

use std::collections::HashMap;

use glam::Vec3;
use tracing::info;

use super::config::{FoodEffectConfig, MagnetConfig};
use super::food::{Food, FoodType};
use super::locomotion::SnakeController;

/// Remaining time at which warnings start
pub const WARNING_THRESHOLD: f32 = 2.0;
/// Ghost mode lingers this long after its timer runs out
pub const GHOST_GRACE_DURATION: f32 = 0.5;
/// Upper bound on how long a point multiplier lasts
pub const POINT_MULTIPLIER_MAX_DURATION: f32 = 15.0;

/// Notifications for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectEvent {
    Started { food_type: FoodType, duration: f32 },
    Ended { food_type: FoodType },
    Warning { food_type: FoodType, remaining: f32 },
}

/// Effects that feed back into the engine rather than the snake
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineModifiers {
    pub time_scale: f32,
    pub point_multiplier: f32,
}

impl Default for EngineModifiers {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            point_multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Timers {
    speed_boost: f32,
    slow_mo: f32,
    ghost: f32,
    ghost_grace: f32,
    magnet: f32,
    point_multiplier: f32,
    point_foods_remaining: u32,
}

#[derive(Debug, Clone)]
pub struct EffectManager {
    lookup: HashMap<FoodType, FoodEffectConfig>,
    magnet: MagnetConfig,
    timers: Timers,
    modifiers: EngineModifiers,
}

impl EffectManager {
    pub fn new(effects: &[FoodEffectConfig], magnet: MagnetConfig) -> Self {
        let lookup = effects
            .iter()
            .map(|effect| (effect.food_type, effect.clone()))
            .collect();
        Self {
            lookup,
            magnet,
            timers: Timers::default(),
            modifiers: EngineModifiers::default(),
        }
    }

    pub fn effect(&self, food_type: FoodType) -> Option<&FoodEffectConfig> {
        self.lookup.get(&food_type)
    }

    pub fn modifiers(&self) -> EngineModifiers {
        self.modifiers
    }

    /// Score factor of a food type itself, 1.0 when unconfigured
    pub fn food_point_multiplier(&self, food_type: FoodType) -> f32 {
        self.lookup
            .get(&food_type)
            .map_or(1.0, |effect| effect.point_multiplier)
    }

    /// Start or apply the effect of eaten food.
    ///
    /// Normal or unconfigured food types do nothing.
    pub fn apply(&mut self, food_type: FoodType, snake: &mut SnakeController) -> Vec<EffectEvent> {
        let Some(effect) = self.lookup.get(&food_type).cloned() else {
            return Vec::new();
        };
        let mut events = Vec::new();

        match food_type {
            FoodType::Normal => {}
            FoodType::SpeedBoost => {
                self.timers.speed_boost = effect.duration;
                snake.set_speed_multiplier(effect.effect_multiplier);
                info!(multiplier = effect.effect_multiplier, duration = effect.duration, "speed boost started");
                events.push(started(food_type, effect.duration));
            }
            FoodType::SlowMo => {
                self.timers.slow_mo = effect.duration;
                self.modifiers.time_scale = effect.effect_multiplier;
                info!(scale = effect.effect_multiplier, duration = effect.duration, "slow-mo started");
                events.push(started(food_type, effect.duration));
            }
            FoodType::Shrink => {
                let removed = snake.remove_segments(effect.segment_change.unsigned_abs() as usize);
                info!(removed, "shrink applied");
            }
            FoodType::SuperGrowth => {
                let added = effect.segment_change.max(0) as usize;
                snake.add_segments(added);
                info!(added, "super growth applied");
            }
            FoodType::GhostMode => {
                self.timers.ghost = effect.duration;
                self.timers.ghost_grace = 0.0;
                snake.set_ghost_mode(true);
                info!(duration = effect.duration, "ghost mode started");
                events.push(started(food_type, effect.duration));
            }
            FoodType::PointMultiplier => {
                self.timers.point_multiplier = POINT_MULTIPLIER_MAX_DURATION;
                self.timers.point_foods_remaining = effect.foods_affected;
                self.modifiers.point_multiplier = effect.effect_multiplier;
                info!(multiplier = effect.effect_multiplier, foods = effect.foods_affected, "point multiplier started");
                events.push(started(food_type, POINT_MULTIPLIER_MAX_DURATION));
            }
            FoodType::Magnet => {
                self.timers.magnet = effect.duration;
                info!(duration = effect.duration, "magnet started");
                events.push(started(food_type, effect.duration));
            }
        }

        events
    }

    /// Count one eaten food against an active point multiplier.
    pub fn on_food_eaten(&mut self) -> Vec<EffectEvent> {
        let mut events = Vec::new();
        if self.timers.point_foods_remaining > 0 {
            self.timers.point_foods_remaining -= 1;
            if self.timers.point_foods_remaining == 0 {
                self.end_point_multiplier(&mut events);
            }
        }
        events
    }

    /// Advance every timer.
    ///
    /// `dt` is game time (already scaled by slow-mo); `unscaled_dt` is wall
    /// time and only drives the slow-mo countdown itself.
    pub fn update(&mut self, dt: f32, unscaled_dt: f32, snake: &mut SnakeController) -> Vec<EffectEvent> {
        let mut events = Vec::new();

        if countdown(&mut self.timers.speed_boost, dt, FoodType::SpeedBoost, &mut events) {
            snake.set_speed_multiplier(1.0);
            end(FoodType::SpeedBoost, &mut events);
        }

        if countdown(&mut self.timers.slow_mo, unscaled_dt, FoodType::SlowMo, &mut events) {
            self.modifiers.time_scale = 1.0;
            end(FoodType::SlowMo, &mut events);
        }

        if countdown(&mut self.timers.ghost, dt, FoodType::GhostMode, &mut events) {
            self.timers.ghost_grace = GHOST_GRACE_DURATION;
        }

        if self.timers.ghost_grace > 0.0 {
            self.timers.ghost_grace -= dt;
            if self.timers.ghost_grace <= 0.0 {
                self.timers.ghost_grace = 0.0;
                snake.set_ghost_mode(false);
                end(FoodType::GhostMode, &mut events);
            }
        }

        if countdown(&mut self.timers.magnet, dt, FoodType::Magnet, &mut events) {
            end(FoodType::Magnet, &mut events);
        }

        if countdown(&mut self.timers.point_multiplier, dt, FoodType::PointMultiplier, &mut events) {
            self.end_point_multiplier(&mut events);
        }

        events
    }

    /// Pull food toward `head` while the magnet is active.
    pub fn attract(&self, food: &mut Food, head: Vec3, dt: f32) {
        if self.timers.magnet <= 0.0 {
            return;
        }
        let offset = head - food.position;
        let distance = offset.length();
        if distance > self.magnet.radius || distance <= f32::EPSILON {
            return;
        }
        let step = (self.magnet.force * dt).min(distance);
        food.position += offset / distance * step;
    }

    /// End every active effect, e.g. on game over.
    pub fn clear_all(&mut self, snake: &mut SnakeController) -> Vec<EffectEvent> {
        let mut events = Vec::new();
        if self.timers.speed_boost > 0.0 {
            self.timers.speed_boost = 0.0;
            snake.set_speed_multiplier(1.0);
            end(FoodType::SpeedBoost, &mut events);
        }
        if self.timers.slow_mo > 0.0 {
            self.timers.slow_mo = 0.0;
            self.modifiers.time_scale = 1.0;
            end(FoodType::SlowMo, &mut events);
        }
        if self.timers.ghost > 0.0 || self.timers.ghost_grace > 0.0 {
            self.timers.ghost = 0.0;
            self.timers.ghost_grace = 0.0;
            snake.set_ghost_mode(false);
            end(FoodType::GhostMode, &mut events);
        }
        if self.timers.magnet > 0.0 {
            self.timers.magnet = 0.0;
            end(FoodType::Magnet, &mut events);
        }
        if self.timers.point_multiplier > 0.0 || self.timers.point_foods_remaining > 0 {
            self.end_point_multiplier(&mut events);
        }
        events
    }

    pub fn is_active(&self, food_type: FoodType) -> bool {
        let t = &self.timers;
        match food_type {
            FoodType::SpeedBoost => t.speed_boost > 0.0,
            FoodType::SlowMo => t.slow_mo > 0.0,
            FoodType::GhostMode => t.ghost > 0.0 || t.ghost_grace > 0.0,
            FoodType::Magnet => t.magnet > 0.0,
            FoodType::PointMultiplier => t.point_multiplier > 0.0 || t.point_foods_remaining > 0,
            FoodType::Normal | FoodType::Shrink | FoodType::SuperGrowth => false,
        }
    }

    pub fn has_active_effect(&self) -> bool {
        FoodType::ALL.iter().any(|f| self.is_active(*f))
    }

    /// The effect to highlight, by priority: ghost, slow-mo, speed boost,
    /// magnet, point multiplier.
    pub fn dominant_effect(&self) -> Option<FoodType> {
        [
            FoodType::GhostMode,
            FoodType::SlowMo,
            FoodType::SpeedBoost,
            FoodType::Magnet,
            FoodType::PointMultiplier,
        ]
        .into_iter()
        .find(|f| self.is_active(*f))
    }

    /// Seconds left on a timed effect, 0 when inactive.
    pub fn remaining(&self, food_type: FoodType) -> f32 {
        let t = &self.timers;
        match food_type {
            FoodType::SpeedBoost => t.speed_boost,
            FoodType::SlowMo => t.slow_mo,
            FoodType::GhostMode => t.ghost + t.ghost_grace,
            FoodType::Magnet => t.magnet,
            FoodType::PointMultiplier => t.point_multiplier,
            FoodType::Normal | FoodType::Shrink | FoodType::SuperGrowth => 0.0,
        }
        .max(0.0)
    }

    fn end_point_multiplier(&mut self, events: &mut Vec<EffectEvent>) {
        self.timers.point_multiplier = 0.0;
        self.timers.point_foods_remaining = 0;
        self.modifiers.point_multiplier = 1.0;
        end(FoodType::PointMultiplier, events);
    }
}

fn started(food_type: FoodType, duration: f32) -> EffectEvent {
    EffectEvent::Started {
        food_type,
        duration,
    }
}

fn end(food_type: FoodType, events: &mut Vec<EffectEvent>) {
    info!(?food_type, "effect ended");
    events.push(EffectEvent::Ended { food_type });
}

/// Decrement a running timer, emitting a warning near the end.
/// Returns true on the tick the timer expires.
fn countdown(timer: &mut f32, dt: f32, food_type: FoodType, events: &mut Vec<EffectEvent>) -> bool {
    if *timer <= 0.0 {
        return false;
    }
    *timer -= dt;
    if *timer <= 0.0 {
        *timer = 0.0;
        return true;
    }
    if *timer <= WARNING_THRESHOLD {
        events.push(EffectEvent::Warning {
            food_type,
            remaining: *timer,
        });
    }
    false
}

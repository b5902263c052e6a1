//! Core game logic for the snake
//!
//! Everything here is free of I/O and rendering. The locomotion core is
//! `trail`, `sampler`, `follower` and `locomotion`; the remaining modules are
//! the game built around it.

pub mod action;
pub mod arena;
pub mod collision;
pub mod config;
pub mod effects;
pub mod engine;
pub mod follower;
pub mod food;
pub mod locomotion;
pub mod math;
pub mod sampler;
pub mod state;
pub mod trail;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use arena::{Arena, BoundaryType};
pub use config::GameConfig;
pub use effects::{EffectEvent, EffectManager};
pub use engine::{GameEngine, StepResult};
pub use food::{Food, FoodType};
pub use locomotion::{LocomotionState, SnakeController};
pub use math::Pose;
pub use state::{ActiveEffect, CollisionType, GamePhase, GameState};
pub use trail::{PathSample, PathTrail};

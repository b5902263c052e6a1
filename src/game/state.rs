use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::food::{Food, FoodType};
use super::math::Pose;

/// Top-level game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl GamePhase {
    pub fn label(&self) -> &'static str {
        match self {
            GamePhase::Menu => "Menu",
            GamePhase::Playing => "Playing",
            GamePhase::Paused => "Paused",
            GamePhase::GameOver => "Game Over",
        }
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Head left the arena through a wall
    Wall,
    /// Head ran into its own body
    SelfCollision,
}

/// A timed effect and the seconds it has left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub food_type: FoodType,
    pub remaining: f32,
}

/// Read-only snapshot of a game, for rendering and reporting.
///
/// Positions are already wrapped into the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u32,
    pub high_score: u32,
    pub steps: u64,
    pub speed: f32,
    pub time_scale: f32,
    pub head: Pose,
    pub direction: Vec3,
    pub segments: Vec<Vec3>,
    pub food: Option<Food>,
    pub ghost: bool,
    pub effects: Vec<ActiveEffect>,
    pub total_distance: f64,
    pub trail_len: usize,
}

impl GameState {
    pub fn is_alive(&self) -> bool {
        self.phase != GamePhase::GameOver
    }

    /// Head plus body segments
    pub fn length(&self) -> usize {
        self.segments.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(phase: GamePhase) -> GameState {
        GameState {
            phase,
            score: 0,
            high_score: 0,
            steps: 0,
            speed: 2.0,
            time_scale: 1.0,
            head: Pose::default(),
            direction: Vec3::Z,
            segments: vec![Vec3::ZERO; 3],
            food: None,
            ghost: false,
            effects: Vec::new(),
            total_distance: 0.0,
            trail_len: 1,
        }
    }

    #[test]
    fn test_length_counts_head() {
        assert_eq!(state(GamePhase::Playing).length(), 4);
    }

    #[test]
    fn test_is_alive() {
        assert!(state(GamePhase::Menu).is_alive());
        assert!(state(GamePhase::Paused).is_alive());
        assert!(!state(GamePhase::GameOver).is_alive());
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_string(&state(GamePhase::Paused)).unwrap();
        assert!(json.contains("\"phase\":\"Paused\""));
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.length(), 4);
    }
}

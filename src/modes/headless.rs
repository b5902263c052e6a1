//! Headless simulation mode
//!
//! Runs the game without a terminal, steering with a fixed script, and
//! reports a [`RunSummary`] that `main` prints as JSON. Useful for smoke
//! testing configurations and for reproducible runs with a seed.
//!
//! # Example
//!
//! ```rust,ignore
//! use vr_snake::game::GameConfig;
//! use vr_snake::modes::{HeadlessConfig, HeadlessMode};
//!
//! let config = HeadlessConfig {
//!     ticks: 600,
//!     seed: Some(7),
//!     ..HeadlessConfig::new(GameConfig::default())
//! };
//! let summary = HeadlessMode::new(config).run()?;
//! println!("{}", serde_json::to_string_pretty(&summary)?);
//! ```

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::game::{Action, Direction, GameConfig, GameEngine, GamePhase};

/// Configuration for headless mode
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Simulation steps to run
    pub ticks: u64,

    /// Seconds per step
    pub dt: f32,

    /// Steps between scripted turns, 0 to never turn
    pub turn_every: u64,

    /// Seed for food placement
    pub seed: Option<u64>,

    /// Game configuration
    pub game_config: GameConfig,
}

impl HeadlessConfig {
    /// Ten seconds at 60 Hz, turning every second
    pub fn new(game_config: GameConfig) -> Self {
        Self {
            ticks: 600,
            dt: 1.0 / 60.0,
            turn_every: 60,
            seed: None,
            game_config,
        }
    }
}

/// Outcome of a headless run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub score: u32,
    pub length: usize,
    pub foods_eaten: u32,
    pub total_distance: f64,
    pub trail_len: usize,
    pub phase: GamePhase,
}

/// Turns through right, down, left and up, tracing a square loop.
#[derive(Debug, Clone)]
pub struct ScriptedPilot {
    turn_every: u64,
    next_turn: usize,
}

impl ScriptedPilot {
    const PATTERN: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    pub fn new(turn_every: u64) -> Self {
        Self {
            turn_every,
            next_turn: 0,
        }
    }

    /// Action for step `tick`, counted from 1.
    pub fn action(&mut self, tick: u64) -> Action {
        if self.turn_every == 0 || tick % self.turn_every != 0 {
            return Action::Continue;
        }
        let direction = Self::PATTERN[self.next_turn % Self::PATTERN.len()];
        self.next_turn += 1;
        Action::from(direction)
    }
}

pub struct HeadlessMode {
    engine: GameEngine,
    pilot: ScriptedPilot,
    config: HeadlessConfig,
}

impl HeadlessMode {
    pub fn new(config: HeadlessConfig) -> Self {
        let engine = match config.seed {
            Some(seed) => GameEngine::with_seed(config.game_config.clone(), seed),
            None => GameEngine::new(config.game_config.clone()),
        };

        Self {
            engine,
            pilot: ScriptedPilot::new(config.turn_every),
            config,
        }
    }

    /// Run until the tick budget is spent or the game ends.
    pub fn run(&mut self) -> Result<RunSummary> {
        ensure!(
            self.config.dt > 0.0 && self.config.dt.is_finite(),
            "dt must be a positive number of seconds, got {}",
            self.config.dt
        );

        info!(ticks = self.config.ticks, dt = self.config.dt, "headless run started");
        self.engine.start_game();

        let mut ticks = 0;
        let mut foods_eaten = 0;
        while ticks < self.config.ticks && self.engine.phase() == GamePhase::Playing {
            ticks += 1;
            let action = self.pilot.action(ticks);
            let result = self.engine.step(self.config.dt, action);
            if let Some(food_type) = result.ate_food {
                foods_eaten += 1;
                debug!(tick = ticks, ?food_type, "food eaten");
            }
        }

        let state = self.engine.state();
        let summary = RunSummary {
            ticks,
            score: state.score,
            length: state.length(),
            foods_eaten,
            total_distance: state.total_distance,
            trail_len: state.trail_len,
            phase: state.phase,
        };
        info!(score = summary.score, ticks, phase = ?summary.phase, "headless run finished");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::BoundaryType;

    fn config(boundary: BoundaryType, ticks: u64) -> HeadlessConfig {
        let mut game_config = GameConfig::plain();
        game_config.arena.boundary = boundary;
        HeadlessConfig {
            ticks,
            seed: Some(3),
            ..HeadlessConfig::new(game_config)
        }
    }

    #[test]
    fn test_pilot_pattern() {
        let mut pilot = ScriptedPilot::new(2);
        assert_eq!(pilot.action(1), Action::Continue);
        assert_eq!(pilot.action(2), Action::from(Direction::Right));
        assert_eq!(pilot.action(3), Action::Continue);
        assert_eq!(pilot.action(4), Action::from(Direction::Down));

        let mut idle = ScriptedPilot::new(0);
        assert_eq!(idle.action(60), Action::Continue);
    }

    #[test]
    fn test_straight_run_hits_wall() {
        let mut run = config(BoundaryType::Walls, 1000);
        run.turn_every = 0;
        let summary = HeadlessMode::new(run).run().unwrap();

        assert_eq!(summary.phase, GamePhase::GameOver);
        assert!(summary.ticks < 1000);
    }

    #[test]
    fn test_unbounded_run_uses_full_budget() {
        let summary = HeadlessMode::new(config(BoundaryType::None, 300)).run().unwrap();

        assert_eq!(summary.ticks, 300);
        assert_eq!(summary.phase, GamePhase::Playing);
        assert_eq!(summary.length, 4 + summary.foods_eaten as usize);
        // Five seconds at no less than the initial speed of 2.
        assert!(summary.total_distance >= 9.99, "{}", summary.total_distance);
        assert!(summary.trail_len > 0);
    }

    #[test]
    fn test_same_seed_same_summary() {
        let a = HeadlessMode::new(config(BoundaryType::Wraparound, 400)).run().unwrap();
        let b = HeadlessMode::new(config(BoundaryType::Wraparound, 400)).run().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_bad_dt() {
        let mut run = config(BoundaryType::None, 10);
        run.dt = 0.0;
        assert!(HeadlessMode::new(run).run().is_err());
    }

    #[test]
    fn test_summary_json() {
        let summary = HeadlessMode::new(config(BoundaryType::None, 10)).run().unwrap();
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
        assert!(json.contains("\"trail_len\""));
    }
}

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::{
    action::Action,
    arena::Arena,
    collision::CollisionDetector,
    config::GameConfig,
    effects::{EffectEvent, EffectManager},
    food::{Food, FoodSpawner, FoodType},
    locomotion::SnakeController,
    state::{ActiveEffect, CollisionType, GamePhase, GameState},
};

/// Result of a game step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepResult {
    /// Food eaten this step, if any
    pub ate_food: Option<FoodType>,
    /// Contact detected this step. A self-collision in ghost mode is
    /// reported without ending the game.
    pub collision: Option<CollisionType>,
    /// Whether this step ended the game
    pub terminated: bool,
    /// Effect notifications raised during the step
    pub events: Vec<EffectEvent>,
}

/// The game manager: phases, score, speed progression, food and effects
/// around a single [`SnakeController`].
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    snake: SnakeController,
    arena: Arena,
    spawner: FoodSpawner,
    detector: CollisionDetector,
    effects: EffectManager,
    food: Option<Food>,
    phase: GamePhase,
    score: u32,
    high_score: u32,
    speed: f32,
    steps: u64,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let arena = Arena::new(&config.arena);
        let spawner = FoodSpawner::new(&config.effects, config.snake.segment_spacing);
        let detector = CollisionDetector::new(&config.arena);
        let effects = EffectManager::new(&config.effects, config.magnet.clone());
        let mut snake = SnakeController::new(config.snake.clone());
        snake.set_speed(config.scoring.initial_speed);

        Self {
            speed: config.scoring.initial_speed,
            config,
            rng,
            snake,
            arena,
            spawner,
            detector,
            effects,
            food: None,
            phase: GamePhase::Menu,
            score: 0,
            high_score: 0,
            steps: 0,
        }
    }

    /// Reset score, speed, snake and effects, spawn food and start playing.
    pub fn start_game(&mut self) {
        self.effects.clear_all(&mut self.snake);
        self.score = 0;
        self.steps = 0;
        self.speed = self.config.scoring.initial_speed;
        self.snake.reset();
        self.snake.set_speed(self.speed);
        self.snake.set_speed_multiplier(1.0);
        self.food = None;
        self.spawn_food();
        self.set_phase(GamePhase::Playing);
    }

    /// Toggle between playing and paused; other phases are unaffected.
    pub fn pause_game(&mut self) {
        match self.phase {
            GamePhase::Playing => self.set_phase(GamePhase::Paused),
            GamePhase::Paused => self.set_phase(GamePhase::Playing),
            GamePhase::Menu | GamePhase::GameOver => {}
        }
    }

    /// End the current game. Has no effect if it already ended.
    pub fn game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.effects.clear_all(&mut self.snake);
        self.high_score = self.high_score.max(self.score);
        info!(
            score = self.score,
            high_score = self.high_score,
            length = self.snake.segment_count() + 1,
            "game over"
        );
        self.set_phase(GamePhase::GameOver);
    }

    pub fn on_wall_hit(&mut self) {
        self.game_over();
    }

    /// Returns whether the hit ended the game.
    pub fn on_self_hit(&mut self) -> bool {
        if self.snake.is_ghost() {
            return false;
        }
        self.game_over();
        true
    }

    /// Apply the food's effect, then score it, speed up, grow and respawn.
    ///
    /// A point multiplier food scores under its own multiplier and counts as
    /// the first of the foods it affects.
    pub fn on_food_eaten(&mut self, food_type: FoodType) -> Vec<EffectEvent> {
        let mut events = self.effects.apply(food_type, &mut self.snake);

        let points = self.config.scoring.score_per_food as f32
            * self.effects.food_point_multiplier(food_type)
            * self.effects.modifiers().point_multiplier;
        self.score += points.round().max(0.0) as u32;

        self.speed += self.config.scoring.speed_increase_per_food;
        self.snake.set_speed(self.speed);

        if food_type.grows_snake() {
            self.snake.add_segment();
        }

        events.extend(self.effects.on_food_eaten());

        self.food = None;
        self.spawn_food();
        events
    }

    /// Advance the game by `dt` seconds of wall time.
    ///
    /// Order: steering input, movement and segment follow (in scaled time),
    /// collisions, food, effect timers. Steps outside `Playing` do nothing.
    pub fn step(&mut self, dt: f32, action: Action) -> StepResult {
        let mut result = StepResult::default();
        if self.phase != GamePhase::Playing || !(dt > 0.0) || !dt.is_finite() {
            return result;
        }

        if let Action::Steer(stick) = action {
            self.snake.request_turn(stick);
        }

        let scaled = dt * self.effects.modifiers().time_scale;
        self.snake.tick(scaled);
        self.steps += 1;

        if let Some(collision) = self.detector.check(&self.arena, &self.snake) {
            result.collision = Some(collision);
            result.terminated = match collision {
                CollisionType::Wall => {
                    self.on_wall_hit();
                    true
                }
                CollisionType::SelfCollision => self.on_self_hit(),
            };
            if result.terminated {
                return result;
            }
        }

        let head = self.snake.head_pose().position;
        let wrapped_head = self.arena.wrap_position(head);
        if let Some(food) = self.food.as_mut() {
            self.effects.attract(food, wrapped_head, scaled);
        }
        let eaten = self
            .food
            .filter(|food| self.detector.reaches_food(&self.arena, head, food));
        if let Some(food) = eaten {
            result.ate_food = Some(food.food_type);
            result.events.extend(self.on_food_eaten(food.food_type));
        }

        result
            .events
            .extend(self.effects.update(scaled, dt, &mut self.snake));

        if self.food.is_none() {
            self.spawn_food();
        }

        result
    }

    /// Snapshot of everything a front-end shows.
    pub fn state(&self) -> GameState {
        let effects = FoodType::ALL
            .iter()
            .filter(|f| self.effects.is_active(**f))
            .map(|f| ActiveEffect {
                food_type: *f,
                remaining: self.effects.remaining(*f),
            })
            .collect();

        GameState {
            phase: self.phase,
            score: self.score,
            high_score: self.high_score,
            steps: self.steps,
            speed: self.snake.effective_speed(),
            time_scale: self.effects.modifiers().time_scale,
            head: self.snake.head_pose(),
            direction: self.snake.current_direction(),
            segments: self.wrapped_body(),
            food: self.food,
            ghost: self.snake.is_ghost(),
            effects,
            total_distance: self.snake.odometer(),
            trail_len: self.snake.trail().len(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn snake(&self) -> &SnakeController {
        &self.snake
    }

    pub fn effects(&self) -> &EffectManager {
        &self.effects
    }

    pub fn food(&self) -> Option<&Food> {
        self.food.as_ref()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "phase changed");
        }
        self.phase = phase;
        self.snake.set_active(phase == GamePhase::Playing);
    }

    fn wrapped_body(&self) -> Vec<Vec3> {
        self.snake
            .segments()
            .iter()
            .map(|s| self.arena.wrap_position(s.pose.position))
            .collect()
    }

    fn spawn_food(&mut self) {
        let mut occupied = self.wrapped_body();
        occupied.push(self.arena.wrap_position(self.snake.head_pose().position));
        let height = self.config.snake.start_position.y;
        self.food = self
            .spawner
            .spawn(&self.arena, height, &occupied, &mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn started(config: GameConfig) -> GameEngine {
        let mut engine = GameEngine::with_seed(config, 11);
        engine.start_game();
        engine
    }

    /// Park the food far from the snake's path
    fn park_food(engine: &mut GameEngine) {
        engine.food = Some(Food {
            position: Vec3::new(-2.4, 0.3, -2.4),
            food_type: FoodType::Normal,
        });
    }

    #[test]
    fn test_new_engine_waits_in_menu() {
        let mut engine = GameEngine::with_seed(GameConfig::plain(), 1);
        assert_eq!(engine.phase(), GamePhase::Menu);
        assert!(!engine.snake().is_active());

        let result = engine.step(DT, Action::Continue);
        assert_eq!(result, StepResult::default());
        assert_eq!(engine.snake().total_distance(), 0.0);
    }

    #[test]
    fn test_start_game() {
        let engine = started(GameConfig::plain());
        let state = engine.state();

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.length(), 4);
        assert_eq!(state.speed, 2.0);
        assert!(state.food.is_some());
        assert!(engine.snake().is_active());
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = started(GameConfig::plain());
        park_food(&mut engine);

        let result = engine.step(0.1, Action::Continue);

        assert!(!result.terminated);
        assert_eq!(result.ate_food, None);
        assert_abs_diff_eq!(engine.snake().total_distance(), 0.2, epsilon = 1e-5);
        assert_eq!(engine.state().steps, 1);
    }

    #[test]
    fn test_pause_toggles() {
        let mut engine = started(GameConfig::plain());
        park_food(&mut engine);

        engine.pause_game();
        assert_eq!(engine.phase(), GamePhase::Paused);
        engine.step(0.1, Action::Continue);
        assert_eq!(engine.snake().total_distance(), 0.0);

        engine.pause_game();
        assert_eq!(engine.phase(), GamePhase::Playing);
        engine.step(0.1, Action::Continue);
        assert!(engine.snake().total_distance() > 0.0);
    }

    #[test]
    fn test_pause_ignored_outside_play() {
        let mut engine = GameEngine::with_seed(GameConfig::plain(), 1);
        engine.pause_game();
        assert_eq!(engine.phase(), GamePhase::Menu);

        engine.start_game();
        engine.game_over();
        engine.pause_game();
        assert_eq!(engine.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = started(GameConfig::plain());
        let head = engine.snake().head_pose().position;
        engine.food = Some(Food {
            position: head + Vec3::Z * 0.2,
            food_type: FoodType::Normal,
        });

        let result = engine.step(DT, Action::Continue);

        assert_eq!(result.ate_food, Some(FoodType::Normal));
        assert_eq!(engine.score(), 10);
        assert_eq!(engine.snake().segment_count(), 4);
        assert_abs_diff_eq!(engine.speed(), 2.1, epsilon = 1e-6);
        assert_abs_diff_eq!(engine.snake().speed(), 2.1, epsilon = 1e-6);
        let food = engine.food().unwrap();
        assert_ne!(food.position, head + Vec3::Z * 0.2);
    }

    #[test]
    fn test_steering_reaches_spawned_food() {
        let mut config = GameConfig::plain();
        config.arena.boundary = crate::game::BoundaryType::None;
        config.arena.self_collision_skip = 100;
        // Turns complete within a tick, so homing never circles the food.
        config.snake.turn_speed_degrees = 36_000.0;

        for seed in 0..20 {
            let mut engine = GameEngine::with_seed(config.clone(), seed);
            engine.start_game();
            let target = engine.food().unwrap().position;
            let head = engine.snake().head_pose().position;
            assert_abs_diff_eq!(target.y, head.y, epsilon = 1e-5);

            let mut eaten = None;
            for _ in 0..600 {
                let to_food = target - engine.snake().head_pose().position;
                let heading = engine.snake().current_direction();
                let steer = if to_food.normalize_or_zero().dot(heading) < -0.5 {
                    // Sidestep first; a straight reversal is rejected.
                    Vec2::new(heading.z, -heading.x)
                } else {
                    Vec2::new(to_food.x, to_food.z).normalize_or_zero()
                };
                let result = engine.step(DT, Action::Steer(steer));
                if result.ate_food.is_some() {
                    eaten = result.ate_food;
                    break;
                }
            }

            assert_eq!(eaten, Some(FoodType::Normal), "seed {seed}");
            assert_eq!(engine.score(), 10);
        }
    }

    #[test]
    fn test_special_food_scoring_and_growth() {
        let mut engine = started(GameConfig::default());

        engine.on_food_eaten(FoodType::SuperGrowth);
        assert_eq!(engine.score(), 20);
        assert_eq!(engine.snake().segment_count(), 6);

        engine.on_food_eaten(FoodType::Shrink);
        assert_eq!(engine.score(), 30);
        assert_eq!(engine.snake().segment_count(), 3);

        engine.on_food_eaten(FoodType::SpeedBoost);
        assert_eq!(engine.score(), 45);
        assert_eq!(engine.snake().segment_count(), 4);
        assert_eq!(engine.snake().speed_multiplier(), 1.5);
    }

    #[test]
    fn test_point_multiplier_counts_its_own_food() {
        let mut engine = started(GameConfig::default());

        engine.on_food_eaten(FoodType::PointMultiplier);
        assert_eq!(engine.score(), 20);

        // Two more doubled foods, then back to normal scoring.
        for expected in [40, 60, 70, 80] {
            engine.on_food_eaten(FoodType::Normal);
            assert_eq!(engine.score(), expected);
        }
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = started(GameConfig::plain());
        park_food(&mut engine);

        let mut result = StepResult::default();
        for _ in 0..200 {
            result = engine.step(DT, Action::Continue);
            if result.terminated {
                break;
            }
        }

        assert!(result.terminated);
        assert_eq!(result.collision, Some(CollisionType::Wall));
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert!(!engine.snake().is_active());
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = started(GameConfig::plain());
        engine.game_over();
        let distance = engine.snake().total_distance();

        let result = engine.step(DT, Action::Continue);

        assert!(!result.terminated);
        assert_eq!(engine.snake().total_distance(), distance);
        assert_eq!(engine.state().steps, 0);
    }

    #[test]
    fn test_self_hit_respects_ghost_mode() {
        let mut engine = started(GameConfig::default());
        engine.on_food_eaten(FoodType::GhostMode);
        assert!(!engine.on_self_hit());
        assert_eq!(engine.phase(), GamePhase::Playing);

        let mut engine = started(GameConfig::default());
        assert!(engine.on_self_hit());
        assert_eq!(engine.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_slow_mo_scales_movement() {
        let mut engine = started(GameConfig::default());
        engine.on_food_eaten(FoodType::SlowMo);
        park_food(&mut engine);
        assert_eq!(engine.state().time_scale, 0.5);

        let before = engine.snake().total_distance();
        engine.step(0.1, Action::Continue);
        let moved = engine.snake().total_distance() - before;
        assert_abs_diff_eq!(moved, 2.1 * 0.5 * 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_steering_changes_heading() {
        let mut engine = started(GameConfig::plain());
        park_food(&mut engine);

        // A quarter turn at 90 degrees per second takes one second.
        engine.step(DT, Action::Steer(Vec2::new(1.0, 0.0)));
        for _ in 0..70 {
            engine.step(DT, Action::Continue);
        }
        let direction = engine.snake().current_direction();
        assert_abs_diff_eq!(direction.x, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_game_over_clears_effects_and_keeps_high_score() {
        let mut engine = started(GameConfig::default());
        engine.on_food_eaten(FoodType::Magnet);
        engine.on_food_eaten(FoodType::Normal);
        assert!(engine.effects().has_active_effect());

        engine.on_wall_hit();
        assert!(!engine.effects().has_active_effect());
        assert_eq!(engine.high_score(), 20);

        engine.start_game();
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.high_score(), 20);
        assert_eq!(engine.speed(), 2.0);
        assert_eq!(engine.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let a = started(GameConfig::default());
        let b = started(GameConfig::default());
        assert_eq!(a.food(), b.food());
    }

    #[test]
    fn test_snapshot_wraps_positions() {
        let mut config = GameConfig::plain();
        config.arena.boundary = crate::game::BoundaryType::Wraparound;
        let mut engine = started(config);
        park_food(&mut engine);

        for _ in 0..120 {
            engine.step(DT, Action::Continue);
        }
        let state = engine.state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(engine.arena().is_out_of_bounds(state.head.position));
        for segment in &state.segments {
            assert!(!engine.arena().is_out_of_bounds(*segment));
        }
    }
}

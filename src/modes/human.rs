use std::collections::VecDeque;
use std::io::{stderr, Stderr};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::interval;

use crate::game::{Action, EffectEvent, GameConfig, GameEngine, GamePhase};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Recent effect messages kept for the side panel
const MAX_NOTICES: usize = 6;

pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    notices: VecDeque<String>,
    should_quit: bool,
    pending_action: Option<Action>,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let engine = match seed {
            Some(seed) => GameEngine::with_seed(config, seed),
            None => GameEngine::new(config),
        };

        Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            notices: VecDeque::with_capacity(MAX_NOTICES),
            should_quit: false,
            pending_action: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Simulation ticks at 60 Hz
        let tick_interval = Duration::from_micros(16_667);
        let mut tick_timer = interval(tick_interval);
        let mut last_tick = Instant::now();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    let now = Instant::now();
                    let dt = now.duration_since(last_tick).as_secs_f32().min(0.1);
                    last_tick = now;
                    self.update_game(dt);
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let state = self.engine.state();
                    let notices: Vec<String> = self.notices.iter().cloned().collect();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &state, self.engine.arena(), &self.metrics, &notices);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::GameAction(action) => {
                self.pending_action = Some(action);
            }
            KeyAction::Start => {
                if matches!(self.engine.phase(), GamePhase::Menu | GamePhase::GameOver) {
                    self.start_game();
                }
            }
            KeyAction::Pause => {
                self.engine.pause_game();
                self.metrics
                    .on_pause_changed(self.engine.phase() == GamePhase::Paused);
            }
            KeyAction::Restart => {
                self.start_game();
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self, dt: f32) {
        let action = self.pending_action.take().unwrap_or(Action::Continue);
        let result = self.engine.step(dt, action);

        if let Some(food_type) = result.ate_food {
            self.metrics.on_food_eaten(food_type);
        }
        for event in &result.events {
            self.push_notice(event);
        }
        if result.terminated {
            self.metrics.on_game_over(self.engine.score());
        }
    }

    fn start_game(&mut self) {
        self.engine.start_game();
        self.metrics.on_game_start();
        self.notices.clear();
        self.pending_action = None;
    }

    fn push_notice(&mut self, event: &EffectEvent) {
        let text = match event {
            EffectEvent::Started { food_type, .. } => format!("{} started", food_type.label()),
            EffectEvent::Ended { food_type } => format!("{} ended", food_type.label()),
            // Warnings are shown by the effect timers themselves.
            EffectEvent::Warning { .. } => return,
        };
        if self.notices.len() == MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(text);
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::FoodType;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_starts_in_menu() {
        let mode = HumanMode::new(GameConfig::default(), Some(1));
        assert_eq!(mode.engine.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_space_starts_and_p_pauses() {
        let mut mode = HumanMode::new(GameConfig::default(), Some(1));
        mode.handle_event(key(KeyCode::Char(' ')));
        assert_eq!(mode.engine.phase(), GamePhase::Playing);

        mode.handle_event(key(KeyCode::Char('p')));
        assert_eq!(mode.engine.phase(), GamePhase::Paused);
        assert!(mode.metrics.paused_since.is_some());

        // Space does not restart a running game.
        mode.handle_event(key(KeyCode::Char(' ')));
        assert_eq!(mode.engine.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = HumanMode::new(GameConfig::default(), Some(1));
        mode.start_game();
        mode.engine.on_food_eaten(FoodType::Normal);
        mode.engine.game_over();
        assert_eq!(mode.engine.phase(), GamePhase::GameOver);

        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.engine.score(), 0);
        assert_eq!(mode.engine.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_steering_key_is_consumed_by_one_tick() {
        let mut mode = HumanMode::new(GameConfig::default(), Some(1));
        mode.start_game();
        mode.handle_event(key(KeyCode::Left));
        assert!(mode.pending_action.is_some());

        mode.update_game(1.0 / 60.0);
        assert!(mode.pending_action.is_none());
        assert!(mode.engine.snake().target_direction().x < -0.9);
    }

    #[test]
    fn test_notices_are_bounded() {
        let mut mode = HumanMode::new(GameConfig::default(), Some(1));
        for _ in 0..10 {
            mode.push_notice(&EffectEvent::Ended {
                food_type: FoodType::Magnet,
            });
        }
        assert_eq!(mode.notices.len(), MAX_NOTICES);
    }
}

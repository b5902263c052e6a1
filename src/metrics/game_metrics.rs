use std::time::{Duration, Instant};

use crate::game::FoodType;

/// Session statistics shown by the interactive front-end.
///
/// Play time excludes paused intervals.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub paused_since: Option<Instant>,
    pub paused_total: Duration,
    pub high_score: u32,
    pub games_played: u32,
    pub foods_eaten: u32,
    pub special_foods_eaten: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            paused_since: None,
            paused_total: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            foods_eaten: 0,
            special_foods_eaten: 0,
        }
    }

    pub fn update(&mut self) {
        if self.paused_since.is_none() {
            self.elapsed_time = self.start_time.elapsed().saturating_sub(self.paused_total);
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.paused_since = None;
        self.paused_total = Duration::ZERO;
        self.foods_eaten = 0;
        self.special_foods_eaten = 0;
    }

    pub fn on_pause_changed(&mut self, paused: bool) {
        match (paused, self.paused_since) {
            (true, None) => self.paused_since = Some(Instant::now()),
            (false, Some(since)) => {
                self.paused_total += since.elapsed();
                self.paused_since = None;
            }
            _ => {}
        }
    }

    pub fn on_food_eaten(&mut self, food_type: FoodType) {
        self.foods_eaten += 1;
        if food_type != FoodType::Normal {
            self.special_foods_eaten += 1;
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

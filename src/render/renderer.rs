use glam::Vec3;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{Arena, FoodType, GamePhase, GameState};
use crate::metrics::GameMetrics;

/// A cell of the top-down (XZ) view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Head,
    Body,
    Food(FoodType),
}

/// Projects the arena onto a character grid, looking down the Y axis.
///
/// +Z is up on screen and +X is right, matching the stick mapping.
#[derive(Debug, Clone)]
pub struct TopDownView {
    min: Vec3,
    cell_size: f32,
    pub columns: usize,
    pub rows: usize,
}

impl TopDownView {
    pub fn new(arena: &Arena) -> Self {
        let cell_size = arena.grid_step;
        let columns = ((arena.size.x / cell_size).round() as usize).max(1);
        let rows = ((arena.size.z / cell_size).round() as usize).max(1);
        Self {
            min: arena.min(),
            cell_size,
            columns,
            rows,
        }
    }

    /// Column and row of a world position, `None` outside the view.
    pub fn cell_of(&self, position: Vec3) -> Option<(usize, usize)> {
        let column = ((position.x - self.min.x) / self.cell_size).floor();
        let from_bottom = ((position.z - self.min.z) / self.cell_size).floor();
        if column < 0.0 || from_bottom < 0.0 {
            return None;
        }
        let (column, from_bottom) = (column as usize, from_bottom as usize);
        if column >= self.columns || from_bottom >= self.rows {
            return None;
        }
        Some((column, self.rows - 1 - from_bottom))
    }

    /// Rasterise a snapshot; later layers win (body, food, head).
    pub fn rasterize(&self, state: &GameState, arena: &Arena) -> Vec<Vec<Cell>> {
        let mut cells = vec![vec![Cell::Empty; self.columns]; self.rows];
        let mut put = |position: Vec3, cell: Cell| {
            if let Some((column, row)) = self.cell_of(position) {
                cells[row][column] = cell;
            }
        };

        for segment in &state.segments {
            put(*segment, Cell::Body);
        }
        if let Some(food) = &state.food {
            put(food.position, Cell::Food(food.food_type));
        }
        put(arena.wrap_position(state.head.position), Cell::Head);
        cells
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        arena: &Arena,
        metrics: &GameMetrics,
        notices: &[String],
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics);
        frame.render_widget(stats, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[1]);

        match state.phase {
            GamePhase::Menu => frame.render_widget(self.render_menu(metrics), body[0]),
            GamePhase::GameOver => frame.render_widget(self.render_game_over(state), body[0]),
            GamePhase::Playing | GamePhase::Paused => {
                let grid = self.render_grid(state, arena);
                frame.render_widget(grid, body[0]);
            }
        }

        let side = self.render_effects(state, notices);
        frame.render_widget(side, body[1]);

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, state: &GameState, arena: &Arena) -> Paragraph<'_> {
        let view = TopDownView::new(arena);
        let lines: Vec<Line> = view
            .rasterize(state, arena)
            .into_iter()
            .map(|row| Line::from(row.into_iter().map(cell_span).collect::<Vec<_>>()))
            .collect();

        let (title, border) = if state.phase == GamePhase::Paused {
            (" Snake (paused) ", Color::Yellow)
        } else if state.ghost {
            (" Snake (ghost) ", Color::Magenta)
        } else {
            (" Snake ", Color::White)
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);
        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                state.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(state.high_score.max(metrics.high_score).to_string(), value),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(state.length().to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{:.1}", state.speed), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_effects(&self, state: &GameState, notices: &[String]) -> Paragraph<'_> {
        let mut lines = Vec::new();
        if state.effects.is_empty() {
            lines.push(Line::from(Span::styled(
                "no active effects",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for effect in &state.effects {
            let style = if effect.remaining <= 2.0 {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(food_color(effect.food_type))
            };
            lines.push(Line::from(Span::styled(
                format!("{:<14}{:>5.1}s", effect.food_type.label(), effect.remaining),
                style,
            )));
        }
        lines.push(Line::from(""));
        for notice in notices.iter().rev() {
            lines.push(Line::from(Span::styled(
                notice.clone(),
                Style::default().fg(Color::Gray),
            )));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Effects "),
        )
    }

    fn render_menu(&self, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Games played: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.games_played.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Space",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Distance: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{:.1}", state.total_distance),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to steer | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" start | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_span(cell: Cell) -> Span<'static> {
    match cell {
        Cell::Head => Span::styled(
            "■ ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Cell::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
        Cell::Food(food_type) => Span::styled(
            "O ",
            Style::default()
                .fg(food_color(food_type))
                .add_modifier(Modifier::BOLD),
        ),
        Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
    }
}

fn food_color(food_type: FoodType) -> Color {
    match food_type {
        FoodType::Normal => Color::Red,
        FoodType::SpeedBoost => Color::Yellow,
        FoodType::SlowMo => Color::Blue,
        FoodType::Shrink => Color::LightRed,
        FoodType::SuperGrowth => Color::LightGreen,
        FoodType::GhostMode => Color::Magenta,
        FoodType::PointMultiplier => Color::LightYellow,
        FoodType::Magnet => Color::LightCyan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine};

    #[test]
    fn test_view_dimensions() {
        let arena = Arena::new(&GameConfig::default().arena);
        let view = TopDownView::new(&arena);
        assert_eq!(view.columns, 17);
        assert_eq!(view.rows, 17);
    }

    #[test]
    fn test_cell_mapping_puts_forward_up() {
        let arena = Arena::new(&GameConfig::default().arena);
        let view = TopDownView::new(&arena);

        let (_, near_row) = view.cell_of(Vec3::new(0.0, 1.5, -2.0)).unwrap();
        let (_, far_row) = view.cell_of(Vec3::new(0.0, 1.5, 2.0)).unwrap();
        assert!(far_row < near_row);

        let (left, _) = view.cell_of(Vec3::new(-2.0, 1.5, 0.0)).unwrap();
        let (right, _) = view.cell_of(Vec3::new(2.0, 1.5, 0.0)).unwrap();
        assert!(left < right);

        assert_eq!(view.cell_of(Vec3::new(3.0, 1.5, 0.0)), None);
    }

    #[test]
    fn test_rasterize_marks_snake_and_food() {
        let mut engine = GameEngine::with_seed(GameConfig::plain(), 5);
        engine.start_game();
        let state = engine.state();
        let view = TopDownView::new(engine.arena());
        let cells = view.rasterize(&state, engine.arena());

        let count = |target: Cell| cells.iter().flatten().filter(|c| **c == target).count();
        assert_eq!(count(Cell::Head), 1);
        assert!(count(Cell::Body) >= 1);
        assert_eq!(count(Cell::Food(FoodType::Normal)), 1);
    }
}

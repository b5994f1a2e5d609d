use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Paragraph,
        canvas::{Canvas as TuiCanvas, Circle, Context, Line as CanvasLine},
    },
};

use crate::game::{Clock, GameConfig, GameEngine, Phase};
use crate::metrics::GameMetrics;

use super::canvas::{DisplayList, DrawCommand};

/// Terminal view: replays the display list on a half-block canvas
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<C: Clock>(
        &self,
        frame: &mut Frame,
        engine: &GameEngine<C>,
        scene: &DisplayList,
        metrics: &GameMetrics,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(engine, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the board horizontally
        let board_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        let config = engine.config();
        let board = TuiCanvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .marker(Marker::HalfBlock)
            .x_bounds([0.0, config.canvas_width() as f64])
            .y_bounds([0.0, config.canvas_height() as f64])
            .paint(|ctx| {
                for command in scene.iter() {
                    draw_command(ctx, config, command);
                }
            });
        frame.render_widget(board, board_area);

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_stats<C: Clock>(&self, engine: &GameEngine<C>, metrics: &GameMetrics) -> Paragraph<'_> {
        let (phase, phase_color) = match engine.phase() {
            Phase::Halted => ("HALTED", Color::Red),
            Phase::Running if engine.warm_up_remaining() > 0 => ("WARMING UP", Color::Yellow),
            Phase::Running => ("RUNNING", Color::Green),
        };

        let text = vec![Line::from(vec![
            Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                engine.steps_taken().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled(
                phase,
                Style::default().fg(phase_color).add_modifier(Modifier::BOLD),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" or "),
            Span::styled("Esc", Style::default().fg(Color::Red)),
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

pub(crate) fn rgb(color: u32) -> Color {
    Color::Rgb(
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

/// Ratatui shapes are outlines, so fills are drawn as stacked lines. The
/// canvas is y-up while the scene is y-down.
fn draw_command(ctx: &mut Context, config: &GameConfig, command: &DrawCommand) {
    let height = config.canvas_height() as f64;
    let fill_step = (config.tile_size as f64 / 4.0).max(1.0);

    match *command {
        DrawCommand::Rect {
            x,
            y,
            width,
            height: rect_height,
            color,
        } => {
            let left = x as f64;
            let right = (left + width as f64 - 1.0).max(left);
            let mut row = 0.0;
            while row < rect_height as f64 {
                let line_y = height - (y as f64 + row) - 0.5;
                ctx.draw(&CanvasLine {
                    x1: left,
                    y1: line_y,
                    x2: right,
                    y2: line_y,
                    color: rgb(color),
                });
                row += fill_step;
            }
        }
        DrawCommand::Circle {
            cx,
            cy,
            radius,
            color,
        } => {
            let mut r = radius as f64;
            while r > 0.0 {
                ctx.draw(&Circle {
                    x: cx as f64,
                    y: height - cy as f64,
                    radius: r,
                    color: rgb(color),
                });
                r -= fill_step;
            }
        }
    }
}

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::game::{GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{DisplayList, Renderer, ScenePainter};

/// Roughly one display refresh at 60 Hz
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct PlayMode {
    config: GameConfig,
    engine: GameEngine,
    painter: ScenePainter,
    scene: DisplayList,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let painter = ScenePainter::new(&config);
        let mut mode = Self {
            engine: GameEngine::new(config.clone()).context("Failed to create engine")?,
            config,
            painter,
            scene: DisplayList::new(),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        };
        mode.populate()?;
        Ok(mode)
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

        // Run the frame loop with cleanup
        let result = self.run_frame_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            steps = self.metrics.steps,
            frames = self.metrics.frames,
            blocked = self.metrics.blocked_moves,
            frames_per_step = ?self.metrics.frames_per_step(),
            elapsed = %self.metrics.format_time(),
            "play session ended"
        );
        result
    }

    async fn run_frame_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_timer = interval(FRAME_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Display frame: the engine decides whether a step is due
                _ = frame_timer.tick() => {
                    self.on_frame();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.engine, &self.scene, &self.metrics);
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

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Restart => self.reset_game()?,
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    /// One display refresh: tick the engine and repaint what changed
    fn on_frame(&mut self) {
        self.metrics.on_frame();
        self.metrics.update();

        if let Some(report) = self.engine.tick() {
            self.metrics.on_step(&report);
        }

        let events = self.engine.drain_events();
        self.painter.apply(&mut self.scene, &self.engine, &events);
    }

    fn populate(&mut self) -> Result<()> {
        self.engine
            .prepare_board()
            .context("Failed to place the opening scene")?;
        self.scene = DisplayList::new();
        self.painter.paint_background(&mut self.scene);
        let events = self.engine.drain_events();
        self.painter.apply(&mut self.scene, &self.engine, &events);
        Ok(())
    }

    fn reset_game(&mut self) -> Result<()> {
        self.engine = GameEngine::new(self.config.clone()).context("Failed to create engine")?;
        self.metrics = GameMetrics::new();
        self.populate()
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
    use crate::render::Layer;

    #[test]
    fn test_game_initialization() {
        let mode = PlayMode::new(GameConfig::small()).unwrap();
        assert_eq!(mode.engine.snakes().len(), 1);
        assert_eq!(mode.engine.fruits().len(), 1);
        assert_eq!(mode.scene.commands(Layer::Fruits).len(), 1);
        assert_eq!(mode.scene.commands(Layer::Snakes).len(), 2);
        assert!(!mode.scene.commands(Layer::Background).is_empty());
    }

    #[test]
    fn test_frame_before_deadline_changes_nothing() {
        let mut mode = PlayMode::new(GameConfig::small()).unwrap();
        let before = mode.scene.clone();

        mode.on_frame();

        assert_eq!(mode.metrics.frames, 1);
        assert_eq!(mode.metrics.steps, 0);
        assert_eq!(mode.scene, before);
    }

    #[test]
    fn test_frames_outpace_steps() {
        let config = GameConfig {
            step_interval_ms: 1,
            ..GameConfig::small()
        };
        let mut mode = PlayMode::new(config).unwrap();
        assert_eq!(mode.metrics.frames_per_step(), None);

        mode.on_frame();
        std::thread::sleep(std::time::Duration::from_millis(5));
        mode.on_frame();

        let steps = mode.metrics.steps;
        assert_eq!(mode.metrics.frames, 2);
        assert!(steps >= 1);
        assert_eq!(mode.metrics.frames_per_step(), Some(2.0 / steps as f64));
    }

    #[test]
    fn test_game_reset() {
        let mut mode = PlayMode::new(GameConfig::small()).unwrap();
        mode.engine.update_snakes();
        mode.metrics.steps = 5;

        mode.reset_game().unwrap();

        assert_eq!(mode.engine.steps_taken(), 0);
        assert_eq!(mode.metrics.steps, 0);
        assert_eq!(mode.engine.snakes().len(), 1);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = GameConfig {
            tile_size: 0,
            ..GameConfig::small()
        };
        assert!(PlayMode::new(config).is_err());
    }
}

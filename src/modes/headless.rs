//! Headless mode: run the simulation against a manual clock with no
//! terminal, then report where everything ended up
//!
//! Each tick advances the clock just past one step interval, so every tick
//! is a due step. The display list is still maintained so drawing output can
//! be inspected.

use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::game::{
    GameConfig, GameEngine, Heading, ManualClock, Phase, Point, StepKind,
};
use crate::metrics::GameMetrics;
use crate::render::{DisplayList, ScenePainter};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnakeSnapshot {
    pub heading: Heading,
    pub frozen: bool,
    /// Tail first
    pub body: Vec<Point>,
}

/// Final state of a headless run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSnapshot {
    pub ticks: u64,
    pub steps: u64,
    pub warm_up_ticks: u64,
    pub phase: Phase,
    pub snakes: Vec<SnakeSnapshot>,
    pub fruits: Vec<Point>,
    pub draw_commands: usize,
}

pub struct HeadlessMode {
    engine: GameEngine<ManualClock>,
    painter: ScenePainter,
    scene: DisplayList,
    metrics: GameMetrics,
}

impl HeadlessMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let painter = ScenePainter::new(&config);
        let mut engine =
            GameEngine::with_clock(config, ManualClock::new()).context("Failed to create engine")?;
        engine
            .prepare_board()
            .context("Failed to place the opening scene")?;

        let mut scene = DisplayList::new();
        painter.paint_background(&mut scene);
        let events = engine.drain_events();
        painter.apply(&mut scene, &engine, &events);

        Ok(Self {
            engine,
            painter,
            scene,
            metrics: GameMetrics::new(),
        })
    }

    /// Run `ticks` due steps and return the final snapshot
    pub fn run(&mut self, ticks: u64) -> Result<RunSnapshot> {
        let stride = self.engine.config().step_interval() + Duration::from_millis(1);

        for tick in 0..ticks {
            self.engine.clock().advance(stride);
            let report = self
                .engine
                .tick()
                .context("Clock advanced past the deadline but no step ran")?;
            self.metrics.on_step(&report);

            let events = self.engine.drain_events();
            self.painter.apply(&mut self.scene, &self.engine, &events);
            debug!(tick, kind = ?report.kind, outcomes = ?report.outcomes, "headless tick");

            if report.kind == StepKind::Halted {
                info!(tick, "simulation halted, stopping early");
                break;
            }
        }

        let snapshot = self.snapshot();
        info!(
            steps = snapshot.steps,
            warm_up = snapshot.warm_up_ticks,
            blocked = self.metrics.blocked_moves,
            phase = ?snapshot.phase,
            "headless run finished"
        );
        Ok(snapshot)
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            ticks: self.metrics.steps + self.metrics.warm_up_ticks,
            steps: self.engine.steps_taken(),
            warm_up_ticks: self.metrics.warm_up_ticks,
            phase: self.engine.phase(),
            snakes: self
                .engine
                .snakes()
                .iter()
                .map(|snake| SnakeSnapshot {
                    heading: snake.heading(),
                    frozen: snake.is_frozen(),
                    body: snake.body().iter().copied().collect(),
                })
                .collect(),
            fruits: self.engine.fruits().iter().map(|f| f.point).collect(),
            draw_commands: self.scene.len(),
        }
    }

    pub fn scene(&self) -> &DisplayList {
        &self.scene
    }
}

use std::time::{Duration, Instant};

use crate::game::{StepKind, StepReport};

/// Counters shown in the terminal header and logged at the end of a run
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub frames: u64,
    pub steps: u64,
    pub warm_up_ticks: u64,
    pub blocked_moves: u64,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            frames: 0,
            steps: 0,
            warm_up_ticks: 0,
            blocked_moves: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_frame(&mut self) {
        self.frames += 1;
    }

    pub fn on_step(&mut self, report: &StepReport) {
        match report.kind {
            StepKind::WarmUp => self.warm_up_ticks += 1,
            StepKind::Stepped => {
                self.steps += 1;
                self.blocked_moves += (report.outcomes.len() - report.moved()) as u64;
            }
            StepKind::Halted => {}
        }
    }

    /// Frames per step so far, how much faster the display runs than the sim
    pub fn frames_per_step(&self) -> Option<f64> {
        (self.steps > 0).then(|| self.frames as f64 / self.steps as f64)
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

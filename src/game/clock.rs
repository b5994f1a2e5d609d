use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of wall-clock time for the engine
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Deadline gate between display frames and simulation steps
#[derive(Debug, Clone)]
pub struct StepClock {
    interval: Duration,
    next_step_time: Instant,
}

impl StepClock {
    pub fn new(start: Instant, interval: Duration) -> Self {
        Self {
            interval,
            next_step_time: start + interval,
        }
    }

    pub fn next_step_time(&self) -> Instant {
        self.next_step_time
    }

    /// True once `now` is past the deadline; the deadline then moves to
    /// `now + interval`. Missed steps are not caught up.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now > self.next_step_time {
            self.next_step_time = now + self.interval;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(60);

    #[test]
    fn test_poll_requires_passing_deadline() {
        let start = Instant::now();
        let mut clock = StepClock::new(start, STEP);

        assert!(!clock.poll(start));
        assert!(!clock.poll(start + STEP));
        assert!(clock.poll(start + STEP + Duration::from_millis(1)));
    }

    #[test]
    fn test_stall_yields_single_step() {
        let start = Instant::now();
        let mut clock = StepClock::new(start, STEP);

        let late = start + STEP * 10;
        assert!(clock.poll(late));
        assert!(!clock.poll(late));
        assert_eq!(clock.next_step_time(), late + STEP);
    }

    #[test]
    fn test_manual_clock_shares_time() {
        let clock = ManualClock::new();
        let view = clock.clone();
        let before = view.now();

        clock.advance(Duration::from_millis(25));
        assert_eq!(view.now() - before, Duration::from_millis(25));
    }
}

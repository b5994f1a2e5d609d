use serde::Serialize;
use tracing::{debug, info, warn};

use super::{
    clock::{Clock, StepClock, SystemClock},
    config::{GameConfig, OutOfBoundsPolicy},
    error::GameError,
    heading::Heading,
    state::{check_bounds, Board, EntityId, Fruit, FruitId, Point, Snake, SnakeId},
};

/// Something the painter has to redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    FruitAdded(FruitId),
    SnakeAdded(SnakeId),
    /// The snakes layer must be cleared and every snake redrawn
    SnakesChanged,
}

/// Lifecycle of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Running,
    /// Only reachable with [`OutOfBoundsPolicy::Terminate`]
    Halted,
}

/// What happened to one snake during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorOutcome {
    Advanced,
    /// Left the grid and re-entered on the far edge
    Wrapped,
    /// Next cell was off the grid; the snake stayed put
    Blocked,
    /// Next cell was off the grid and the simulation halted
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Swallowed by the warm-up countdown
    WarmUp,
    Stepped,
    /// The simulation had already halted
    Halted,
}

/// Result of one call to [`GameEngine::update_snakes`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub kind: StepKind,
    /// Snakes in registration order
    pub outcomes: Vec<(SnakeId, ActorOutcome)>,
}

impl StepReport {
    fn empty(kind: StepKind) -> Self {
        Self {
            kind,
            outcomes: Vec::new(),
        }
    }

    pub fn outcome(&self, id: SnakeId) -> Option<ActorOutcome> {
        self.outcomes
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, outcome)| *outcome)
    }

    /// Number of snakes whose body moved
    pub fn moved(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, ActorOutcome::Advanced | ActorOutcome::Wrapped))
            .count()
    }
}

/// The simulation loop: owns the grid, the snakes and fruits, and decides
/// when a step is due
pub struct GameEngine<C: Clock = SystemClock> {
    config: GameConfig,
    clock: C,
    step_clock: StepClock,
    board: Board,
    snakes: Vec<Snake>,
    fruits: Vec<Fruit>,
    warm_up_remaining: u32,
    phase: Phase,
    steps_taken: u64,
    events: Vec<RenderEvent>,
}

impl GameEngine<SystemClock> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> GameEngine<C> {
    pub fn with_clock(config: GameConfig, clock: C) -> Result<Self, GameError> {
        config.validate()?;

        let step_clock = StepClock::new(clock.now(), config.step_interval());
        info!(
            width = config.grid_width,
            height = config.grid_height,
            step_ms = config.step_interval_ms,
            warm_up = config.warm_up_ticks,
            policy = ?config.out_of_bounds,
            "simulation initialised"
        );

        Ok(Self {
            board: Board::new(config.grid_width, config.grid_height),
            warm_up_remaining: config.warm_up_ticks,
            config,
            clock,
            step_clock,
            snakes: Vec::new(),
            fruits: Vec::new(),
            phase: Phase::Running,
            steps_taken: 0,
            events: Vec::new(),
        })
    }

    /// Place the opening scene: one fruit two thirds across the middle row
    /// and a two-cell snake a third across, heading east
    pub fn prepare_board(&mut self) -> Result<(FruitId, SnakeId), GameError> {
        let width = self.config.grid_width as i32;
        let middle = self.config.grid_height as i32 / 2;

        let fruit = self.add_fruit(Point::new(2 * width / 3, middle))?;
        let snake = self.add_snake(Point::new(width / 3, middle), Heading::East, 2)?;
        Ok((fruit, snake))
    }

    /// Place a fruit. Whatever the board held on that cell is replaced.
    pub fn add_fruit(&mut self, point: Point) -> Result<FruitId, GameError> {
        let id = FruitId(self.fruits.len());
        self.board.place(point, EntityId::Fruit(id))?;
        self.fruits.push(Fruit::new(point));
        self.events.push(RenderEvent::FruitAdded(id));
        debug!(?id, x = point.x, y = point.y, "fruit added");
        Ok(id)
    }

    /// Create a snake with its head at `head`. Only the head cell is
    /// registered on the board.
    pub fn add_snake(
        &mut self,
        head: Point,
        heading: Heading,
        length: usize,
    ) -> Result<SnakeId, GameError> {
        if !self.check_bounds(head) {
            return Err(self.out_of_bounds(head));
        }
        let snake = Snake::new(head, heading, length)?;

        let id = SnakeId(self.snakes.len());
        self.board.place(head, EntityId::Snake(id))?;
        self.snakes.push(snake);
        self.events.push(RenderEvent::SnakeAdded(id));
        debug!(?id, x = head.x, y = head.y, ?heading, length, "snake added");
        Ok(id)
    }

    /// Change a snake's heading; reversing into its own body is refused
    pub fn turn_snake(&mut self, id: SnakeId, heading: Heading) -> Result<(), GameError> {
        self.snakes
            .get_mut(id.0)
            .ok_or(GameError::UnknownSnake(id))?
            .turn(heading)
    }

    /// Check if a point is within the grid bounds
    pub fn check_bounds(&self, point: Point) -> bool {
        check_bounds(point, self.config.grid_width, self.config.grid_height)
    }

    /// Host entry point, called once per display frame
    pub fn tick(&mut self) -> Option<StepReport> {
        let now = self.clock.now();
        self.tick_at(now)
    }

    /// Run at most one step if the deadline has passed at `now`
    pub fn tick_at(&mut self, now: std::time::Instant) -> Option<StepReport> {
        if self.step_clock.poll(now) {
            Some(self.update_snakes())
        } else {
            None
        }
    }

    /// Advance every snake by one cell, in registration order
    pub fn update_snakes(&mut self) -> StepReport {
        if self.phase == Phase::Halted {
            return StepReport::empty(StepKind::Halted);
        }

        if self.warm_up_remaining > 0 {
            self.warm_up_remaining -= 1;
            debug!(remaining = self.warm_up_remaining, "warm-up tick");
            return StepReport::empty(StepKind::WarmUp);
        }

        let policy = self.config.out_of_bounds;
        let (width, height) = (self.config.grid_width, self.config.grid_height);
        let mut outcomes = Vec::with_capacity(self.snakes.len());

        for (index, snake) in self.snakes.iter_mut().enumerate() {
            let id = SnakeId(index);
            let intended = snake.intended_next_position();

            let outcome = if check_bounds(intended, width, height) {
                snake.step();
                ActorOutcome::Advanced
            } else {
                match policy {
                    OutOfBoundsPolicy::Freeze => {
                        if !snake.is_frozen() {
                            warn!(?id, x = intended.x, y = intended.y, "snake blocked by wall");
                            snake.set_frozen(true);
                        }
                        ActorOutcome::Blocked
                    }
                    OutOfBoundsPolicy::Wrap => {
                        snake.step_to(wrap(intended, width, height));
                        ActorOutcome::Wrapped
                    }
                    OutOfBoundsPolicy::Terminate => {
                        warn!(?id, x = intended.x, y = intended.y, "snake hit wall, halting");
                        self.phase = Phase::Halted;
                        ActorOutcome::Terminated
                    }
                }
            };
            outcomes.push((id, outcome));
        }

        self.steps_taken += 1;
        self.events.push(RenderEvent::SnakesChanged);
        debug!(step = self.steps_taken, ?outcomes, "step");

        StepReport {
            kind: StepKind::Stepped,
            outcomes,
        }
    }

    /// Take the pending redraw requests, oldest first
    pub fn drain_events(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn snake(&self, id: SnakeId) -> Option<&Snake> {
        self.snakes.get(id.0)
    }

    pub fn fruits(&self) -> &[Fruit] {
        &self.fruits
    }

    pub fn fruit(&self, id: FruitId) -> Option<&Fruit> {
        self.fruits.get(id.0)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Steps that actually ran, excluding warm-up ticks
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn warm_up_remaining(&self) -> u32 {
        self.warm_up_remaining
    }

    pub fn next_step_time(&self) -> std::time::Instant {
        self.step_clock.next_step_time()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn out_of_bounds(&self, point: Point) -> GameError {
        GameError::OutOfBounds {
            x: point.x,
            y: point.y,
            width: self.config.grid_width,
            height: self.config.grid_height,
        }
    }
}

fn wrap(point: Point, width: usize, height: usize) -> Point {
    Point::new(
        point.x.rem_euclid(width as i32),
        point.y.rem_euclid(height as i32),
    )
}

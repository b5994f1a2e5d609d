use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::heading::Heading;

/// A cell on the game grid, (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move point by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move point one cell along a heading
    pub fn moved_in(&self, heading: Heading) -> Self {
        let (dx, dy) = heading.delta();
        self.moved_by(dx, dy)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// True when `point` lies on a `width` x `height` grid
pub fn check_bounds(point: Point, width: usize, height: usize) -> bool {
    point.x >= 0
        && point.y >= 0
        && (point.x as i64) < width as i64
        && (point.y as i64) < height as i64
}

/// Index of a snake in the engine's snake arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnakeId(pub usize);

/// Index of a fruit in the engine's fruit arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FruitId(pub usize);

/// What a board cell points at. The arenas own the entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    Snake(SnakeId),
    Fruit(FruitId),
}

/// The snake: a fixed-length run of cells that advances one cell per step
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    start: Point,
    heading: Heading,
    length: usize,
    /// Body segments, tail first, head last
    body: VecDeque<Point>,
    frozen: bool,
}

impl Snake {
    /// Create a snake whose head sits at `head`, with the rest of the body
    /// trailing behind it against `heading`
    pub fn new(head: Point, heading: Heading, length: usize) -> Result<Self, GameError> {
        if length == 0 || length > i32::MAX as usize {
            return Err(GameError::DegenerateActor { length });
        }

        let mut snake = Self {
            start: head,
            heading,
            length,
            body: VecDeque::with_capacity(length),
            frozen: false,
        };
        snake.reset_body();
        Ok(snake)
    }

    /// Rebuild the straight-line body ending at the start position
    pub fn reset_body(&mut self) {
        let (dx, dy) = self.heading.delta();
        self.body.clear();
        for i in 0..self.length as i32 {
            self.body.push_front(self.start.moved_by(-i * dx, -i * dy));
        }
        self.frozen = false;
    }

    pub fn head(&self) -> Point {
        self.body[self.body.len() - 1]
    }

    pub fn tail(&self) -> Point {
        self.body[0]
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Body cells, tail first
    pub fn body(&self) -> &VecDeque<Point> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true for a constructed snake
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Where the head would land after one step. Does not move the snake.
    pub fn intended_next_position(&self) -> Point {
        self.head().moved_in(self.heading)
    }

    /// Advance one cell along the heading, dropping the tail.
    /// Callers check the target first; this never validates.
    pub fn step(&mut self) {
        let next = self.intended_next_position();
        self.step_to(next);
    }

    /// Advance with an explicit new head cell
    pub fn step_to(&mut self, head: Point) {
        self.body.push_back(head);
        self.body.pop_front();
        self.frozen = false;
    }

    /// Change heading. Reversing into the body is refused.
    pub fn turn(&mut self, heading: Heading) -> Result<(), GameError> {
        if self.body.len() > 1 && self.heading.is_opposite(heading) {
            return Err(GameError::IllegalTurn {
                from: self.heading,
                to: heading,
            });
        }
        self.heading = heading;
        Ok(())
    }
}

/// A static item placed on one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fruit {
    pub point: Point,
}

impl Fruit {
    pub fn new(point: Point) -> Self {
        Self { point }
    }
}

/// Lookup from cell to the entity registered there
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<EntityId>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a cell is within the grid bounds
    pub fn contains(&self, point: Point) -> bool {
        check_bounds(point, self.width, self.height)
    }

    pub fn get(&self, point: Point) -> Option<EntityId> {
        self.index(point).and_then(|i| self.cells[i])
    }

    /// Register an entity on a cell, replacing whatever was there
    pub fn place(&mut self, point: Point, entity: EntityId) -> Result<Option<EntityId>, GameError> {
        let index = self.index(point).ok_or(GameError::OutOfBounds {
            x: point.x,
            y: point.y,
            width: self.width,
            height: self.height,
        })?;
        Ok(self.cells[index].replace(entity))
    }

    /// Number of registered cells
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    fn index(&self, point: Point) -> Option<usize> {
        self.contains(point)
            .then(|| point.y as usize * self.width + point.x as usize)
    }
}

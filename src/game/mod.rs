//! Core simulation for grid snake
//!
//! This module contains the movement model and the time-driven step loop
//! without any terminal or drawing dependencies. Hosts drive it through
//! [`GameEngine::tick`] and repaint from the drained [`RenderEvent`]s.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod heading;
pub mod state;
pub mod theme;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, StepClock, SystemClock};
pub use config::{GameConfig, OutOfBoundsPolicy, Palette};
pub use engine::{ActorOutcome, GameEngine, Phase, RenderEvent, StepKind, StepReport};
pub use error::GameError;
pub use heading::Heading;
pub use state::{check_bounds, Board, EntityId, Fruit, FruitId, Point, Snake, SnakeId};
pub use theme::ThemeVariables;

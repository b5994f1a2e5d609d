use thiserror::Error;

use super::heading::Heading;
use super::state::SnakeId;

/// Errors raised by the simulation core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A required layout or colour value is missing or unusable
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// A placement landed outside the grid
    #[error("({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    /// An actor was requested with an empty body
    #[error("snake length must be at least 1, got {length}")]
    DegenerateActor { length: usize },

    /// A turn would reverse the head into the body
    #[error("cannot turn from {from:?} to {to:?}: the head would reverse into the body")]
    IllegalTurn { from: Heading, to: Heading },

    #[error("no snake registered with id {0:?}")]
    UnknownSnake(SnakeId),
}

impl GameError {
    pub(crate) fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        GameError::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

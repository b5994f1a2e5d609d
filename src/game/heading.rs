use serde::{Deserialize, Serialize};

/// Cardinal direction an actor advances in, one cell per step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    East,
    North,
    West,
    South,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::East, Heading::North, Heading::West, Heading::South];

    /// Horizontal displacement for one step
    pub fn delta_x(&self) -> i32 {
        match self {
            Heading::East => 1,
            Heading::West => -1,
            Heading::North | Heading::South => 0,
        }
    }

    /// Vertical displacement for one step (rows grow downwards)
    pub fn delta_y(&self) -> i32 {
        match self {
            Heading::North => -1,
            Heading::South => 1,
            Heading::East | Heading::West => 0,
        }
    }

    /// Returns the delta (dx, dy) for moving in this heading
    pub fn delta(&self) -> (i32, i32) {
        (self.delta_x(), self.delta_y())
    }

    pub fn opposite(&self) -> Heading {
        match self {
            Heading::East => Heading::West,
            Heading::North => Heading::South,
            Heading::West => Heading::East,
            Heading::South => Heading::North,
        }
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Heading) -> bool {
        self.opposite() == other
    }
}

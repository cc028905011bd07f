use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete grid position expressed in tile coordinates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns the neighbouring tile in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// Reflects `self` through `pivot`: the tile on the far side of `pivot`
    /// along the vector from `self` to `pivot`.
    pub const fn beyond(self, pivot: Position) -> Self {
        Self::new(2 * pivot.x - self.x, 2 * pivot.y - self.y)
    }

    /// Key used by element-state maps (`"x,y"`).
    pub fn key(self) -> String {
        format!("{},{}", self.x, self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Facing of the player character. Screen coordinates: `y` grows downwards.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Rotates 90° counter-clockwise.
    pub const fn turned_left(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// Rotates 90° clockwise.
    pub const fn turned_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_turns_return_to_start() {
        let mut facing = Direction::Up;
        for _ in 0..4 {
            facing = facing.turned_left();
        }
        assert_eq!(facing, Direction::Up);
        assert_eq!(Direction::Right.turned_left(), Direction::Up);
        assert_eq!(Direction::Right.turned_right(), Direction::Down);
    }

    #[test]
    fn beyond_reflects_through_pivot() {
        let player = Position::new(2, 2);
        let crate_pos = Position::new(3, 2);
        assert_eq!(player.beyond(crate_pos), Position::new(4, 2));
        assert_eq!(Position::new(1, 5).beyond(Position::new(1, 4)), Position::new(1, 3));
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("LEFT".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!(Direction::Down.as_ref(), "down");
    }
}

use crate::errors::{MazeError, MazeResult};
use derive_more::{Add, Display, Sub};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Grid position of a maze cell: `x` is the column, `y` is the row
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Add,
    Sub,
    Display,
    Serialize,
    Deserialize,
)]
#[display("({x}, {y})")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const NORTH: Position = Position { x: 0, y: 1 };
    pub const EAST: Position = Position { x: 1, y: 0 };
    pub const SOUTH: Position = Position { x: 0, y: -1 };
    pub const WEST: Position = Position { x: -1, y: 0 };

    /// Four-connected directions
    pub const DIRECTIONS: [Position; 4] = [
        Position::SOUTH,
        Position::WEST,
        Position::EAST,
        Position::NORTH,
    ];

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether the two positions are one step apart horizontally or vertically
    pub fn is_adjacent_to(&self, other: Position) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

/// Width and height of a rectangular grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{width}x{height}")]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    /// Largest number of cells a maze may hold
    pub const MAX_AREA: usize = 2048 * 2048;

    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Size with both dimensions positive and the area within `MAX_AREA`
    pub fn validated(width: i32, height: i32) -> MazeResult<Self> {
        let area = i64::from(width).checked_mul(i64::from(height));
        if width <= 0 || height <= 0 || area.is_none_or(|area| area > Self::MAX_AREA as i64) {
            return Err(MazeError::InvalidSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of cells covered by this size
    pub fn area(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Swap width and height
    pub fn rotated(&self) -> Self {
        Self::new(self.height, self.width)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0 && position.y >= 0 && position.x < self.width && position.y < self.height
    }

    /// Row-major arena index of the position
    pub fn index_of(&self, position: Position) -> Option<usize> {
        if self.contains(position) {
            Some((position.y * self.width + position.x) as usize)
        } else {
            None
        }
    }

    /// Position stored at the given row-major arena index
    pub fn position_of(&self, index: usize) -> Position {
        let width = self.width.max(1) as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }
}

/// Parse a `WIDTHxHEIGHT` pair of integers
pub(crate) fn parse_pair(input: &str, kind: &str) -> MazeResult<(i32, i32)> {
    let parts: Vec<&str> = input.trim().split('x').collect();
    if parts.len() != 2 {
        return Err(MazeError::ParseFailed {
            reason: format!("Invalid {kind} '{input}'. Expected two x-separated integers"),
        });
    }
    let parse = |part: &str| {
        part.trim().parse::<i32>().map_err(|_| MazeError::ParseFailed {
            reason: format!("Invalid {kind} value '{part}' in '{input}'"),
        })
    };
    Ok((parse(parts[0])?, parse(parts[1])?))
}

impl FromStr for GridSize {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = parse_pair(s, "size")?;
        Ok(GridSize::new(width, height))
    }
}

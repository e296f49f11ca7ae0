//! Core domain types for the grid battle.

use crate::error::GridError;
use serde::{Deserialize, Serialize};

/// Side length of the square battle grid.
pub const GRID_SIZE: usize = 10;

/// Total number of cells on the grid.
pub const TOTAL_CELLS: usize = GRID_SIZE * GRID_SIZE;

/// One of the two competing sides.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter, strum::Display,
)]
pub enum Side {
    /// Side A.
    A,
    /// Side B.
    B,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Result of a contested cell.
///
/// Serialized as exactly `"A"`, `"B"` or `"Tie"`; no other spelling is accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter, strum::Display,
)]
pub enum Winner {
    /// Side A took the cell.
    A,
    /// Side B took the cell.
    B,
    /// Nobody took the cell; it stays empty.
    Tie,
}

impl Winner {
    /// Returns the side that owns the cell after this result, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            Winner::A => Some(Side::A),
            Winner::B => Some(Side::B),
            Winner::Tie => None,
        }
    }
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::A => Winner::A,
            Side::B => Winner::B,
        }
    }
}

/// A cell address on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    row: usize,
    col: usize,
}

#[derive(Deserialize)]
struct RawCoordinate {
    row: usize,
    col: usize,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GridError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.row, raw.col).ok_or(GridError::OutOfBounds {
            row: raw.row,
            col: raw.col,
        })
    }
}

impl Coordinate {
    /// Creates a coordinate, or `None` if it falls outside the grid.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < GRID_SIZE && col < GRID_SIZE).then_some(Self { row, col })
    }

    /// Creates a coordinate from a row-major index (0..100).
    pub fn from_index(index: usize) -> Option<Self> {
        (index < TOTAL_CELLS).then(|| Self {
            row: index / GRID_SIZE,
            col: index % GRID_SIZE,
        })
    }

    /// Row-major index of this coordinate.
    pub fn to_index(self) -> usize {
        self.row * GRID_SIZE + self.col
    }

    /// Zero-based row.
    pub fn row(self) -> usize {
        self.row
    }

    /// Zero-based column.
    pub fn col(self) -> usize {
        self.col
    }

    /// Iterates every coordinate in row-major order.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..TOTAL_CELLS).map(|i| Self {
            row: i / GRID_SIZE,
            col: i % GRID_SIZE,
        })
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Owned-cell counts per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scores {
    /// Cells owned by side A.
    #[serde(rename = "A")]
    pub a: usize,
    /// Cells owned by side B.
    #[serde(rename = "B")]
    pub b: usize,
}

impl Scores {
    /// Creates a score pair.
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// Total owned cells.
    pub fn total(&self) -> usize {
        self.a + self.b
    }

    /// Returns the side with strictly more cells.
    pub fn leader(&self) -> Option<Side> {
        match self.a.cmp(&self.b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}

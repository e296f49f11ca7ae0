//! The 10x10 battle board and its fill/score accounting.

use crate::types::{Coordinate, GRID_SIZE, Scores, Side, Winner};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Fixed-size grid of ownership marks.
///
/// Serialized as ten rows of ten cells, each `"A"`, `"B"` or `null`.
/// A board of any other shape fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Option<Side>; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [[None; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Returns the owner of a cell, `None` when empty.
    pub fn get(&self, at: Coordinate) -> Option<Side> {
        self.cells[at.row()][at.col()]
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, at: Coordinate) -> bool {
        self.get(at).is_none()
    }

    /// Returns the rows of the board.
    pub fn rows(&self) -> &[[Option<Side>; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Lists every empty coordinate in row-major order.
    pub fn open_cells(&self) -> Vec<Coordinate> {
        Coordinate::all().filter(|c| self.is_empty(*c)).collect()
    }

    /// Number of owned cells.
    pub fn filled(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// True iff every cell is owned.
    pub fn is_terminal(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }

    /// Picks an empty cell uniformly at random, `None` on a full board.
    #[instrument(skip(self, rng), fields(filled = self.filled()))]
    pub fn find_open_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coordinate> {
        let open = self.open_cells();
        let picked = open.choose(rng).copied();
        debug!(open = open.len(), picked = ?picked, "Picked open cell");
        picked
    }

    /// Returns a new board with the winner's mark at `at`.
    ///
    /// A tie leaves the cell exactly as it was, so the same coordinate can
    /// be drawn again on a later turn.
    #[instrument(skip(self))]
    pub fn apply_winner(&self, at: Coordinate, winner: Winner) -> Board {
        let mut next = self.clone();
        if let Some(side) = winner.side() {
            next.cells[at.row()][at.col()] = Some(side);
        }
        next
    }

    /// Counts owned cells per side.
    pub fn compute_scores(&self) -> Scores {
        self.cells
            .iter()
            .flatten()
            .fold(Scores::default(), |mut acc, cell| {
                match cell {
                    Some(Side::A) => acc.a += 1,
                    Some(Side::B) => acc.b += 1,
                    None => {}
                }
                acc
            })
    }

    /// Compact text rendering: a column header and one labelled row per line.
    pub fn display(&self) -> String {
        let mut out = String::from("  ");
        for col in 0..GRID_SIZE {
            out.push_str(&format!(" {}", col));
        }
        for (row, cells) in self.cells.iter().enumerate() {
            out.push('\n');
            out.push_str(&format!("{:>2}", row));
            for cell in cells {
                let symbol = match cell {
                    Some(Side::A) => 'A',
                    Some(Side::B) => 'B',
                    None => '.',
                };
                out.push(' ');
                out.push(symbol);
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[[Option<Side>; GRID_SIZE]; GRID_SIZE]> for Board {
    fn from(cells: [[Option<Side>; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }
}

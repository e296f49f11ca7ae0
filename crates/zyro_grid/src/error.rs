//! Grid model errors.

/// Error raised when grid input violates the fixed board shape.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    /// A coordinate lies outside the 10x10 grid.
    #[display("Coordinate ({}, {}) is outside the grid", row, col)]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
}

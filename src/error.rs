//! Error types for grid_astar.
//!
//! Only caller mistakes are errors. A search that finds no path or is cancelled ends
//! with an ordinary [Outcome](crate::Outcome).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("({x}, {y}) is outside of the {size}x{size} grid")]
    OutOfBounds { x: i32, y: i32, size: usize },

    #[error("a grid needs at least one cell")]
    EmptyGrid,

    #[error("a {0}x{0} grid cannot be addressed")]
    TooLarge(usize),

    #[error("heuristic factor must be finite and non-negative")]
    InvalidHeuristicFactor,

    #[error("no start cell has been designated")]
    MissingStart,

    #[error("no end cell has been designated")]
    MissingEnd,
}

pub type Result<T> = std::result::Result<T, GridError>;

//! # grid_astar
//!
//! The core of an interactive grid pathfinding visualizer. A [PathingGrid] owns an N×N
//! arrangement of cells that are free, barriers or designated start/end cells, and an
//! [AstarSolver] runs a weighted
//! [A* search](https://en.wikipedia.org/wiki/A*_search_algorithm) over its
//! 8-connected adjacency, reporting every expansion to a progress callback so the
//! caller can redraw the grid as the search unfolds.
//!
//! Moves never cut across the corner of a barrier, every step costs [STEP_COST]
//! regardless of direction, and the remaining distance is estimated with the
//! [octile distance](octile_distance) in tenths.
//!
//! ```
//! use grid_astar::{AstarSolver, Outcome, PathingGrid};
//! use grid_util::point::Point;
//!
//! let mut grid = PathingGrid::new(5, 10).unwrap();
//! grid.set_start(Point::new(0, 0)).unwrap();
//! grid.set_end(Point::new(4, 4)).unwrap();
//! grid.recompute_neighbours();
//! let outcome = AstarSolver::new().find_path(&mut grid).unwrap();
//! assert!(matches!(outcome, Outcome::Found(path) if path.len() == 5));
//! ```
pub mod astar;
pub mod cell;
pub mod error;
pub mod pathing_grid;
pub mod solver;

use grid_util::point::Point;

pub use astar::{Outcome, Search, Step};
pub use cell::{Cell, CellState};
pub use error::{GridError, Result};
pub use pathing_grid::PathingGrid;
pub use solver::AstarSolver;

/// Heuristic weight of a straight (cardinal) move.
pub const C: i32 = 10;
/// Heuristic weight of a diagonal move, 10·√2 rounded down.
pub const D: i32 = 14;
/// Cost charged by the search for any move, straight or diagonal.
pub const STEP_COST: i32 = 1;
/// Score of a cell that has not been reached by the current search.
pub const UNSCORED: i32 = i32::MAX;
pub const DEFAULT_GRID_SIZE: usize = 50;
pub const DEFAULT_CELL_SPAN: u32 = 10;
pub const N_SMALLVEC_SIZE: usize = 8;

/// Octile distance between two points, taking the maximal amount of diagonal steps
/// ([D] each) before going straight ([C] each).
///
/// Note that this is measured on a different scale than [STEP_COST], so the estimate
/// dominates the accumulated cost and the search behaves close to greedy best-first.
pub fn octile_distance(p1: &Point, p2: &Point) -> i32 {
    let delta_x = (p1.x - p2.x).abs();
    let delta_y = (p1.y - p2.y).abs();
    if delta_x > delta_y {
        D * delta_y + C * (delta_x - delta_y)
    } else {
        D * delta_x + C * (delta_y - delta_x)
    }
}

/// Number of moves needed between two points on an open 8-connected grid.
pub fn chebyshev_distance(p1: &Point, p2: &Point) -> i32 {
    (p1.x - p2.x).abs().max((p1.y - p2.y).abs())
}

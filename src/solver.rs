use grid_util::point::Point;
use log::warn;

use crate::astar::{Outcome, Search};
use crate::error::{GridError, Result};
use crate::octile_distance;
use crate::pathing_grid::PathingGrid;

/// Weighted A* configuration. The heuristic is the [octile distance](octile_distance)
/// scaled by `heuristic_factor`; values above 1.0 push the search towards the end more
/// aggressively.
#[derive(Clone, Debug)]
pub struct AstarSolver {
    pub heuristic_factor: f32,
}

impl Default for AstarSolver {
    fn default() -> AstarSolver {
        AstarSolver::new()
    }
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver {
            heuristic_factor: 1.0,
        }
    }

    /// Just the octile distance times the heuristic factor.
    /// Saturates at `i32::MAX` for very large factors.
    pub fn heuristic(&self, p1: &Point, p2: &Point) -> i32 {
        (octile_distance(p1, p2) as f32 * self.heuristic_factor) as i32
    }

    /// Prepares a search between the designated start and end of the grid. Neighbours are
    /// used as they are; call [PathingGrid::recompute_neighbours] first if barriers changed.
    pub fn search<'a>(&self, grid: &'a mut PathingGrid) -> Result<Search<'a>> {
        if !self.heuristic_factor.is_finite() || self.heuristic_factor < 0.0 {
            return Err(GridError::InvalidHeuristicFactor);
        }
        let start = grid.start().ok_or(GridError::MissingStart)?;
        let end = grid.end().ok_or(GridError::MissingEnd)?;
        if grid.neighbours_dirty {
            warn!("Searching with neighbours that predate the last barrier change");
        }
        let start_ix = grid.index(start)?;
        let end_ix = grid.index(end)?;
        Ok(Search::new(grid, start_ix, end_ix, self))
    }

    /// Runs a full search, see [Search::run_to_completion].
    pub fn solve<FC, FP>(&self, grid: &mut PathingGrid, cancel: FC, progress: FP) -> Result<Outcome>
    where
        FC: FnMut() -> bool,
        FP: FnMut(&PathingGrid),
    {
        Ok(self.search(grid)?.run_to_completion(cancel, progress))
    }

    /// Runs a full search without progress reporting or cancellation.
    pub fn find_path(&self, grid: &mut PathingGrid) -> Result<Outcome> {
        self.solve(grid, || false, |_| {})
    }
}

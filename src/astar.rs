//! Step-wise weighted A* over the adjacency of a [PathingGrid].
//!
//! A [Search] borrows the grid mutably for its whole lifetime and writes its progress
//! into the cell states, so a renderer that only looks at the grid can show the
//! frontier, the closed set and finally the path. It can be driven one expansion at a
//! time with [Search::advance] or run with [Search::run_to_completion].
use fxhash::{FxBuildHasher, FxHashSet};
use grid_util::point::Point;
use indexmap::IndexMap;
use log::{debug, info};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::cell::CellState;
use crate::pathing_grid::PathingGrid;
use crate::solver::AstarSolver;
use crate::STEP_COST;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Frontier entry. The scores are frozen at insertion time; a cell whose score improves
/// while it is queued keeps its original position in the heap.
struct SmallestCostHolder {
    estimated_cost: i32,
    cost: i32,
    sequence: usize,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for the max-heap: smallest estimated cost first, then smallest cost,
        // then the earliest insertion
        other
            .estimated_cost
            .cmp(&self.estimated_cost)
            .then_with(|| other.cost.cmp(&self.cost))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Terminal result of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The cells from start to end, both included. Intermediate cells are marked
    /// [CellState::Path] on the grid.
    Found(Vec<Point>),
    /// The frontier ran empty before the end was reached.
    NoPath,
    /// The search was cancelled; the marks made so far are left on the grid.
    Aborted,
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }
    pub fn path(&self) -> Option<&[Point]> {
        match self {
            Outcome::Found(path) => Some(path),
            _ => None,
        }
    }
}

/// What a single call to [Search::advance] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The cell was expanded and its neighbours relaxed.
    Expanded(Point),
    /// The cell was marked as part of the path while walking back from the end.
    Traced(Point),
    /// The search is over, see [Search::outcome].
    Done,
}

enum Phase {
    Expanding,
    Tracing { cursor: usize },
    Finished(Outcome),
}

pub struct Search<'a> {
    grid: &'a mut PathingGrid,
    solver: AstarSolver,
    start: usize,
    end: usize,
    goal: Point,
    to_see: BinaryHeap<SmallestCostHolder>,
    in_frontier: FxHashSet<usize>,
    /// Maps a cell to the cell it was reached from.
    came_from: FxIndexMap<usize, usize>,
    sequence: usize,
    expansions: usize,
    phase: Phase,
}

impl<'a> Search<'a> {
    /// Resets the scores of every cell and queues the start. Callers are expected to pass
    /// in-bounds positions and to have refreshed the neighbours of the grid.
    pub(crate) fn new(
        grid: &'a mut PathingGrid,
        start: usize,
        end: usize,
        solver: &AstarSolver,
    ) -> Search<'a> {
        grid.reset_scores();
        let origin = grid.cells[start].position;
        let goal = grid.cells[end].position;
        info!("Searching for a path from {} to {}", origin, goal);
        let mut search = Search {
            grid,
            solver: solver.clone(),
            start,
            end,
            goal,
            to_see: BinaryHeap::new(),
            in_frontier: FxHashSet::default(),
            came_from: FxIndexMap::default(),
            sequence: 0,
            expansions: 0,
            phase: Phase::Expanding,
        };
        let estimate = search.heuristic(&origin);
        let cell = &mut search.grid.cells[start];
        cell.g = 0;
        cell.f = estimate;
        search.push(start, estimate, 0);
        search
    }

    fn heuristic(&self, point: &Point) -> i32 {
        self.solver.heuristic(point, &self.goal)
    }

    fn push(&mut self, index: usize, estimated_cost: i32, cost: i32) {
        self.to_see.push(SmallestCostHolder {
            estimated_cost,
            cost,
            sequence: self.sequence,
            index,
        });
        self.sequence += 1;
        self.in_frontier.insert(index);
    }

    /// Marks a cell unless it is the designated start or end.
    fn mark(&mut self, index: usize, state: CellState) {
        if index != self.start && index != self.end {
            self.grid.mark(index, state);
        }
    }

    /// Performs one unit of work: expanding the best frontier cell, or marking one more
    /// path cell once the end has been reached.
    pub fn advance(&mut self) -> Step {
        match self.phase {
            Phase::Expanding => self.expand(),
            Phase::Tracing { cursor } => self.trace(cursor),
            Phase::Finished(_) => Step::Done,
        }
    }

    fn expand(&mut self) -> Step {
        let Some(SmallestCostHolder { index, .. }) = self.to_see.pop() else {
            info!(
                "Frontier exhausted after {} expansions, {} cannot be reached",
                self.expansions, self.goal
            );
            self.phase = Phase::Finished(Outcome::NoPath);
            return Step::Done;
        };
        self.in_frontier.remove(&index);
        if index == self.end {
            debug!("Reached {} after {} expansions", self.goal, self.expansions);
            return self.trace(index);
        }

        let current_cost = self.grid.cells[index].g;
        let neighbours = self.grid.cells[index].neighbours.clone();
        for neighbour in neighbours {
            let new_cost = current_cost + STEP_COST;
            if new_cost >= self.grid.cells[neighbour].g {
                continue;
            }
            // A large heuristic factor can push the estimate up to i32::MAX
            let estimated_cost =
                new_cost.saturating_add(self.heuristic(&self.grid.cells[neighbour].position));
            self.came_from.insert(neighbour, index);
            let cell = &mut self.grid.cells[neighbour];
            cell.g = new_cost;
            cell.f = estimated_cost;
            if !self.in_frontier.contains(&neighbour) {
                self.push(neighbour, estimated_cost, new_cost);
                self.mark(neighbour, CellState::Open);
            }
        }
        self.mark(index, CellState::Closed);
        self.expansions += 1;
        Step::Expanded(self.grid.cells[index].position)
    }

    /// Walks one predecessor link back from `cursor`, finishing once the start is next.
    fn trace(&mut self, cursor: usize) -> Step {
        match self.came_from.get(&cursor).copied() {
            Some(parent) if parent != self.start => {
                self.mark(parent, CellState::Path);
                self.phase = Phase::Tracing { cursor: parent };
                Step::Traced(self.grid.cells[parent].position)
            }
            _ => {
                self.finish_path();
                Step::Done
            }
        }
    }

    fn finish_path(&mut self) {
        self.grid.mark(self.start, CellState::Start);
        self.grid.mark(self.end, CellState::End);
        let mut path: Vec<Point> = std::iter::successors(Some(self.end), |ix| {
            self.came_from.get(ix).copied()
        })
        .map(|ix| self.grid.cells[ix].position)
        .collect();
        path.reverse();
        info!(
            "Found a path of {} steps after {} expansions",
            path.len() - 1,
            self.expansions
        );
        self.phase = Phase::Finished(Outcome::Found(path));
    }

    /// Stops the search, leaving the marks made so far on the grid.
    pub fn abort(&mut self) {
        if !self.is_finished() {
            info!("Search aborted after {} expansions", self.expansions);
            self.phase = Phase::Finished(Outcome::Aborted);
        }
    }

    /// Runs the search until it finishes. `cancel` is polled before every step and ends the
    /// search with [Outcome::Aborted] when it returns `true`; `progress` is called with the
    /// grid after every expansion and every traced path cell.
    pub fn run_to_completion<FC, FP>(mut self, mut cancel: FC, mut progress: FP) -> Outcome
    where
        FC: FnMut() -> bool,
        FP: FnMut(&PathingGrid),
    {
        while !self.is_finished() {
            if cancel() {
                self.abort();
                break;
            }
            match self.advance() {
                Step::Expanded(_) | Step::Traced(_) => progress(self.grid()),
                Step::Done => {}
            }
        }
        self.into_outcome().unwrap_or(Outcome::Aborted)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn into_outcome(self) -> Option<Outcome> {
        match self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Number of cells expanded so far.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    pub fn frontier_len(&self) -> usize {
        self.to_see.len()
    }

    /// Read-only view of the grid being searched, for rendering between steps.
    pub fn grid(&self) -> &PathingGrid {
        &*self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder(estimated_cost: i32, cost: i32, sequence: usize) -> SmallestCostHolder {
        SmallestCostHolder {
            estimated_cost,
            cost,
            sequence,
            index: sequence,
        }
    }

    #[test]
    fn heap_orders_by_estimate_cost_then_insertion() {
        let mut heap = BinaryHeap::new();
        heap.push(holder(20, 3, 0));
        heap.push(holder(10, 5, 1));
        heap.push(holder(10, 2, 2));
        heap.push(holder(10, 2, 3));
        heap.push(holder(5, 9, 4));
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|h| h.sequence)).collect();
        assert_eq!(order, vec![4, 2, 3, 1, 0]);
    }

    fn open_grid(size: usize, start: Point, end: Point) -> PathingGrid {
        let mut grid = PathingGrid::new(size, 10).unwrap();
        grid.set_start(start).unwrap();
        grid.set_end(end).unwrap();
        grid.recompute_neighbours();
        grid
    }

    #[test]
    fn advance_reports_each_phase() {
        let start = Point::new(0, 0);
        let end = Point::new(0, 3);
        let mut grid = open_grid(4, start, end);
        let (s, e) = (grid.index(start).unwrap(), grid.index(end).unwrap());
        let mut search = Search::new(&mut grid, s, e, &AstarSolver::new());
        assert_eq!(search.frontier_len(), 1);
        assert_eq!(search.advance(), Step::Expanded(start));
        // (1, 0), (0, 1) and (1, 1) were discovered
        assert_eq!(search.frontier_len(), 3);
        assert_eq!(search.advance(), Step::Expanded(Point::new(0, 1)));
        assert_eq!(search.advance(), Step::Expanded(Point::new(0, 2)));
        assert_eq!(search.advance(), Step::Traced(Point::new(0, 2)));
        assert_eq!(search.advance(), Step::Traced(Point::new(0, 1)));
        assert_eq!(search.advance(), Step::Done);
        assert_eq!(search.advance(), Step::Done);
        assert_eq!(search.expansions(), 3);
        assert_eq!(
            search.outcome(),
            Some(&Outcome::Found(vec![
                start,
                Point::new(0, 1),
                Point::new(0, 2),
                end
            ]))
        );
    }

    #[test]
    fn marks_follow_progress() {
        let start = Point::new(0, 0);
        let end = Point::new(2, 2);
        let mut grid = open_grid(3, start, end);
        let (s, e) = (grid.index(start).unwrap(), grid.index(end).unwrap());
        let mut search = Search::new(&mut grid, s, e, &AstarSolver::new());
        search.advance();
        let grid_view = search.grid();
        assert_eq!(grid_view.state(start).unwrap(), CellState::Start);
        assert_eq!(grid_view.state(Point::new(1, 0)).unwrap(), CellState::Open);
        assert_eq!(grid_view.state(Point::new(1, 1)).unwrap(), CellState::Open);
        assert_eq!(grid_view.cell(Point::new(1, 1)).unwrap().g(), 1);
        assert_eq!(grid_view.cell(Point::new(1, 1)).unwrap().f(), 1 + 14);
        search.advance();
        assert_eq!(
            search.grid().state(Point::new(1, 1)).unwrap(),
            CellState::Closed
        );
        // The end is discovered without losing its state
        assert_eq!(search.grid().state(end).unwrap(), CellState::End);
        assert_eq!(search.advance(), Step::Traced(Point::new(1, 1)));
        assert_eq!(
            search.grid().state(Point::new(1, 1)).unwrap(),
            CellState::Path
        );
        assert_eq!(search.advance(), Step::Done);
    }

    #[test]
    fn abort_keeps_partial_marks() {
        let start = Point::new(0, 0);
        let end = Point::new(7, 7);
        let mut grid = open_grid(8, start, end);
        let (s, e) = (grid.index(start).unwrap(), grid.index(end).unwrap());
        let mut search = Search::new(&mut grid, s, e, &AstarSolver::new());
        search.advance();
        search.advance();
        search.abort();
        assert_eq!(search.advance(), Step::Done);
        assert_eq!(search.into_outcome(), Some(Outcome::Aborted));
        assert_eq!(grid.state(Point::new(1, 1)).unwrap(), CellState::Closed);
        assert_eq!(grid.state(end).unwrap(), CellState::End);
    }

    #[test]
    fn cancel_is_polled_before_each_step() {
        let start = Point::new(0, 0);
        let end = Point::new(9, 9);
        let mut grid = open_grid(10, start, end);
        let (s, e) = (grid.index(start).unwrap(), grid.index(end).unwrap());
        let search = Search::new(&mut grid, s, e, &AstarSolver::new());
        let mut polls = 0;
        let mut frames = 0;
        let outcome = search.run_to_completion(
            || {
                polls += 1;
                polls > 3
            },
            |_| frames += 1,
        );
        assert_eq!(outcome, Outcome::Aborted);
        assert_eq!(frames, 3);
    }
}

use core::fmt;
use grid_util::point::Point;
use itertools::iproduct;
use log::debug;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::cell::{Cell, CellState};
use crate::error::{GridError, Result};
use crate::{DEFAULT_CELL_SPAN, DEFAULT_GRID_SIZE, N_SMALLVEC_SIZE};

/// Order in which candidate neighbours are considered: down, up, right, left, then the
/// diagonals down-left, up-left, down-right and up-right. Rows grow downwards (`x`),
/// columns to the right (`y`).
const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, -1),
    (-1, -1),
    (1, 1),
    (-1, 1),
];

/// [PathingGrid] owns a square arrangement of [Cell]s and keeps track of which of them
/// are designated start and end. Adjacency is stored per cell and is only refreshed by
/// [recompute_neighbours](Self::recompute_neighbours), which also regenerates the
/// connected components kept in a [UnionFind] structure.
#[derive(Clone, Debug)]
pub struct PathingGrid {
    size: usize,
    cell_span: u32,
    pub(crate) cells: Vec<Cell>,
    start: Option<Point>,
    end: Option<Point>,
    pub components: UnionFind<usize>,
    /// Set whenever a barrier is placed or lifted after the last neighbour recompute.
    pub neighbours_dirty: bool,
}

impl Default for PathingGrid {
    fn default() -> PathingGrid {
        PathingGrid::build(DEFAULT_GRID_SIZE, DEFAULT_CELL_SPAN)
    }
}

impl PathingGrid {
    /// Creates a `size`×`size` grid of free cells, each `cell_span` pixels wide. The side
    /// length must fit an `i32` coordinate and the cell count a `usize`.
    pub fn new(size: usize, cell_span: u32) -> Result<PathingGrid> {
        if size == 0 {
            return Err(GridError::EmptyGrid);
        }
        if size > i32::MAX as usize || size.checked_mul(size).is_none() {
            return Err(GridError::TooLarge(size));
        }
        Ok(PathingGrid::build(size, cell_span))
    }

    fn build(size: usize, cell_span: u32) -> PathingGrid {
        let cells = iproduct!(0..size as i32, 0..size as i32)
            .map(|(x, y)| Cell::new(Point::new(x, y), cell_span))
            .collect();
        PathingGrid {
            size,
            cell_span,
            cells,
            start: None,
            end: None,
            components: UnionFind::new(size * size),
            neighbours_dirty: true,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }
    pub fn cell_span(&self) -> u32 {
        self.cell_span
    }
    /// Side length of the rendered grid in pixels.
    pub fn pixel_width(&self) -> u64 {
        self.size as u64 * self.cell_span as u64
    }
    pub fn start(&self) -> Option<Point> {
        self.start
    }
    pub fn end(&self) -> Option<Point> {
        self.end
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.size
            && (point.y as usize) < self.size
    }

    /// Storage index of a point, row-major.
    pub fn index(&self, point: Point) -> Result<usize> {
        if self.in_bounds(point) {
            Ok(point.x as usize * self.size + point.y as usize)
        } else {
            Err(GridError::OutOfBounds {
                x: point.x,
                y: point.y,
                size: self.size,
            })
        }
    }

    pub fn cell(&self, point: Point) -> Result<&Cell> {
        let ix = self.index(point)?;
        Ok(&self.cells[ix])
    }

    pub fn state(&self, point: Point) -> Result<CellState> {
        self.cell(point).map(Cell::state)
    }

    /// All cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Sets the traversal state of a cell. Neighbour lists are left untouched.
    ///
    /// Designating a cell as [CellState::Start] or [CellState::End] demotes the previously
    /// designated cell to [CellState::Free], and giving the designated cell any other state
    /// drops the designation, so there is never more than one start and one end.
    pub fn set_state(&mut self, point: Point, state: CellState) -> Result<()> {
        let ix = self.index(point)?;
        let previous = self.cells[ix].state;
        if previous == state {
            return Ok(());
        }
        match state {
            CellState::Start => {
                if let Some(old) = self.start.replace(point) {
                    self.demote(old, CellState::Start);
                }
            }
            CellState::End => {
                if let Some(old) = self.end.replace(point) {
                    self.demote(old, CellState::End);
                }
            }
            _ => {}
        }
        if state != CellState::Start && self.start == Some(point) {
            self.start = None;
        }
        if state != CellState::End && self.end == Some(point) {
            self.end = None;
        }
        if previous.is_barrier() != state.is_barrier() {
            self.neighbours_dirty = true;
        }
        self.cells[ix].state = state;
        Ok(())
    }

    fn demote(&mut self, point: Point, expected: CellState) {
        if let Ok(ix) = self.index(point) {
            if self.cells[ix].state == expected {
                self.cells[ix].state = CellState::Free;
            }
        }
    }

    pub fn set_start(&mut self, point: Point) -> Result<()> {
        self.set_state(point, CellState::Start)
    }
    pub fn set_end(&mut self, point: Point) -> Result<()> {
        self.set_state(point, CellState::End)
    }
    pub fn set_barrier(&mut self, point: Point) -> Result<()> {
        self.set_state(point, CellState::Barrier)
    }

    /// Turns a cell back into a free cell, releasing a start or end designation it held.
    pub fn reset(&mut self, point: Point) -> Result<()> {
        self.set_state(point, CellState::Free)
    }

    /// Turns every cell back into an unscored free cell and drops both designations.
    pub fn clear(&mut self) {
        debug!("Clearing {}x{} grid", self.size, self.size);
        *self = PathingGrid::build(self.size, self.cell_span);
    }

    /// Wipes the marks and scores left by a search while keeping barriers and the
    /// designated start and end.
    pub fn clear_search(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.state.is_search_mark() {
                cell.state = CellState::Free;
            }
            cell.reset_scores();
        }
    }

    pub(crate) fn reset_scores(&mut self) {
        self.cells.iter_mut().for_each(Cell::reset_scores);
    }

    /// Overwrites a cell state during a search, bypassing designation bookkeeping.
    pub(crate) fn mark(&mut self, ix: usize, state: CellState) {
        self.cells[ix].state = state;
    }

    fn passable(&self, x: i32, y: i32) -> bool {
        self.index(Point::new(x, y))
            .map_or(false, |ix| !self.cells[ix].state.is_barrier())
    }

    /// Cells reachable in one move from `point` under the current barrier layout. A
    /// diagonal move is only allowed when neither cell sharing its corner is a barrier.
    fn adjacent(&self, point: Point) -> SmallVec<[usize; N_SMALLVEC_SIZE]> {
        NEIGHBOUR_OFFSETS
            .iter()
            .filter(|&&(dx, dy)| {
                self.passable(point.x + dx, point.y + dy)
                    && (dx == 0
                        || dy == 0
                        || (self.passable(point.x + dx, point.y)
                            && self.passable(point.x, point.y + dy)))
            })
            .map(|&(dx, dy)| (point.x + dx) as usize * self.size + (point.y + dy) as usize)
            .collect()
    }

    /// Rebuilds every neighbour list from the current barrier layout and regenerates the
    /// connected components. Must be called before a search whenever barriers changed.
    pub fn recompute_neighbours(&mut self) {
        debug!("Recomputing neighbours of {}x{} grid", self.size, self.size);
        for ix in 0..self.cells.len() {
            let neighbours = if self.cells[ix].state.is_barrier() {
                SmallVec::new()
            } else {
                self.adjacent(self.cells[ix].position)
            };
            self.cells[ix].neighbours = neighbours;
        }
        self.neighbours_dirty = false;
        self.generate_components();
    }

    /// Recomputes neighbours if barriers changed since the last recompute.
    pub fn update(&mut self) {
        if self.neighbours_dirty {
            self.recompute_neighbours();
        }
    }

    /// Neighbours of a cell as of the last [recompute_neighbours](Self::recompute_neighbours).
    pub fn neighbours(&self, point: Point) -> Result<impl Iterator<Item = Point> + '_> {
        let ix = self.index(point)?;
        Ok(self.cells[ix]
            .neighbours
            .iter()
            .map(move |&n| self.cells[n].position))
    }

    /// Generates a new [UnionFind] structure and links up neighbouring cells to the same
    /// components.
    pub fn generate_components(&mut self) {
        debug!("Generating connected components");
        let mut components = UnionFind::new(self.cells.len());
        for (ix, cell) in self.cells.iter().enumerate() {
            for &n in &cell.neighbours {
                components.union(ix, n);
            }
        }
        self.components = components;
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> Result<usize> {
        let ix = self.index(*point)?;
        Ok(self.components.find(ix))
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component. Points outside of the grid
    /// are unreachable.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        match (self.index(*start), self.index(*goal)) {
            (Ok(start_ix), Ok(goal_ix)) => !self.components.equiv(start_ix, goal_ix),
            _ => true,
        }
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line: String = row.iter().map(|cell| cell.state.glyph()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

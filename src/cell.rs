use core::fmt;
use grid_util::point::Point;
use smallvec::SmallVec;

use crate::{N_SMALLVEC_SIZE, UNSCORED};

/// Traversal state of a [Cell]. Only [CellState::Barrier] blocks movement; `Open`,
/// `Closed` and `Path` record search progress for rendering and are free otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Free,
    Barrier,
    Start,
    End,
    Open,
    Closed,
    Path,
}

impl CellState {
    pub fn is_barrier(self) -> bool {
        self == CellState::Barrier
    }

    /// States that are written by a search and wiped by
    /// [clear_search](crate::PathingGrid::clear_search).
    pub fn is_search_mark(self) -> bool {
        matches!(self, CellState::Open | CellState::Closed | CellState::Path)
    }

    /// Character used when a grid is printed.
    pub fn glyph(self) -> char {
        match self {
            CellState::Free => '.',
            CellState::Barrier => '#',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::Open => 'o',
            CellState::Closed => 'x',
            CellState::Path => '*',
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// One addressable unit of a [PathingGrid](crate::PathingGrid). `x` of the position is
/// the row, `y` the column.
#[derive(Clone, Debug)]
pub struct Cell {
    pub(crate) position: Point,
    pub(crate) span: u32,
    pub(crate) state: CellState,
    pub(crate) g: i32,
    pub(crate) f: i32,
    /// Storage indices of adjacent cells, valid as of the last neighbour recompute.
    pub(crate) neighbours: SmallVec<[usize; N_SMALLVEC_SIZE]>,
}

impl Cell {
    pub(crate) fn new(position: Point, span: u32) -> Cell {
        Cell {
            position,
            span,
            state: CellState::Free,
            g: UNSCORED,
            f: UNSCORED,
            neighbours: SmallVec::new(),
        }
    }
    pub fn position(&self) -> Point {
        self.position
    }
    pub fn row(&self) -> i32 {
        self.position.x
    }
    pub fn col(&self) -> i32 {
        self.position.y
    }
    pub fn state(&self) -> CellState {
        self.state
    }
    /// Cost of the cheapest known path from the start, [UNSCORED] if not reached.
    pub fn g(&self) -> i32 {
        self.g
    }
    /// `g` plus the weighted estimate to the end, [UNSCORED] if not reached.
    pub fn f(&self) -> i32 {
        self.f
    }
    pub fn is_scored(&self) -> bool {
        self.g != UNSCORED
    }
    pub fn span(&self) -> u32 {
        self.span
    }
    /// Top-left pixel of the cell for renderers; rows advance along the horizontal axis.
    pub fn pixel_origin(&self) -> (u64, u64) {
        (
            self.position.x as u64 * self.span as u64,
            self.position.y as u64 * self.span as u64,
        )
    }
    pub(crate) fn reset_scores(&mut self) {
        self.g = UNSCORED;
        self.f = UNSCORED;
    }
}

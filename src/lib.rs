//! # grid_visualizer
//!
//! An interactive grid pathfinding visualizer. Walls, a start and a goal are
//! painted onto a fixed-size grid, after which a grid
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search is run one
//! visitation at a time so that its progress can be animated.
//!
//! The search itself is exposed as a lazy iterator of [SearchEvent]s (see
//! [SearchContext::search] and [solver::search_steps]) which knows nothing
//! about rendering. The [Animator] consumes those events, updates the
//! [Markers] and paces each visitation through a [Ticker]. The [Visualizer]
//! ties everything together behind click, drag and run controls.
//!
//! Moves are 8-directional with uniform cost and the heuristic is the
//! Manhattan distance, which overestimates for diagonal moves. Paths found are
//! therefore valid but not always minimal.
pub mod animation;
pub mod board;
pub mod markers;
pub mod search_context;
pub mod solver;
pub mod visualizer;

pub use animation::{Animator, Counters, Renderer, RunOutcome, Speed, ThreadTicker, Ticker, Unpaced};
pub use board::{Board, CellState, ParseBoardError, Tool};
pub use markers::{Marker, Markers};
pub use search_context::{FoundPath, SearchContext, SearchEvent, StepSearch};
pub use solver::{AstarSolver, GridSolver};
pub use visualizer::{Notice, RunError, RunReport, Visualizer};

use grid_util::point::Point;

/// Number of rows of the default grid.
pub const ROWS: usize = 25;
/// Number of columns of the default grid.
pub const COLS: usize = 45;

/// Delay between two visitations when nothing else is configured.
pub const DEFAULT_DELAY_MS: u32 = 15;
pub const MIN_DELAY_MS: u32 = 1;
pub const MAX_DELAY_MS: u32 = 200;

/// Cost of a single move, diagonal or not.
pub const STEP_COST: u32 = 1;

const N_SMALLVEC_SIZE: usize = 8;

/// Addresses a cell by row and column. Columns map to `x` and rows to `y`.
pub fn cell(row: usize, col: usize) -> Point {
    Point::new(col as i32, row as i32)
}

/// Whether two cells are equal or touch, diagonals included.
pub fn adjacent(p1: &Point, p2: &Point) -> bool {
    (p1.x - p2.x).abs() <= 1 && (p1.y - p2.y).abs() <= 1
}

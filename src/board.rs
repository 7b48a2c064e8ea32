use crate::{cell, N_SMALLVEC_SIZE};
use core::fmt;
use grid_util::grid::{BoolGrid, SimpleValueGrid, ValueGrid};
use grid_util::point::Point;
use log::debug;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;
use std::str::FromStr;

/// Offsets `(dx, dy)` of the 8 neighbours in the order they are expanded:
/// up, down, left, right, then the diagonals up-left, up-right, down-left,
/// down-right.
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// State of a single cell. Start and goal are both passable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Empty,
    Wall,
    Start,
    Goal,
}

impl CellState {
    pub fn passable(self) -> bool {
        self != CellState::Wall
    }

    pub fn symbol(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Wall => '#',
            CellState::Start => 'S',
            CellState::Goal => 'G',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<CellState> {
        match symbol {
            '.' => Some(CellState::Empty),
            '#' => Some(CellState::Wall),
            'S' => Some(CellState::Start),
            'G' => Some(CellState::Goal),
            _ => None,
        }
    }
}

/// The painting tool that a click applies. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    Start,
    Goal,
    #[default]
    Wall,
    Erase,
}

/// Errors produced when parsing a [Board] from its ASCII form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseBoardError {
    #[error("layout contains no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { row: usize, col: usize, symbol: char },
    #[error("second start at row {row}, column {col}")]
    DuplicateStart { row: usize, col: usize },
    #[error("second goal at row {row}, column {col}")]
    DuplicateGoal { row: usize, col: usize },
}

/// [Board] holds the painted state of every cell together with the singleton
/// start and goal references. Like a pathing grid it also maintains
/// [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
/// of passable cells in a [UnionFind], which is used to tell in advance
/// whether a search can succeed.
#[derive(Clone, Debug)]
pub struct Board {
    cells: SimpleValueGrid<CellState>,
    start: Option<Point>,
    goal: Option<Point>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Board {
        Board {
            cells: SimpleValueGrid::new(cols, rows, CellState::Empty),
            start: None,
            goal: None,
            components: UnionFind::new(rows * cols),
            components_dirty: true,
        }
    }

    /// Builds a board from a wall mask where `true` marks a wall.
    pub fn from_walls(walls: &BoolGrid) -> Board {
        let mut board = Board::new(walls.height(), walls.width());
        for y in 0..walls.height() as i32 {
            for x in 0..walls.width() as i32 {
                if walls.get(x, y) {
                    board.cells.set(x, y, CellState::Wall);
                }
            }
        }
        board.generate_components();
        board
    }

    pub fn rows(&self) -> usize {
        self.cells.height()
    }

    pub fn cols(&self) -> usize {
        self.cells.width()
    }

    pub fn in_bounds(&self, point: &Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.cols()
            && (point.y as usize) < self.rows()
    }

    /// The state of a cell, [None] when out of bounds.
    pub fn state(&self, point: &Point) -> Option<CellState> {
        if self.in_bounds(point) {
            Some(self.cells.get_point(*point))
        } else {
            None
        }
    }

    pub fn is_wall(&self, point: &Point) -> bool {
        self.state(point) == Some(CellState::Wall)
    }

    /// Whether a search may step onto this cell.
    pub fn is_passable(&self, point: &Point) -> bool {
        self.state(point).is_some_and(CellState::passable)
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn goal(&self) -> Option<Point> {
        self.goal
    }

    /// Number of walls currently painted.
    pub fn wall_count(&self) -> usize {
        self.points().filter(|p| self.is_wall(p)).count()
    }

    /// All cells in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let (rows, cols) = (self.rows(), self.cols());
        (0..rows).flat_map(move |row| (0..cols).map(move |col| cell(row, col)))
    }

    /// The 8 surrounding points in expansion order, not filtered for bounds.
    pub fn neighborhood_points(&self, point: &Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        NEIGHBOUR_OFFSETS
            .iter()
            .map(|(dx, dy)| Point::new(point.x + dx, point.y + dy))
            .collect()
    }

    /// The surrounding points a search may move to. Diagonal moves are
    /// allowed even when both flanking cells are walls.
    pub fn passable_neighbours(&self, point: &Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        self.neighborhood_points(point)
            .into_iter()
            .filter(|p| self.is_passable(p))
            .collect()
    }

    /// Applies a click of `tool` at `point`.
    pub fn apply_tool(&mut self, tool: Tool, point: Point) {
        match tool {
            Tool::Start => self.set_start(point),
            Tool::Goal => self.set_goal(point),
            Tool::Wall => self.toggle_wall(point),
            Tool::Erase => {
                self.set_wall(point, false);
            }
        }
    }

    /// Moves the start to `point`, replacing a wall or the goal found there.
    pub fn set_start(&mut self, point: Point) {
        if !self.in_bounds(&point) {
            debug!("Ignoring start outside the board at {}", point);
            return;
        }
        if let Some(previous) = self.start.take() {
            self.write(previous, CellState::Empty);
        }
        if self.goal == Some(point) {
            self.goal = None;
        }
        self.write(point, CellState::Start);
        self.start = Some(point);
    }

    /// Moves the goal to `point`, replacing a wall or the start found there.
    pub fn set_goal(&mut self, point: Point) {
        if !self.in_bounds(&point) {
            debug!("Ignoring goal outside the board at {}", point);
            return;
        }
        if let Some(previous) = self.goal.take() {
            self.write(previous, CellState::Empty);
        }
        if self.start == Some(point) {
            self.start = None;
        }
        self.write(point, CellState::Goal);
        self.goal = Some(point);
    }

    /// Flips a cell between empty and wall. Start and goal cells are left alone.
    pub fn toggle_wall(&mut self, point: Point) {
        match self.state(&point) {
            Some(CellState::Empty) => self.write(point, CellState::Wall),
            Some(CellState::Wall) => self.write(point, CellState::Empty),
            Some(state) => debug!("Wall tool has no effect on {:?} cell {}", state, point),
            None => debug!("Ignoring wall outside the board at {}", point),
        }
    }

    /// Adds or removes a wall. Returns whether the cell changed. Start and goal
    /// cells are never walled.
    pub fn set_wall(&mut self, point: Point, blocked: bool) -> bool {
        match (self.state(&point), blocked) {
            (Some(CellState::Empty), true) => {
                self.write(point, CellState::Wall);
                true
            }
            (Some(CellState::Wall), false) => {
                self.write(point, CellState::Empty);
                true
            }
            _ => false,
        }
    }

    /// Resets every cell to empty and forgets start and goal.
    pub fn clear_all(&mut self) {
        self.cells = SimpleValueGrid::new(self.cols(), self.rows(), CellState::Empty);
        self.start = None;
        self.goal = None;
        self.generate_components();
    }

    /// Updates a position on the board. Joins newly connected components and flags the
    /// components as dirty if they are (potentially) broken apart into multiple.
    fn write(&mut self, point: Point, state: CellState) {
        let was_passable = self.cells.get_point(point).passable();
        self.cells.set_point(point, state);
        if was_passable && !state.passable() {
            self.components_dirty = true;
        } else if !was_passable && state.passable() {
            let ix = self.cells.get_ix_point(&point);
            for n in self.passable_neighbours(&point) {
                self.components.union(ix, self.cells.get_ix_point(&n));
            }
        }
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> usize {
        self.components.find(self.cells.get_ix_point(point))
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.is_passable(start) && self.is_passable(goal) {
            !self
                .components
                .equiv(self.cells.get_ix_point(start), self.cells.get_ix_point(goal))
        } else {
            true
        }
    }

    /// Number of passable cells in the component of `point`, zero for walls.
    pub fn component_size(&self, point: &Point) -> usize {
        if !self.is_passable(point) {
            return 0;
        }
        let component = self.get_component(point);
        self.points()
            .filter(|p| self.is_passable(p) && self.get_component(p) == component)
            .count()
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            debug!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up passable neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.rows() * self.cols());
        self.components_dirty = false;
        let points = self.points().filter(|p| self.is_passable(p)).collect::<Vec<_>>();
        for point in points {
            let parent_ix = self.cells.get_ix_point(&point);
            // Linking forward neighbours is enough since links are symmetric
            [
                Point::new(point.x + 1, point.y),
                Point::new(point.x - 1, point.y + 1),
                Point::new(point.x, point.y + 1),
                Point::new(point.x + 1, point.y + 1),
            ]
            .iter()
            .filter(|p| self.is_passable(p))
            .map(|p| self.cells.get_ix_point(p))
            .collect::<SmallVec<[usize; 4]>>()
            .into_iter()
            .for_each(|ix| {
                self.components.union(parent_ix, ix);
            });
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows() {
            let line = (0..self.cols())
                .map(|col| self.cells.get_point(cell(row, col)).symbol())
                .collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses one row per non-blank line using `.` for empty cells, `#` for walls,
    /// `S` for the start and `G` for the goal. Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let cols = match lines.first() {
            Some(line) => line.chars().count(),
            None => return Err(ParseBoardError::Empty),
        };
        let mut board = Board::new(lines.len(), cols);
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(ParseBoardError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let point = cell(row, col);
                match CellState::from_symbol(symbol) {
                    Some(CellState::Start) if board.start.is_some() => {
                        return Err(ParseBoardError::DuplicateStart { row, col });
                    }
                    Some(CellState::Goal) if board.goal.is_some() => {
                        return Err(ParseBoardError::DuplicateGoal { row, col });
                    }
                    Some(CellState::Start) => board.set_start(point),
                    Some(CellState::Goal) => board.set_goal(point),
                    Some(state) => board.cells.set_point(point, state),
                    None => return Err(ParseBoardError::UnknownSymbol { row, col, symbol }),
                }
            }
        }
        board.generate_components();
        Ok(board)
    }
}

use crate::board::Board;
use grid_util::grid::{SimpleValueGrid, ValueGrid};
use grid_util::point::Point;

/// Transient highlight drawn over a cell by a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Marker {
    #[default]
    None,
    Visited,
    Path,
}

/// [Markers] is the overlay of [Marker]s kept next to a [Board]. Only the
/// animation writes to it; clearing it never touches walls, start or goal.
#[derive(Clone, Debug)]
pub struct Markers {
    grid: SimpleValueGrid<Marker>,
}

impl Markers {
    pub fn new(rows: usize, cols: usize) -> Markers {
        Markers {
            grid: SimpleValueGrid::new(cols, rows, Marker::None),
        }
    }

    /// An empty overlay matching the size of `board`.
    pub fn for_board(board: &Board) -> Markers {
        Markers::new(board.rows(), board.cols())
    }

    fn in_bounds(&self, point: &Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.grid.width()
            && (point.y as usize) < self.grid.height()
    }

    pub fn get(&self, point: &Point) -> Marker {
        if self.in_bounds(point) {
            self.grid.get_point(*point)
        } else {
            Marker::None
        }
    }

    /// Marks a cell as visited. Returns [false] if it was already marked.
    pub fn mark_visited(&mut self, point: Point) -> bool {
        if self.get(&point) == Marker::None && self.in_bounds(&point) {
            self.grid.set_point(point, Marker::Visited);
            true
        } else {
            false
        }
    }

    pub fn mark_path(&mut self, point: Point) {
        if self.in_bounds(&point) {
            self.grid.set_point(point, Marker::Path);
        }
    }

    pub fn count(&self, marker: Marker) -> usize {
        let (w, h) = (self.grid.width() as i32, self.grid.height() as i32);
        (0..h)
            .flat_map(|y| (0..w).map(move |x| Point::new(x, y)))
            .filter(|p| self.grid.get_point(*p) == marker)
            .count()
    }

    pub fn is_clear(&self) -> bool {
        self.count(Marker::None) == self.grid.width() * self.grid.height()
    }

    /// Removes every highlight.
    pub fn clear(&mut self) {
        self.grid = SimpleValueGrid::new(self.grid.width(), self.grid.height(), Marker::None);
    }
}

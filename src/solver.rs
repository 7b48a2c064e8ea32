use crate::board::Board;
use crate::search_context::{SearchContext, SearchEvent};
use crate::{adjacent, N_SMALLVEC_SIZE, STEP_COST};
use grid_util::point::Point;
use itertools::Itertools;
use log::info;
use smallvec::SmallVec;

/// Search context specialised to board cells and integer move costs.
pub type GridContext = SearchContext<Point, u32>;

/// Event produced by a search over a [Board].
pub type GridEvent = SearchEvent<Point, u32>;

/// Describes how a search moves over a [Board] and how it estimates the
/// remaining distance to the goal.
pub trait GridSolver {
    /// Container type for successors; you can keep this fixed to SmallVec if you prefer.
    type Successors: IntoIterator<Item = (Point, u32)>;

    fn heuristic(&self, board: &Board, p1: &Point, p2: &Point) -> u32;

    fn successors(&self, board: &Board, node: &Point) -> Self::Successors;
}

/// Grid A* with 8-directional moves of uniform cost and the Manhattan distance
/// as heuristic. The heuristic overestimates as soon as diagonal moves are
/// useful, so found paths are valid but not necessarily of minimal length.
#[derive(Clone, Debug, Default)]
pub struct AstarSolver;

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver
    }
}

impl GridSolver for AstarSolver {
    type Successors = SmallVec<[(Point, u32); N_SMALLVEC_SIZE]>;

    fn heuristic(&self, _board: &Board, p1: &Point, p2: &Point) -> u32 {
        p1.manhattan_distance(p2) as u32
    }

    /// Passable neighbours in expansion order, each move costing [STEP_COST].
    fn successors(&self, board: &Board, node: &Point) -> Self::Successors {
        board
            .passable_neighbours(node)
            .into_iter()
            .map(|p| (p, STEP_COST))
            .collect()
    }
}

/// Starts a step-by-step search from `start` to `goal` on `board`. The board
/// stays borrowed until the returned iterator is dropped, so it cannot change
/// while the search is in flight.
pub fn search_steps<'a, S: GridSolver>(
    solver: &'a S,
    board: &'a Board,
    context: &'a mut GridContext,
    start: Point,
    goal: Point,
) -> impl Iterator<Item = GridEvent> + 'a {
    info!("Searching from {} to {}", start, goal);
    context.search(
        &start,
        move |node| solver.successors(board, node),
        move |point| solver.heuristic(board, point, &goal),
        move |point| *point == goal,
    )
}

/// Drives a search to completion and returns its final event.
pub fn solve<S: GridSolver>(
    solver: &S,
    board: &Board,
    context: &mut GridContext,
    start: Point,
    goal: Point,
) -> GridEvent {
    search_steps(solver, board, context, start, goal)
        .last()
        .unwrap_or(SearchEvent::Failed)
}

/// Checks that every cell of `route` is passable and that consecutive cells touch.
pub fn route_is_walkable(board: &Board, route: &[Point]) -> bool {
    route.iter().all(|p| board.is_passable(p))
        && route.iter().tuple_windows().all(|(a, b)| adjacent(a, b) && a != b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell;
    use crate::search_context::FoundPath;

    fn found(event: GridEvent) -> FoundPath<Point, u32> {
        match event {
            SearchEvent::PathFound(path) => path,
            other => panic!("expected a path, got {:?}", other),
        }
    }

    #[test]
    fn neighbours_follow_expansion_order() {
        let board = Board::new(3, 3);
        let successors = AstarSolver::new().successors(&board, &cell(1, 1));
        let points = successors.into_iter().map(|(p, _)| p).collect::<Vec<_>>();
        assert_eq!(
            points,
            vec![
                cell(0, 1),
                cell(2, 1),
                cell(1, 0),
                cell(1, 2),
                cell(0, 0),
                cell(0, 2),
                cell(2, 0),
                cell(2, 2),
            ]
        );
    }

    #[test]
    fn walls_and_borders_are_skipped() {
        let board: Board = "#..\n...\n...".parse().unwrap();
        let successors = AstarSolver::new().successors(&board, &cell(0, 1));
        let points = successors.into_iter().map(|(p, _)| p).collect::<Vec<_>>();
        assert_eq!(points, vec![cell(1, 1), cell(0, 2), cell(1, 0), cell(1, 2)]);
    }

    #[test]
    fn heuristic_is_manhattan() {
        let board = Board::new(5, 5);
        let solver = AstarSolver::new();
        assert_eq!(solver.heuristic(&board, &cell(0, 0), &cell(4, 4)), 8);
        assert_eq!(solver.heuristic(&board, &cell(3, 1), &cell(1, 2)), 3);
    }

    /// Asserts that the diagonal is taken on an open grid.
    #[test]
    fn solve_diagonal() {
        let board = Board::new(5, 5);
        let mut ct = GridContext::new();
        let path = found(solve(&AstarSolver, &board, &mut ct, cell(0, 0), cell(4, 4)));
        assert_eq!(path.steps(), 4);
        assert_eq!(path.cost, 4);
        assert_eq!(
            path.route,
            vec![cell(0, 0), cell(1, 1), cell(2, 2), cell(3, 3), cell(4, 4)]
        );
    }

    #[test]
    fn equal_start_goal() {
        let board = Board::new(1, 1);
        let mut ct = GridContext::new();
        let events = search_steps(&AstarSolver, &board, &mut ct, cell(0, 0), cell(0, 0))
            .collect::<Vec<_>>();
        assert_eq!(events.len(), 1);
        let path = found(events[0].clone());
        assert_eq!(path.route, vec![cell(0, 0)]);
        assert!(path.interior().is_empty());
    }

    // Diagonal moves squeeze between two walls.
    #[test]
    fn corner_cutting_is_allowed() {
        //  __
        // |S#|
        // |#G|
        //  __
        let board: Board = "S#\n#G".parse().unwrap();
        let mut ct = GridContext::new();
        let path = found(solve(&AstarSolver, &board, &mut ct, cell(0, 0), cell(1, 1)));
        assert_eq!(path.route, vec![cell(0, 0), cell(1, 1)]);
    }

    #[test]
    fn blocked_goal_fails() {
        let board: Board = "S.#.\n..##\n###G".parse().unwrap();
        let mut ct = GridContext::new();
        let events = search_steps(&AstarSolver, &board, &mut ct, cell(0, 0), cell(2, 3))
            .collect::<Vec<_>>();
        assert_eq!(events.last(), Some(&SearchEvent::Failed));
        // Every open cell but the start is visited exactly once
        assert_eq!(events.len() - 1, 3);
    }

    #[test]
    fn detour_around_wall() {
        //  _____
        // |S###G|
        // |.###.|
        // |.....|
        //  _____
        let board: Board = "S###G\n.###.\n.....".parse().unwrap();
        let mut ct = GridContext::new();
        let path = found(solve(&AstarSolver, &board, &mut ct, cell(0, 0), cell(0, 4)));
        assert_eq!(path.steps(), 6);
        assert!(route_is_walkable(&board, &path.route));
    }

    #[test]
    fn walkable_routes() {
        let board: Board = "..#\n...".parse().unwrap();
        assert!(route_is_walkable(&board, &[cell(0, 0), cell(1, 1), cell(1, 2)]));
        assert!(!route_is_walkable(&board, &[cell(0, 1), cell(0, 2)]));
        assert!(!route_is_walkable(&board, &[cell(0, 0), cell(1, 2)]));
        assert!(route_is_walkable(&board, &[]));
    }
}

use crate::animation::{Animator, Counters, Renderer, RunOutcome, Speed, Ticker};
use crate::board::{Board, Tool};
use crate::markers::Markers;
use crate::solver::{search_steps, AstarSolver, GridContext, GridSolver};
use crate::{COLS, ROWS};
use core::fmt;
use grid_util::point::Point;
use log::{info, warn};

/// User-facing alerts raised by a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    MissingEndpoints,
    NoPath,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Notice::MissingEndpoints => write!(f, "Please set Start and Goal first!"),
            Notice::NoPath => write!(f, "No path found (fully blocked by walls)."),
        }
    }
}

/// Reasons a run cannot start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("Please set Start and Goal first!")]
    MissingEndpoints,
}

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub counters: Counters,
}

/// [Visualizer] owns the board, its markers and everything needed to run and
/// animate a search on it. It is what a front end drives: tool selection,
/// click and drag painting, speed control and the run and clear buttons.
#[derive(Clone, Debug)]
pub struct Visualizer<S = AstarSolver> {
    board: Board,
    markers: Markers,
    tool: Tool,
    dragging: bool,
    animator: Animator,
    context: GridContext,
    solver: S,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer::new()
    }
}

impl Visualizer {
    /// A [ROWS] by [COLS] board with no walls, start or goal.
    pub fn new() -> Visualizer {
        Visualizer::with_size(ROWS, COLS)
    }

    pub fn with_size(rows: usize, cols: usize) -> Visualizer {
        Visualizer::from_board(Board::new(rows, cols))
    }

    pub fn from_board(board: Board) -> Visualizer {
        Visualizer::with_solver(board, AstarSolver::new())
    }
}

impl<S: GridSolver> Visualizer<S> {
    pub fn with_solver(board: Board, solver: S) -> Visualizer<S> {
        Visualizer {
            markers: Markers::for_board(&board),
            board,
            tool: Tool::default(),
            dragging: false,
            animator: Animator::default(),
            context: GridContext::new(),
            solver,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn counters(&self) -> Counters {
        self.animator.counters()
    }

    pub fn mode(&self) -> Tool {
        self.tool
    }

    /// Selects the tool applied by subsequent clicks and drags.
    pub fn set_mode(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn speed(&self) -> Speed {
        self.animator.speed
    }

    /// Sets the delay between visitations, clamped to the accepted range.
    pub fn set_speed(&mut self, delay_ms: u32) -> Speed {
        self.animator.speed = Speed::new(delay_ms);
        self.animator.speed
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Pointer pressed on `point`: applies the current tool and starts a drag.
    pub fn press(&mut self, point: Point) {
        self.dragging = true;
        self.apply_tool_at(point);
    }

    /// Pointer entered `point`; paints if a drag is in progress.
    pub fn enter(&mut self, point: Point) {
        if self.dragging {
            self.paint_drag(point);
        }
    }

    /// Pointer released anywhere.
    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Applies a single click of the current tool.
    pub fn apply_tool_at(&mut self, point: Point) {
        self.board.apply_tool(self.tool, point);
    }

    /// Drag painting: walls are added (never toggled) and erased, start and goal
    /// are only placed by clicks.
    pub fn paint_drag(&mut self, point: Point) {
        match self.tool {
            Tool::Wall => {
                self.board.set_wall(point, true);
            }
            Tool::Erase => {
                self.board.set_wall(point, false);
            }
            Tool::Start | Tool::Goal => {}
        }
    }

    /// Removes visited and path markers and resets the counters.
    pub fn clear_path(&mut self) {
        self.markers.clear();
        self.animator.reset_counters();
    }

    /// Resets the whole board, start and goal included.
    pub fn clear_all(&mut self) {
        self.board.clear_all();
        self.clear_path();
    }

    /// Runs and animates one search from the start to the goal. Without both of them
    /// set nothing changes and [RunError::MissingEndpoints] is returned.
    pub fn run<T, R>(&mut self, ticker: &mut T, renderer: &mut R) -> Result<RunReport, RunError>
    where
        T: Ticker + ?Sized,
        R: Renderer + ?Sized,
    {
        let (start, goal) = match (self.board.start(), self.board.goal()) {
            (Some(start), Some(goal)) => (start, goal),
            _ => {
                warn!("Run requested without start and goal");
                renderer.notify(Notice::MissingEndpoints);
                return Err(RunError::MissingEndpoints);
            }
        };
        self.clear_path();
        self.board.update();
        if self.board.reachable(&start, &goal) {
            info!("{} is reachable from {}, computing path", goal, start);
        } else {
            info!(
                "{} is not reachable from {}, the search will explore {} cells",
                goal,
                start,
                self.board.component_size(&start).saturating_sub(1)
            );
        }
        let events = search_steps(&self.solver, &self.board, &mut self.context, start, goal);
        let outcome = self
            .animator
            .play(events, &self.board, &mut self.markers, ticker, renderer);
        Ok(RunReport {
            outcome,
            counters: self.animator.counters(),
        })
    }
}

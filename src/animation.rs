use crate::board::Board;
use crate::markers::Markers;
use crate::search_context::{FoundPath, SearchEvent};
use crate::visualizer::Notice;
use crate::{DEFAULT_DELAY_MS, MAX_DELAY_MS, MIN_DELAY_MS};
use core::fmt;
use grid_util::point::Point;
use log::info;
use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

/// Delay between two visitations, always within [MIN_DELAY_MS]..=[MAX_DELAY_MS].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u32);

impl Speed {
    /// Clamps `delay_ms` into the accepted range.
    pub fn new(delay_ms: u32) -> Speed {
        Speed(delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS))
    }

    pub fn delay_ms(self) -> u32 {
        self.0
    }

    pub fn delay(self) -> Duration {
        Duration::from_millis(self.0 as u64)
    }

    /// Text shown next to the speed control, e.g. `15 ms`.
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed(DEFAULT_DELAY_MS)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ms", self.0)
    }
}

/// Live counters shown while a run progresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    /// Distinct cells marked visited, start and goal excluded.
    pub explored: usize,
    /// Moves along the found path.
    pub path_length: usize,
}

/// How the outcome of a completed run is reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Found(FoundPath<Point, u32>),
    /// The frontier ran empty; the goal is walled off.
    NoPath,
    /// The [Ticker] stopped the run before it finished.
    Cancelled,
}

impl RunOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, RunOutcome::Found(_))
    }
}

/// Paces a run. Called once after every visitation.
pub trait Ticker {
    /// Waits for `delay`. Returning [ControlFlow::Break] cancels the run.
    fn tick(&mut self, delay: Duration) -> ControlFlow<()>;
}

/// Sleeps the current thread for every tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadTicker;

impl Ticker for ThreadTicker {
    fn tick(&mut self, delay: Duration) -> ControlFlow<()> {
        thread::sleep(delay);
        ControlFlow::Continue(())
    }
}

/// Never waits. Useful when only the outcome matters.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unpaced;

impl Ticker for Unpaced {
    fn tick(&mut self, _delay: Duration) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl<F> Ticker for F
where
    F: FnMut(Duration) -> ControlFlow<()>,
{
    fn tick(&mut self, delay: Duration) -> ControlFlow<()> {
        (*self)(delay)
    }
}

/// Presents the board. All drawing happens through this trait so that the
/// search never touches the presentation.
pub trait Renderer {
    /// Called after every visible change.
    fn draw(&mut self, board: &Board, markers: &Markers, counters: Counters);

    /// Called for user-facing alerts.
    fn notify(&mut self, notice: Notice) {
        info!("{}", notice);
    }
}

/// Draws nothing.
impl Renderer for () {
    fn draw(&mut self, _board: &Board, _markers: &Markers, _counters: Counters) {}
}

/// [Animator] turns search events into marker updates, one tick per visitation.
#[derive(Clone, Debug, Default)]
pub struct Animator {
    pub speed: Speed,
    counters: Counters,
}

impl Animator {
    pub fn new(speed: Speed) -> Animator {
        Animator {
            speed,
            counters: Counters::default(),
        }
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn reset_counters(&mut self) {
        self.counters = Counters::default();
    }

    /// Plays `events` onto `markers`. Visited cells are marked and counted once each,
    /// followed by a tick; a found path marks the cells between start and goal and
    /// sets the path length to its number of moves.
    pub fn play<I, T, R>(
        &mut self,
        events: I,
        board: &Board,
        markers: &mut Markers,
        ticker: &mut T,
        renderer: &mut R,
    ) -> RunOutcome
    where
        I: IntoIterator<Item = SearchEvent<Point, u32>>,
        T: Ticker + ?Sized,
        R: Renderer + ?Sized,
    {
        self.reset_counters();
        renderer.draw(board, markers, self.counters);
        for event in events {
            match event {
                SearchEvent::Visited(point) => {
                    if markers.mark_visited(point) {
                        self.counters.explored += 1;
                    }
                    renderer.draw(board, markers, self.counters);
                    if ticker.tick(self.speed.delay()).is_break() {
                        info!("Run cancelled after {} visited cells", self.counters.explored);
                        return RunOutcome::Cancelled;
                    }
                }
                SearchEvent::PathFound(path) => {
                    for point in path.interior() {
                        markers.mark_path(*point);
                    }
                    self.counters.path_length = path.steps();
                    renderer.draw(board, markers, self.counters);
                    info!(
                        "Path of length {} found after exploring {} cells",
                        self.counters.path_length, self.counters.explored
                    );
                    return RunOutcome::Found(path);
                }
                SearchEvent::Failed => break,
            }
        }
        renderer.notify(Notice::NoPath);
        RunOutcome::NoPath
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell;
    use crate::markers::Marker;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Counters>,
        notices: Vec<Notice>,
    }

    impl Renderer for Recorder {
        fn draw(&mut self, _board: &Board, _markers: &Markers, counters: Counters) {
            self.frames.push(counters);
        }

        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
    }

    #[test]
    fn speed_is_clamped() {
        assert_eq!(Speed::default().delay_ms(), 15);
        assert_eq!(Speed::new(0).delay_ms(), MIN_DELAY_MS);
        assert_eq!(Speed::new(10_000).delay_ms(), MAX_DELAY_MS);
        assert_eq!(Speed::new(40).delay(), Duration::from_millis(40));
        assert_eq!(Speed::new(15).label(), "15 ms");
    }

    #[test]
    fn plays_visits_and_path() {
        let board = Board::new(1, 4);
        let mut markers = Markers::for_board(&board);
        let mut animator = Animator::default();
        let mut ticks = Vec::new();
        let mut ticker = |delay: Duration| -> ControlFlow<()> {
            ticks.push(delay);
            ControlFlow::Continue(())
        };
        let mut recorder = Recorder::default();
        let route = vec![cell(0, 0), cell(0, 1), cell(0, 2), cell(0, 3)];
        let events = vec![
            SearchEvent::Visited(cell(0, 1)),
            SearchEvent::Visited(cell(0, 2)),
            SearchEvent::Visited(cell(0, 1)),
            SearchEvent::PathFound(FoundPath {
                route: route.clone(),
                cost: 3,
            }),
        ];
        let outcome = animator.play(events, &board, &mut markers, &mut ticker, &mut recorder);
        assert_eq!(ticks.len(), 3);
        assert_eq!(ticks[0], Duration::from_millis(15));
        assert!(outcome.is_found());
        assert_eq!(
            animator.counters(),
            Counters {
                explored: 2,
                path_length: 3
            }
        );
        assert_eq!(recorder.frames.len(), 5);
        assert_eq!(markers.get(&cell(0, 1)), Marker::Path);
        assert_eq!(markers.get(&cell(0, 0)), Marker::None);
        assert_eq!(markers.get(&cell(0, 3)), Marker::None);
        assert!(recorder.notices.is_empty());
    }

    #[test]
    fn failure_notifies() {
        let board = Board::new(2, 2);
        let mut markers = Markers::for_board(&board);
        let mut animator = Animator::new(Speed::new(1));
        let mut recorder = Recorder::default();
        let events = vec![SearchEvent::Visited(cell(1, 1)), SearchEvent::Failed];
        let outcome = animator.play(events, &board, &mut markers, &mut Unpaced, &mut recorder);
        assert_eq!(outcome, RunOutcome::NoPath);
        assert_eq!(recorder.notices, vec![Notice::NoPath]);
        assert_eq!(animator.counters().explored, 1);
        assert_eq!(animator.counters().path_length, 0);
    }

    #[test]
    fn ticker_can_cancel() {
        let board = Board::new(2, 2);
        let mut markers = Markers::for_board(&board);
        let mut animator = Animator::default();
        let mut ticker = |_delay: Duration| -> ControlFlow<()> { ControlFlow::Break(()) };
        let events = vec![
            SearchEvent::Visited(cell(0, 1)),
            SearchEvent::Visited(cell(1, 1)),
            SearchEvent::Failed,
        ];
        let outcome = animator.play(events, &board, &mut markers, &mut ticker, &mut ());
        assert_eq!(outcome, RunOutcome::Cancelled);
        assert_eq!(animator.counters().explored, 1);
        assert_eq!(markers.get(&cell(1, 1)), Marker::None);
    }
}

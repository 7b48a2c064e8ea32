/// This module implements an incremental best-first search in the spirit of
/// [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html).
/// Instead of running to completion the search is an [Iterator] that yields one
/// [SearchEvent] per visited node, so that a caller can observe (and pace) its progress.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::{IndexMap, IndexSet};
use log::warn;
use num_traits::Zero;
use std::hash::Hash;
use std::ops::Add;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// The start node is always the first entry of the score map.
const START_INDEX: usize = 0;

#[derive(Clone, Copy, Debug)]
struct Scores<C> {
    parent: usize,
    cost: C,
    estimated_cost: C,
}

/// A route from start to goal, both included, together with its total cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundPath<N, C> {
    pub route: Vec<N>,
    pub cost: C,
}

impl<N, C> FoundPath<N, C> {
    /// The cells strictly between start and goal, in start to goal order.
    pub fn interior(&self) -> &[N] {
        if self.route.len() <= 2 {
            &[]
        } else {
            &self.route[1..self.route.len() - 1]
        }
    }

    /// Number of moves along the route.
    pub fn steps(&self) -> usize {
        self.route.len().saturating_sub(1)
    }
}

/// An observable step of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent<N, C> {
    /// A node was taken from the frontier. Its neighbours are expanded on the next step.
    Visited(N),
    /// The goal was taken from the frontier. Always the last event.
    PathFound(FoundPath<N, C>),
    /// The frontier ran empty before reaching the goal. Always the last event.
    Failed,
}

/// [SearchContext] owns the per-run bookkeeping: the best known cost of every
/// node seen so far together with its estimate and back-pointer, and the
/// frontier of candidates. It is reset by every call to
/// [search](SearchContext::search), so one context can serve many runs.
#[derive(Clone, Debug)]
pub struct SearchContext<N, C> {
    scores: FxIndexMap<N, Scores<C>>,
    frontier: FxIndexSet<usize>,
}

impl<N, C> Default for SearchContext<N, C> {
    fn default() -> Self {
        SearchContext {
            scores: FxIndexMap::default(),
            frontier: FxIndexSet::default(),
        }
    }
}

impl<N, C> SearchContext<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy + Add<Output = C>,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct nodes that received a cost during the last run.
    pub fn seen(&self) -> usize {
        self.scores.len()
    }

    /// Number of candidates left in the frontier.
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Best known cost to reach `node` in the current run, [None] standing in
    /// for infinity.
    pub fn cost_of(&self, node: &N) -> Option<C> {
        self.scores.get(node).map(|s| s.cost)
    }

    /// Starts a new search from `start`. Nothing is computed until the returned
    /// iterator is advanced.
    pub fn search<FN, IN, FH, FS>(
        &mut self,
        start: &N,
        successors: FN,
        mut heuristic: FH,
        success: FS,
    ) -> StepSearch<'_, N, C, FN, FH, FS>
    where
        FN: FnMut(&N) -> IN,
        IN: IntoIterator<Item = (N, C)>,
        FH: FnMut(&N) -> C,
        FS: FnMut(&N) -> bool,
    {
        self.scores.clear();
        self.frontier.clear();
        let estimated_cost = heuristic(start);
        self.scores.insert(
            start.clone(),
            Scores {
                parent: usize::MAX,
                cost: Zero::zero(),
                estimated_cost,
            },
        );
        self.frontier.insert(START_INDEX);
        StepSearch {
            context: self,
            successors,
            heuristic,
            success,
            pending: None,
            finished: false,
        }
    }

    /// Takes the frontier member with the smallest estimate. The frontier is kept
    /// sorted by a stable sort, so among equal estimates the one that has been in
    /// the sorted order longest wins and newly added members come last.
    fn pop_best(&mut self) -> Option<usize> {
        let scores = &self.scores;
        self.frontier.sort_by(|&a, &b| {
            let fa = scores.get_index(a).map(|(_, s)| s.estimated_cost);
            let fb = scores.get_index(b).map(|(_, s)| s.estimated_cost);
            fa.cmp(&fb)
        });
        self.frontier.shift_remove_index(0)
    }

    fn reverse_path(&self, start: usize) -> Vec<N> {
        let mut path: Vec<N> = std::iter::successors(self.scores.get_index(start), |(_, value)| {
            self.scores.get_index(value.parent)
        })
        .map(|(node, _)| node.clone())
        .collect();
        path.reverse();
        path
    }
}

/// Iterator returned by [SearchContext::search]. Each call to `next` takes one
/// node from the frontier. The start node is expanded silently; every other
/// node is reported as [SearchEvent::Visited] before it is expanded. The
/// iterator is finite and ends after [SearchEvent::PathFound] or
/// [SearchEvent::Failed].
pub struct StepSearch<'a, N, C, FN, FH, FS> {
    context: &'a mut SearchContext<N, C>,
    successors: FN,
    heuristic: FH,
    success: FS,
    pending: Option<usize>,
    finished: bool,
}

impl<'a, N, C, FN, IN, FH, FS> StepSearch<'a, N, C, FN, FH, FS>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy + Add<Output = C>,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    /// Relaxes all successors of the node at `index`. A successor whose cost
    /// improves is (re-)added to the frontier unless it is still in it.
    fn expand(&mut self, index: usize) {
        let (node, cost) = match self.context.scores.get_index(index) {
            Some((node, scores)) => (node.clone(), scores.cost),
            None => return,
        };
        for (successor, move_cost) in (self.successors)(&node) {
            let new_cost = cost + move_cost;
            let h; // heuristic(&successor)
            let n; // index for successor
            match self.context.scores.entry(successor) {
                Vacant(e) => {
                    h = (self.heuristic)(e.key());
                    n = e.index();
                    e.insert(Scores {
                        parent: index,
                        cost: new_cost,
                        estimated_cost: new_cost + h,
                    });
                }
                Occupied(mut e) => {
                    if e.get().cost > new_cost {
                        h = (self.heuristic)(e.key());
                        n = e.index();
                        e.insert(Scores {
                            parent: index,
                            cost: new_cost,
                            estimated_cost: new_cost + h,
                        });
                    } else {
                        continue;
                    }
                }
            }
            self.context.frontier.insert(n);
        }
    }
}

impl<'a, N, C, FN, IN, FH, FS> Iterator for StepSearch<'a, N, C, FN, FH, FS>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy + Add<Output = C>,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    type Item = SearchEvent<N, C>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if let Some(index) = self.pending.take() {
            self.expand(index);
        }
        while let Some(index) = self.context.pop_best() {
            let (node, cost) = match self.context.scores.get_index(index) {
                Some((node, scores)) => (node.clone(), scores.cost),
                None => continue,
            };
            if (self.success)(&node) {
                self.finished = true;
                let route = self.context.reverse_path(index);
                return Some(SearchEvent::PathFound(FoundPath { route, cost }));
            }
            if index == START_INDEX {
                self.expand(index);
                continue;
            }
            self.pending = Some(index);
            return Some(SearchEvent::Visited(node));
        }
        self.finished = true;
        warn!("Frontier exhausted without reaching the goal");
        Some(SearchEvent::Failed)
    }
}

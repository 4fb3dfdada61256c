//! Search strategies and the entry point that dispatches to them.
//!
//! `Solver::solve` first rejects pairs the parity test proves unreachable, then
//! runs the selected strategy under the limits from `SolverConfig`. Every run
//! owns its own node arena, frontier and closed set, so one `Solver` can be
//! shared by any number of threads.

mod best_first;
mod bidirectional;
mod ida;

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{SearchLimits, SolverConfig};
use crate::engine::{Board, Direction};
use crate::error::SolveError;
use crate::solvability::is_solvable;

/// Index of a node inside the arena of one search run.
pub type NodeId = usize;

/// The interchangeable search strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// IDA*: the only strategy guaranteed to return a shortest path.
    #[default]
    IterativeDeepening,
    /// Best-first on the heuristic alone.
    Greedy,
    /// A* with the heuristic inflated by a depth-dependent weight.
    WeightedAStar,
    /// A* from both ends at once, joined where the two searches meet.
    Bidirectional,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::IterativeDeepening,
        Strategy::Greedy,
        Strategy::WeightedAStar,
        Strategy::Bidirectional,
    ];

    /// Display name reported in `SolverResult::algorithm_name`.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::IterativeDeepening => "IDA*",
            Strategy::Greedy => "Greedy-Best",
            Strategy::WeightedAStar => "A*",
            Strategy::Bidirectional => "Bidirectional A*",
        }
    }

    /// Identifier accepted by `FromStr` and used in configuration files.
    pub fn id(self) -> &'static str {
        match self {
            Strategy::IterativeDeepening => "iterative_deepening",
            Strategy::Greedy => "greedy",
            Strategy::WeightedAStar => "weighted_a_star",
            Strategy::Bidirectional => "bidirectional",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}' (expected one of: iterative_deepening, greedy, weighted_a_star, bidirectional)")]
pub struct ParseStrategyError(String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "iterative_deepening" | "ida" | "ida*" => Ok(Strategy::IterativeDeepening),
            "greedy" | "greedy_best" => Ok(Strategy::Greedy),
            "weighted_a_star" | "a*" | "astar" | "weighted" => Ok(Strategy::WeightedAStar),
            "bidirectional" | "bidi" => Ok(Strategy::Bidirectional),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// A node of a search tree.
///
/// `parent` is an index into the arena of the run that produced the node. In
/// a `SolverResult` path it is rewritten to the index of the previous step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchNode {
    pub board: Board,
    pub blank_index: usize,
    /// The way the blank moved to get here from `parent`.
    pub direction: Direction,
    pub parent: Option<NodeId>,
    /// Moves taken from the root.
    pub g: u32,
    /// Heuristic estimate of the moves still needed.
    pub h: u32,
}

impl SearchNode {
    /// A root node with no parent.
    pub fn root(board: Board, h: u32) -> Self {
        SearchNode {
            board,
            blank_index: board.blank_index(),
            direction: Direction::Start,
            parent: None,
            g: 0,
            h,
        }
    }

    pub fn f(&self) -> u32 {
        self.g + self.h
    }

    /// The children reachable in one move, in `UP, DOWN, LEFT, RIGHT` order.
    ///
    /// Each child has `g + 1`, `parent = Some(id)` and `h = 0`; the caller
    /// fills in `h` against whichever goal it searches toward.
    ///
    /// # Examples
    /// ```
    /// use fifteen_solver::engine::{Board, Direction};
    /// use fifteen_solver::solver::SearchNode;
    ///
    /// let root = SearchNode::root(Board::solved(), 0);
    /// let children: Vec<_> = root.neighbors(0).collect();
    /// assert_eq!(children.len(), 2);
    /// assert_eq!(children[0].direction, Direction::Up);
    /// assert_eq!(children[1].direction, Direction::Left);
    /// ```
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = SearchNode> {
        let node = *self;
        Direction::MOVES.into_iter().filter_map(move |direction| {
            let board = node.board.apply(direction)?;
            Some(SearchNode {
                board,
                blank_index: board.blank_index(),
                direction,
                parent: Some(id),
                g: node.g + 1,
                h: 0,
            })
        })
    }
}

/// A path from the start board to the goal, with search statistics.
#[derive(Clone, Debug)]
pub struct SolverResult {
    /// Start to goal inclusive. `path[i].g == i` and `path[i].parent == Some(i - 1)`.
    pub path: Vec<SearchNode>,
    /// Number of moves, `path.len() - 1`.
    pub steps: usize,
    pub nodes_explored: usize,
    pub strategy: Strategy,
    pub algorithm_name: &'static str,
    pub time_taken: Duration,
}

impl SolverResult {
    /// The blank moves to play, in order.
    pub fn moves(&self) -> impl Iterator<Item = Direction> + '_ {
        self.path
            .iter()
            .map(|node| node.direction)
            .filter(|&direction| direction != Direction::Start)
    }

    /// The first move to play, if the start is not already the goal.
    pub fn next_move(&self) -> Option<Direction> {
        self.moves().next()
    }

    pub fn boards(&self) -> impl Iterator<Item = &Board> + '_ {
        self.path.iter().map(|node| &node.board)
    }

    pub fn final_board(&self) -> Option<&Board> {
        self.path.last().map(|node| &node.board)
    }
}

/// Why a strategy stopped without a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Halt {
    /// Frontier empty, threshold unbounded, or expansion cap reached.
    Exhausted,
    TimedOut,
}

/// What a strategy hands back to `Solver::solve`.
pub(crate) struct SearchReport {
    pub(crate) outcome: Result<Vec<SearchNode>, Halt>,
    pub(crate) nodes_explored: usize,
}

impl SearchReport {
    pub(crate) fn solved(path: Vec<SearchNode>, nodes_explored: usize) -> Self {
        SearchReport {
            outcome: Ok(path),
            nodes_explored,
        }
    }

    pub(crate) fn halted(halt: Halt, nodes_explored: usize) -> Self {
        SearchReport {
            outcome: Err(halt),
            nodes_explored,
        }
    }
}

/// Wall-clock budget of one run: the earlier of the strategy's time limit and
/// the host's deadline.
pub(crate) struct Clock {
    started: Instant,
    deadline: Option<Instant>,
}

impl Clock {
    fn new(time_limit: Option<Duration>, host_deadline: Option<Instant>) -> Self {
        let started = Instant::now();
        let own_deadline = time_limit.and_then(|limit| started.checked_add(limit));
        let deadline = match (own_deadline, host_deadline) {
            (Some(own), Some(host)) => Some(own.min(host)),
            (own, host) => own.or(host),
        };
        Clock { started, deadline }
    }

    pub(crate) fn expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Walks parent links from `id` back to the root and returns the chain root first.
pub(crate) fn chain(arena: &[SearchNode], id: NodeId) -> Vec<SearchNode> {
    let mut path = Vec::new();
    let mut cursor = Some(id);
    while let Some(current) = cursor {
        let node = arena[current];
        path.push(node);
        cursor = node.parent;
    }
    path.reverse();
    path
}

/// Rewrites `g` and `parent` so they refer to positions within `path`.
pub(crate) fn renumber(path: &mut [SearchNode]) {
    for (i, node) in path.iter_mut().enumerate() {
        node.g = i as u32;
        node.parent = i.checked_sub(1);
    }
}

/// Runs search strategies under a fixed configuration.
///
/// # Examples
/// ```
/// use fifteen_solver::config::SolverConfig;
/// use fifteen_solver::engine::Board;
/// use fifteen_solver::solver::{Solver, Strategy};
///
/// let goal = Board::solved();
/// let start = Board::new([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0, 15]).unwrap();
///
/// let solver = Solver::new(SolverConfig::default());
/// let result = solver.solve(&start, &goal, Strategy::IterativeDeepening).unwrap();
/// assert_eq!(result.steps, 1);
/// assert_eq!(result.final_board(), Some(&goal));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
    deadline: Option<Instant>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Solver {
            config,
            deadline: None,
        }
    }

    /// Makes every run stop at `deadline`, even if its own time limit is later.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves with the configured default strategy.
    pub fn solve_default(&self, start: &Board, goal: &Board) -> Result<SolverResult, SolveError> {
        self.solve(start, goal, self.config.default_strategy)
    }

    /// Searches for a sequence of blank moves turning `start` into `goal`.
    ///
    /// # Returns
    /// * `Ok(SolverResult)` with the path found.
    /// * `Err(SolveError::Unsolvable)` without any search when the parity test fails.
    /// * `Err(SolveError::Exhausted)` or `Err(SolveError::TimedOut)` when the
    ///   strategy hit its limits first.
    pub fn solve(
        &self,
        start: &Board,
        goal: &Board,
        strategy: Strategy,
    ) -> Result<SolverResult, SolveError> {
        if !is_solvable(start, goal) {
            debug!(%strategy, "rejected by parity check");
            return Err(SolveError::Unsolvable);
        }

        let limits: SearchLimits = self.config.limits(strategy);
        let clock = Clock::new(limits.time_limit, self.deadline);
        let report = match strategy {
            Strategy::IterativeDeepening => ida::search(start, goal, &limits, &clock),
            Strategy::Greedy => {
                best_first::search(start, goal, best_first::Priority::Greedy, &limits, &clock)
            }
            Strategy::WeightedAStar => best_first::search(
                start,
                goal,
                best_first::Priority::Weighted(&self.config.weighted_a_star),
                &limits,
                &clock,
            ),
            Strategy::Bidirectional => bidirectional::search(start, goal, &limits, &clock),
        };

        let time_taken = clock.elapsed();
        let nodes_explored = report.nodes_explored;
        match report.outcome {
            Ok(path) => {
                let steps = path.len().saturating_sub(1);
                info!(%strategy, steps, nodes_explored, ?time_taken, "solution found");
                Ok(SolverResult {
                    path,
                    steps,
                    nodes_explored,
                    strategy,
                    algorithm_name: strategy.name(),
                    time_taken,
                })
            }
            Err(Halt::Exhausted) => {
                warn!(%strategy, nodes_explored, ?time_taken, "search exhausted");
                Err(SolveError::Exhausted {
                    strategy,
                    nodes_explored,
                })
            }
            Err(Halt::TimedOut) => {
                warn!(%strategy, nodes_explored, ?time_taken, "search timed out");
                Err(SolveError::TimedOut {
                    strategy,
                    nodes_explored,
                    elapsed: time_taken,
                })
            }
        }
    }
}

/// Solves with the default configuration.
///
/// # Examples
/// ```
/// use fifteen_solver::engine::Board;
/// use fifteen_solver::error::SolveError;
/// use fifteen_solver::solver::{solve, Strategy};
///
/// let goal = Board::solved();
/// let swapped = Board::new([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 14, 0]).unwrap();
/// assert_eq!(solve(&swapped, Strategy::Greedy, &goal).unwrap_err(), SolveError::Unsolvable);
/// ```
pub fn solve(start: &Board, strategy: Strategy, goal: &Board) -> Result<SolverResult, SolveError> {
    Solver::default().solve(start, goal, strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BLANK, TILE_COUNT};
    use std::collections::HashSet;

    fn board(tiles: [u8; TILE_COUNT]) -> Board {
        Board::new(tiles).unwrap()
    }

    fn assert_valid_path(result: &SolverResult, start: &Board, goal: &Board) {
        assert_eq!(result.path.first().map(|node| node.board), Some(*start));
        assert_eq!(result.final_board(), Some(goal));
        assert_eq!(result.steps, result.path.len() - 1);
        assert_eq!(result.path[0].direction, Direction::Start);
        assert_eq!(result.path[0].parent, None);

        for (i, pair) in result.path.windows(2).enumerate() {
            let (previous, node) = (pair[0], pair[1]);
            assert_eq!(
                previous.board.apply(node.direction),
                Some(node.board),
                "step {} of {} is not the recorded {} move",
                i + 1,
                result.algorithm_name,
                node.direction
            );
            assert_eq!(node.blank_index, node.board.blank_index());
            assert_eq!(node.g as usize, i + 1);
            assert_eq!(node.parent, Some(i));
        }

        let mut replay = *start;
        for direction in result.moves() {
            replay = replay.apply(direction).unwrap();
        }
        assert_eq!(replay, *goal);
    }

    #[test]
    fn test_neighbors_generation_order() {
        let centre = board([1, 2, 3, 4, 5, 0, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
        let root = SearchNode::root(centre, 7);
        let children: Vec<SearchNode> = root.neighbors(3).collect();
        let directions: Vec<Direction> = children.iter().map(|child| child.direction).collect();
        assert_eq!(
            directions,
            vec![Direction::Up, Direction::Down, Direction::Left, Direction::Right]
        );
        for child in &children {
            assert_eq!(child.g, 1);
            assert_eq!(child.h, 0);
            assert_eq!(child.parent, Some(3));
            assert_eq!(child.board.apply(child.direction.opposite()), Some(centre));
        }
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("ida".parse(), Ok(Strategy::IterativeDeepening));
        assert_eq!("Iterative-Deepening".parse(), Ok(Strategy::IterativeDeepening));
        assert_eq!("greedy-best".parse(), Ok(Strategy::Greedy));
        assert_eq!("A*".parse(), Ok(Strategy::WeightedAStar));
        assert_eq!("bidirectional".parse(), Ok(Strategy::Bidirectional));
        assert!("dfs".parse::<Strategy>().is_err());
        for strategy in Strategy::ALL {
            assert_eq!(strategy.id().parse(), Ok(strategy));
        }
    }

    #[test]
    fn test_goal_start_has_zero_steps() {
        let goal = Board::solved();
        for strategy in Strategy::ALL {
            let result = solve(&goal, strategy, &goal).unwrap();
            assert_eq!(result.steps, 0, "{strategy}");
            assert_eq!(result.path.len(), 1);
            assert_eq!(result.next_move(), None);
        }
    }

    #[test]
    fn test_unsolvable_short_circuits() {
        let goal = Board::solved();
        let last_pair = board([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 14, 0]);
        // A lone transposition with the blank at home is an odd permutation, so
        // this pair is unreachable too.
        let first_pair = board([2, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 0]);
        for start in [last_pair, first_pair] {
            for strategy in Strategy::ALL {
                assert_eq!(solve(&start, strategy, &goal).unwrap_err(), SolveError::Unsolvable);
            }
        }
    }

    #[test]
    fn test_single_move() {
        let goal = Board::solved();
        let start = board([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0, 15]);
        for strategy in Strategy::ALL {
            let result = solve(&start, strategy, &goal).unwrap();
            assert_eq!(result.steps, 1, "{strategy}");
            assert_eq!(result.next_move(), Some(Direction::Right));
            assert_eq!(result.strategy, strategy);
            assert_eq!(result.algorithm_name, strategy.name());
            assert_valid_path(&result, &start, &goal);
        }
    }

    #[test]
    fn test_paths_are_valid_for_every_strategy() {
        let goal = Board::solved();
        for seed in 0..6 {
            let walk = 24;
            let start = Board::new_shuffled_with_seed(&goal, walk, seed);
            for strategy in Strategy::ALL {
                let result = solve(&start, strategy, &goal).unwrap();
                assert_valid_path(&result, &start, &goal);
                // Every move flips the colour of the blank's cell, so all paths
                // between two boards share a parity.
                assert_eq!(result.steps % 2, walk % 2, "{strategy} seed {seed}");
            }
        }
    }

    /// Exact distance by breadth-first search, for short walks only.
    fn shortest_distance(start: &Board, goal: &Board) -> usize {
        let mut seen = HashSet::from([start.key()]);
        let mut layer = vec![*start];
        let mut depth = 0;
        while !layer.contains(goal) {
            layer = layer
                .iter()
                .flat_map(|board| Direction::MOVES.into_iter().filter_map(move |d| board.apply(d)))
                .filter(|board| seen.insert(board.key()))
                .collect();
            depth += 1;
        }
        depth
    }

    #[test]
    fn test_iterative_deepening_is_shortest() {
        let goal = Board::solved();
        for seed in 10..18 {
            let start = Board::new_shuffled_with_seed(&goal, 12, seed);
            let shortest = shortest_distance(&start, &goal);
            let optimal = solve(&start, Strategy::IterativeDeepening, &goal).unwrap();
            assert_eq!(optimal.steps, shortest, "seed {seed}");
            for strategy in [Strategy::Greedy, Strategy::WeightedAStar, Strategy::Bidirectional] {
                let other = solve(&start, strategy, &goal).unwrap();
                assert!(other.steps >= shortest, "seed {seed}: {strategy}");
            }
        }
    }

    #[test]
    fn test_arbitrary_goal() {
        let inverted = board([15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 1, 2, 0]);
        let start = Board::new_shuffled_with_seed(&inverted, 24, 4);
        for strategy in Strategy::ALL {
            let result = solve(&start, strategy, &inverted).unwrap();
            assert_valid_path(&result, &start, &inverted);
        }

        // Exchanging two numbered tiles breaks parity relative to this goal.
        let (a, b) = if start.tile(0) != BLANK && start.tile(1) != BLANK {
            (0, 1)
        } else {
            (2, 3)
        };
        assert_eq!(
            solve(&start.swap(a, b), Strategy::IterativeDeepening, &inverted).unwrap_err(),
            SolveError::Unsolvable
        );
    }

    #[test]
    fn test_results_are_deterministic() {
        let goal = Board::solved();
        let start = Board::new_shuffled_with_seed(&goal, 30, 21);
        for strategy in Strategy::ALL {
            let first = solve(&start, strategy, &goal).unwrap();
            let second = solve(&start, strategy, &goal).unwrap();
            assert_eq!(first.path, second.path, "{strategy}");
            assert_eq!(first.nodes_explored, second.nodes_explored);
        }
    }

    #[test]
    fn test_host_deadline_is_timeout_not_unsolvable() {
        let goal = Board::solved();
        let start = Board::new_shuffled_with_seed(&goal, 60, 8);
        assert_ne!(start, goal);
        let solver = Solver::new(SolverConfig::default()).with_deadline(Instant::now());
        for strategy in Strategy::ALL {
            let error = solver.solve(&start, &goal, strategy).unwrap_err();
            assert!(matches!(error, SolveError::TimedOut { .. }), "{strategy}: {error}");
            assert!(error.is_retryable());
        }
    }

    #[test]
    fn test_expansion_cap_is_exhausted() {
        let goal = Board::solved();
        let start = Board::new_shuffled_with_seed(&goal, 60, 8);
        assert_ne!(start, goal);
        let mut config = SolverConfig::default();
        config.greedy.max_expansions = Some(1);
        config.weighted_a_star.max_expansions = Some(1);
        config.bidirectional.max_expansions = Some(1);
        config.iterative_deepening.max_expansions = Some(1);
        let solver = Solver::new(config);
        for strategy in Strategy::ALL {
            match solver.solve(&start, &goal, strategy) {
                Err(SolveError::Exhausted {
                    strategy: reported,
                    ..
                }) => assert_eq!(reported, strategy),
                other => panic!("{strategy}: expected exhaustion, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_concurrent_solves_share_one_solver() {
        let goal = Board::solved();
        let solver = Solver::default();
        let starts: Vec<Board> = (0..4)
            .map(|seed| Board::new_shuffled_with_seed(&goal, 20, seed))
            .collect();
        let sequential: Vec<usize> = starts
            .iter()
            .map(|start| solver.solve(start, &goal, Strategy::WeightedAStar).unwrap().steps)
            .collect();

        let parallel: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = starts
                .iter()
                .map(|start| {
                    let solver = &solver;
                    let goal = &goal;
                    scope.spawn(move || {
                        solver
                            .solve(start, goal, Strategy::WeightedAStar)
                            .unwrap()
                            .steps
                    })
                })
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });
        assert_eq!(sequential, parallel);
    }
}

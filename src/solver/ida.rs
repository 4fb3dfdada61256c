//! Iterative-deepening A*.
//!
//! Depth-first probes bounded by an f-threshold that starts at the root's
//! heuristic and rises to the smallest f that overflowed the previous probe.
//! Memory stays proportional to the path depth: the only state is the stack
//! of nodes from the root to the current node.

use tracing::debug;

use super::{Clock, Halt, NodeId, SearchNode, SearchReport};
use crate::config::SearchLimits;
use crate::engine::Board;
use crate::heuristics::GoalIndex;

/// The deadline is read once per this many visited nodes.
const CLOCK_CHECK_INTERVAL: usize = 1024;

enum Probe {
    /// The goal is on top of the stack.
    Found,
    /// Smallest f above the threshold seen in the subtree, `None` if nothing overflowed.
    Bound(Option<u32>),
    Halted(Halt),
}

struct IdaSearch<'a> {
    index: GoalIndex,
    stack: Vec<SearchNode>,
    nodes_explored: usize,
    limits: &'a SearchLimits,
    clock: &'a Clock,
}

pub(crate) fn search(
    start: &Board,
    goal: &Board,
    limits: &SearchLimits,
    clock: &Clock,
) -> SearchReport {
    let index = GoalIndex::new(goal);
    let root = SearchNode::root(*start, index.score(start));
    let mut threshold = root.h;
    let mut search = IdaSearch {
        index,
        stack: vec![root],
        nodes_explored: 0,
        limits,
        clock,
    };

    loop {
        if clock.expired() {
            return SearchReport::halted(Halt::TimedOut, search.nodes_explored);
        }
        match search.probe(threshold) {
            Probe::Found => return SearchReport::solved(search.stack, search.nodes_explored),
            Probe::Bound(Some(next)) => {
                debug!(
                    threshold,
                    next,
                    nodes_explored = search.nodes_explored,
                    "raising threshold"
                );
                threshold = next;
            }
            Probe::Bound(None) => {
                return SearchReport::halted(Halt::Exhausted, search.nodes_explored)
            }
            Probe::Halted(halt) => return SearchReport::halted(halt, search.nodes_explored),
        }
    }
}

impl IdaSearch<'_> {
    fn halt(&self) -> Option<Halt> {
        if self
            .limits
            .max_expansions
            .is_some_and(|max| self.nodes_explored > max)
        {
            return Some(Halt::Exhausted);
        }
        if self.nodes_explored % CLOCK_CHECK_INTERVAL == 0 && self.clock.expired() {
            return Some(Halt::TimedOut);
        }
        None
    }

    /// Explores below the node on top of the stack. On `Found` the stack holds
    /// the whole path; otherwise it is left as it was on entry.
    fn probe(&mut self, threshold: u32) -> Probe {
        self.nodes_explored += 1;
        if let Some(halt) = self.halt() {
            return Probe::Halted(halt);
        }

        let id: NodeId = self.stack.len() - 1;
        let node = self.stack[id];
        let f = node.f();
        if f > threshold {
            return Probe::Bound(Some(f));
        }
        if node.h == 0 {
            return Probe::Found;
        }

        // Never step straight back onto the parent's board.
        let previous = node.parent.map(|parent| self.stack[parent].board);
        let mut children: Vec<SearchNode> = node
            .neighbors(id)
            .filter(|child| Some(child.board) != previous)
            .map(|mut child| {
                child.h = self.index.score(&child.board);
                child
            })
            .collect();
        children.sort_by_key(|child| child.h);

        let mut min: Option<u32> = None;
        for child in children {
            self.stack.push(child);
            match self.probe(threshold) {
                Probe::Found => return Probe::Found,
                Probe::Bound(Some(bound)) => {
                    min = Some(min.map_or(bound, |current| current.min(bound)));
                }
                Probe::Bound(None) => {}
                halted @ Probe::Halted(_) => return halted,
            }
            self.stack.pop();
        }
        Probe::Bound(min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Direction;
    use std::time::Duration;

    fn unlimited_clock() -> Clock {
        Clock::new(None, None)
    }

    #[test]
    fn test_root_already_at_goal() {
        let goal = Board::solved();
        let report = search(&goal, &goal, &SearchLimits::default(), &unlimited_clock());
        let path = report.outcome.unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(report.nodes_explored, 1);
    }

    #[test]
    fn test_stack_is_the_path() {
        let goal = Board::solved();
        let start = goal
            .apply(Direction::Up)
            .and_then(|board| board.apply(Direction::Left))
            .and_then(|board| board.apply(Direction::Down))
            .unwrap();
        let report = search(&start, &goal, &SearchLimits::default(), &unlimited_clock());
        let path = report.outcome.unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path[0].board, start);
        assert_eq!(path[3].board, goal);
        for (i, node) in path.iter().enumerate() {
            assert_eq!(node.g as usize, i);
            assert_eq!(node.parent, i.checked_sub(1));
        }
        let moves: Vec<Direction> = path.iter().skip(1).map(|node| node.direction).collect();
        assert_eq!(moves, vec![Direction::Up, Direction::Right, Direction::Down]);
    }

    #[test]
    fn test_finds_shortest_path_on_short_walks() {
        let goal = Board::solved();
        // Four tiles end up one cell from home and each move shifts one tile,
        // so no path is shorter than the walk.
        let walk = [Direction::Left, Direction::Left, Direction::Up, Direction::Right];
        let mut start = goal;
        for direction in walk {
            start = start.apply(direction).unwrap();
        }
        let report = search(&start, &goal, &SearchLimits::default(), &unlimited_clock());
        assert_eq!(report.outcome.unwrap().len(), walk.len() + 1);
    }

    #[test]
    fn test_expansion_cap_halts() {
        let goal = Board::solved();
        let start = goal
            .apply(Direction::Up)
            .and_then(|board| board.apply(Direction::Left))
            .unwrap();
        let limits = SearchLimits {
            max_expansions: Some(1),
            time_limit: None,
        };
        // The root fits the budget, its first child does not.
        let report = search(&start, &goal, &limits, &unlimited_clock());
        assert_eq!(report.outcome.unwrap_err(), Halt::Exhausted);
        assert_eq!(report.nodes_explored, 2);
    }

    #[test]
    fn test_expired_clock_halts_before_probing() {
        let goal = Board::solved();
        let start = goal.apply(Direction::Up).unwrap();
        let clock = Clock::new(Some(Duration::ZERO), None);
        let report = search(&start, &goal, &SearchLimits::default(), &clock);
        assert_eq!(report.outcome.unwrap_err(), Halt::TimedOut);
        assert_eq!(report.nodes_explored, 0);
    }
}

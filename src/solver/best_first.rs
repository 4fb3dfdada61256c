//! Greedy best-first search and weighted A*.
//!
//! Both share one loop and differ only in how a node's priority is computed.

use std::collections::HashSet;

use super::{chain, renumber, Clock, Halt, SearchNode, SearchReport};
use crate::config::{SearchLimits, WeightedAStarConfig};
use crate::engine::Board;
use crate::frontier::MinHeap;
use crate::heuristics::GoalIndex;

/// How a node is ranked in the open list.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Priority<'a> {
    /// `h` alone.
    Greedy,
    /// `g + weight(g) * h`.
    Weighted(&'a WeightedAStarConfig),
}

impl Priority<'_> {
    fn of(&self, node: &SearchNode) -> f64 {
        match self {
            Priority::Greedy => f64::from(node.h),
            Priority::Weighted(config) => {
                f64::from(node.g) + config.weight(node.g) * f64::from(node.h)
            }
        }
    }
}

pub(crate) fn search(
    start: &Board,
    goal: &Board,
    priority: Priority<'_>,
    limits: &SearchLimits,
    clock: &Clock,
) -> SearchReport {
    let index = GoalIndex::new(goal);
    let root = SearchNode::root(*start, index.score(start));

    let mut arena = vec![root];
    let mut open = MinHeap::new();
    open.push(0, priority.of(&root));
    let mut closed: HashSet<u64> = HashSet::new();
    let mut nodes_explored = 0;

    loop {
        if limits
            .max_expansions
            .is_some_and(|max| nodes_explored >= max)
        {
            return SearchReport::halted(Halt::Exhausted, nodes_explored);
        }
        if clock.expired() {
            return SearchReport::halted(Halt::TimedOut, nodes_explored);
        }
        let Some(id) = open.pop() else {
            return SearchReport::halted(Halt::Exhausted, nodes_explored);
        };
        nodes_explored += 1;

        let node = arena[id];
        if node.board == *index.goal() {
            let mut path = chain(&arena, id);
            renumber(&mut path);
            return SearchReport::solved(path, nodes_explored);
        }
        // Stale duplicate of a board already expanded.
        if !closed.insert(node.board.key()) {
            continue;
        }

        for mut child in node.neighbors(id) {
            if closed.contains(&child.board.key()) {
                continue;
            }
            child.h = index.score(&child.board);
            open.push(arena.len(), priority.of(&child));
            arena.push(child);
        }
    }
}

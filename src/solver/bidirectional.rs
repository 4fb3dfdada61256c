//! Bidirectional A*.
//!
//! One A* grows from the start toward the goal, another from the goal toward
//! the start, taking turns one expansion at a time. A side that pops a board
//! the other side has already closed has found a meeting point; the cheapest
//! meeting seen so far is kept. A side stops once its smallest `f` can no
//! longer beat that meeting.

use std::collections::HashMap;

use tracing::debug;

use super::{chain, renumber, Clock, Halt, NodeId, SearchNode, SearchReport};
use crate::config::SearchLimits;
use crate::engine::Board;
use crate::frontier::MinHeap;
use crate::heuristics::GoalIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Heading {
    Forward,
    Backward,
}

/// A board closed by both sides.
#[derive(Clone, Copy, Debug)]
struct Meeting {
    cost: u32,
    forward: NodeId,
    backward: NodeId,
}

/// The state of one side.
struct SearchContext {
    /// Goal of this side: the other side's root.
    index: GoalIndex,
    arena: Vec<SearchNode>,
    open: MinHeap<NodeId>,
    closed: HashMap<u64, NodeId>,
    best_g: HashMap<u64, u32>,
    heading: Heading,
}

impl SearchContext {
    fn new(root: &Board, toward: &Board, heading: Heading) -> Self {
        let index = GoalIndex::new(toward);
        let node = SearchNode::root(*root, index.score(root));
        let mut open = MinHeap::new();
        open.push(0, f64::from(node.f()));
        let mut best_g = HashMap::new();
        best_g.insert(root.key(), 0);
        SearchContext {
            index,
            arena: vec![node],
            open,
            closed: HashMap::new(),
            best_g,
            heading,
        }
    }

    /// Pops and expands one node. Returns `false` when the open list was empty.
    fn step(&mut self, other: &SearchContext, best: &mut Option<Meeting>) -> bool {
        let Some(id) = self.open.pop() else {
            return false;
        };
        let node = self.arena[id];
        let key = node.board.key();
        if self.closed.contains_key(&key) {
            return true;
        }
        self.closed.insert(key, id);

        if let Some(&other_id) = other.closed.get(&key) {
            let cost = node.g + other.arena[other_id].g;
            if best.map_or(true, |meeting| cost < meeting.cost) {
                let meeting = match self.heading {
                    Heading::Forward => Meeting {
                        cost,
                        forward: id,
                        backward: other_id,
                    },
                    Heading::Backward => Meeting {
                        cost,
                        forward: other_id,
                        backward: id,
                    },
                };
                debug!(cost, heading = ?self.heading, "searches met");
                *best = Some(meeting);
            }
        }

        if let Some(meeting) = *best {
            if node.f() >= meeting.cost {
                // Nothing left on this side can produce a cheaper path.
                self.open.clear();
                return true;
            }
        }

        for mut child in node.neighbors(id) {
            let child_key = child.board.key();
            if self.closed.contains_key(&child_key) {
                continue;
            }
            if self
                .best_g
                .get(&child_key)
                .is_some_and(|&g| g <= child.g)
            {
                continue;
            }
            self.best_g.insert(child_key, child.g);
            child.h = self.index.score(&child.board);
            self.open.push(self.arena.len(), f64::from(child.f()));
            self.arena.push(child);
        }
        true
    }
}

pub(crate) fn search(
    start: &Board,
    goal: &Board,
    limits: &SearchLimits,
    clock: &Clock,
) -> SearchReport {
    let mut forward = SearchContext::new(start, goal, Heading::Forward);
    let mut backward = SearchContext::new(goal, start, Heading::Backward);
    let mut best: Option<Meeting> = None;
    let mut nodes_explored = 0;
    let mut halt = None;

    'outer: while !forward.open.is_empty() || !backward.open.is_empty() {
        for heading in [Heading::Forward, Heading::Backward] {
            if limits
                .max_expansions
                .is_some_and(|max| nodes_explored >= max)
            {
                halt = Some(Halt::Exhausted);
                break 'outer;
            }
            if clock.expired() {
                halt = Some(Halt::TimedOut);
                break 'outer;
            }
            let popped = match heading {
                Heading::Forward => forward.step(&backward, &mut best),
                Heading::Backward => backward.step(&forward, &mut best),
            };
            if popped {
                nodes_explored += 1;
            }
        }
    }

    match (best, halt) {
        (Some(meeting), _) => {
            if let Some(halt) = halt {
                debug!(?halt, cost = meeting.cost, "returning best meeting found before halting");
            }
            SearchReport::solved(join(&forward, &backward, meeting), nodes_explored)
        }
        (None, halt) => SearchReport::halted(halt.unwrap_or(Halt::Exhausted), nodes_explored),
    }
}

/// The forward chain up to the meeting board, followed by the backward chain
/// walked from the meeting board back to the goal.
///
/// A backward node records the move from its parent to itself, so going the
/// other way plays the opposite move.
fn join(forward: &SearchContext, backward: &SearchContext, meeting: Meeting) -> Vec<SearchNode> {
    let mut path = chain(&forward.arena, meeting.forward);
    let mut previous = backward.arena[meeting.backward];
    while let Some(parent) = previous.parent {
        let node = backward.arena[parent];
        path.push(SearchNode {
            board: node.board,
            blank_index: node.blank_index,
            direction: previous.direction.opposite(),
            parent: None,
            g: 0,
            h: forward.index.score(&node.board),
        });
        previous = node;
    }
    renumber(&mut path);
    path
}

//! Error types for board construction and solving.

use std::time::Duration;

use thiserror::Error;

use crate::solver::Strategy;

/// Raised when a tile sequence is not a permutation of `0..16`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The sequence does not hold exactly 16 tiles.
    #[error("expected 16 tiles, found {0}")]
    WrongLength(usize),

    /// A tile value lies outside `0..=15`.
    #[error("tile {value} at index {index} is out of range (0-15)")]
    OutOfRange { index: usize, value: u32 },

    /// A tile value appears more than once.
    #[error("tile {value} appears more than once")]
    Duplicate { value: u8 },

    /// A token could not be read as a tile number.
    #[error("could not parse '{0}' as a tile number")]
    InvalidToken(String),
}

/// Why a call to `solve` produced no path.
///
/// `Unsolvable` is a proof that no path exists. `Exhausted` and `TimedOut`
/// only mean the chosen strategy gave up; another strategy or a larger
/// budget may still succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("the start board cannot reach the goal board")]
    Unsolvable,

    #[error("{strategy} exhausted its search budget after expanding {nodes_explored} nodes")]
    Exhausted {
        strategy: Strategy,
        nodes_explored: usize,
    },

    #[error("{strategy} ran out of time after {elapsed:?} ({nodes_explored} nodes expanded)")]
    TimedOut {
        strategy: Strategy,
        nodes_explored: usize,
        elapsed: Duration,
    },
}

impl SolveError {
    /// Returns `true` when retrying with another strategy or budget may help.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SolveError::Unsolvable)
    }
}

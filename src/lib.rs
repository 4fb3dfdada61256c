//! # Fifteen Solver Library
//!
//! This library finds move sequences for the 4x4 sliding-tile puzzle: fifteen
//! numbered tiles and one blank, where a move slides the blank into an
//! orthogonally adjacent cell. Any arrangement can serve as the goal.
//!
//! It is used by two binaries:
//! - `puzzle_solver`: Solves one start board with one or every strategy and
//!   prints the moves.
//! - `strategy_evaluator`: Runs every strategy over a batch of seeded
//!   shuffles and compares path lengths, nodes explored and time.
//!
//! ## Modules
//! - `engine`: The board (`Board`), blank moves (`Direction`) and seeded shuffling.
//! - `heuristics`: Manhattan distance, linear conflict and the difficulty rating.
//! - `solvability`: The parity test deciding whether a goal is reachable at all.
//! - `frontier`: The binary min-heap used as the open list.
//! - `solver`: The search strategies and the `Solver` that dispatches to them.
//! - `config`: Per-strategy caps and weights, loadable from TOML.
//! - `error`: Error types shared by the modules above.
//! - `utils`: Parsing boards from text.

pub mod config;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod heuristics;
pub mod solvability;
pub mod solver;
pub mod utils;

pub use engine::{Board, Direction};
pub use error::{BoardError, SolveError};
pub use heuristics::complexity_score;
pub use solvability::is_solvable;
pub use solver::{solve, SearchNode, Solver, SolverResult, Strategy};

//! Reachability test based on permutation parity.
//!
//! Every legal move swaps the blank with a neighbour. A horizontal move keeps
//! the tile order; a vertical move jumps one tile over three others, flipping
//! the inversion parity and the blank row at the same time. So two boards are
//! connected exactly when their relative inversion parity matches the parity
//! of the distance between their blank rows.

use crate::engine::{row, Board, BLANK, GRID_SIZE};

/// Counts the pairs of numbered tiles that appear in a different order on
/// `board` than on `goal`.
pub fn inversions(board: &Board, goal: &Board) -> usize {
    let positions = goal.positions();
    let order: Vec<u8> = board
        .tiles()
        .iter()
        .filter(|&&tile| tile != BLANK)
        .map(|&tile| positions[tile as usize])
        .collect();

    order
        .iter()
        .enumerate()
        .map(|(i, &first)| order[i + 1..].iter().filter(|&&later| first > later).count())
        .sum()
}

/// The blank's row counted from the bottom: `1` for the last row, `4` for the first.
pub fn blank_row_from_bottom(board: &Board) -> usize {
    GRID_SIZE - row(board.blank_index())
}

/// Returns `true` when `goal` can be reached from `board` by sliding tiles.
///
/// The test is symmetric: `is_solvable(a, b) == is_solvable(b, a)`.
///
/// # Examples
/// ```
/// use fifteen_solver::engine::Board;
/// use fifteen_solver::solvability::is_solvable;
///
/// let goal = Board::solved();
/// let swapped = Board::new([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 14, 0]).unwrap();
/// assert!(is_solvable(&goal, &goal));
/// assert!(!is_solvable(&swapped, &goal));
/// ```
pub fn is_solvable(board: &Board, goal: &Board) -> bool {
    let blank_rows = blank_row_from_bottom(board).abs_diff(blank_row_from_bottom(goal));
    inversions(board, goal) % 2 == blank_rows % 2
}

use crate::engine::{col, row, Board, BLANK, GRID_SIZE, TILE_COUNT};
use crate::solvability::is_solvable;
use std::fmt;

/// Sums, over every numbered tile, the grid distance between its cell on
/// `board` and its cell on `goal`.
///
/// The blank is not counted.
///
/// # Arguments
/// * `board`: The board to measure.
/// * `goal`: The board the tiles should end up in.
///
/// # Returns
/// The total Manhattan distance, `0` exactly when `board == goal`.
pub fn manhattan_distance(board: &Board, goal: &Board) -> u32 {
    GoalIndex::new(goal).manhattan_distance(board)
}

/// Counts tile pairs that share a line with their goal line but sit in the
/// reverse order, adding `2` per pair.
///
/// A pair counts for a row when both tiles are in that row on `board`, both
/// belong in that row on `goal`, and the left one belongs to the right of
/// the other. Columns are handled the same way top to bottom.
pub fn linear_conflict(board: &Board, goal: &Board) -> u32 {
    GoalIndex::new(goal).linear_conflict(board)
}

/// Manhattan distance plus linear conflict.
///
/// This is the estimate every heuristic-driven strategy searches with, and
/// the number the difficulty rating is bucketed on.
///
/// # Examples
/// ```
/// use fifteen_solver::engine::Board;
/// use fifteen_solver::heuristics::complexity_score;
///
/// let goal = Board::solved();
/// assert_eq!(complexity_score(&goal, &goal), 0);
///
/// let swapped = Board::new([2, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 0]).unwrap();
/// assert_eq!(complexity_score(&swapped, &goal), 4);
/// ```
pub fn complexity_score(board: &Board, goal: &Board) -> u32 {
    GoalIndex::new(goal).score(board)
}

/// A goal board with its tile positions precomputed, so each evaluation
/// looks positions up instead of scanning the goal.
#[derive(Clone, Debug)]
pub(crate) struct GoalIndex {
    goal: Board,
    positions: [u8; TILE_COUNT],
}

impl GoalIndex {
    pub(crate) fn new(goal: &Board) -> Self {
        GoalIndex {
            goal: *goal,
            positions: goal.positions(),
        }
    }

    pub(crate) fn goal(&self) -> &Board {
        &self.goal
    }

    fn target(&self, tile: u8) -> usize {
        self.positions[tile as usize] as usize
    }

    pub(crate) fn manhattan_distance(&self, board: &Board) -> u32 {
        board
            .tiles()
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != BLANK)
            .map(|(index, &tile)| {
                let target = self.target(tile);
                (row(index).abs_diff(row(target)) + col(index).abs_diff(col(target))) as u32
            })
            .sum()
    }

    pub(crate) fn linear_conflict(&self, board: &Board) -> u32 {
        let mut conflict = 0;

        for line in 0..GRID_SIZE {
            // Row `line`: both tiles must belong in this row; compare goal columns.
            conflict += self.line_conflict(board, |i| line * GRID_SIZE + i, |target| {
                (row(target) == line).then(|| col(target))
            });
            // Column `line`: both tiles must belong in this column; compare goal rows.
            conflict += self.line_conflict(board, |i| i * GRID_SIZE + line, |target| {
                (col(target) == line).then(|| row(target))
            });
        }

        conflict
    }

    /// Conflicts along one line. `cell_at` maps a position along the line to a
    /// cell index; `goal_rank` returns a tile's goal position along the line,
    /// or `None` when the tile belongs to another line.
    fn line_conflict(
        &self,
        board: &Board,
        cell_at: impl Fn(usize) -> usize,
        goal_rank: impl Fn(usize) -> Option<usize>,
    ) -> u32 {
        let mut ranks = [0usize; GRID_SIZE];
        let mut len = 0;
        for i in 0..GRID_SIZE {
            let tile = board.tile(cell_at(i));
            if tile == BLANK {
                continue;
            }
            if let Some(rank) = goal_rank(self.target(tile)) {
                ranks[len] = rank;
                len += 1;
            }
        }

        let ranks = &ranks[..len];
        let mut conflict = 0;
        for (i, &first) in ranks.iter().enumerate() {
            for &second in &ranks[i + 1..] {
                if first > second {
                    conflict += 2;
                }
            }
        }
        conflict
    }

    pub(crate) fn score(&self, board: &Board) -> u32 {
        self.manhattan_distance(board) + self.linear_conflict(board)
    }
}

/// Coarse difficulty of reaching a goal, bucketed on the complexity score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
    /// The board already equals the goal.
    Trivial,
    Easy,
    Medium,
    Hard,
    Extreme,
    Insane,
    /// The goal cannot be reached at all.
    Unsolvable,
}

impl Difficulty {
    /// Rates how hard it is to turn `board` into `goal`.
    ///
    /// # Examples
    /// ```
    /// use fifteen_solver::engine::Board;
    /// use fifteen_solver::heuristics::Difficulty;
    ///
    /// let goal = Board::solved();
    /// assert_eq!(Difficulty::assess(&goal, &goal), Difficulty::Trivial);
    /// ```
    pub fn assess(board: &Board, goal: &Board) -> Self {
        if board == goal {
            Difficulty::Trivial
        } else if !is_solvable(board, goal) {
            Difficulty::Unsolvable
        } else {
            Self::from_score(complexity_score(board, goal))
        }
    }

    /// Buckets a complexity score of a solvable, non-trivial board.
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=17 => Difficulty::Easy,
            18..=33 => Difficulty::Medium,
            34..=49 => Difficulty::Hard,
            50..=65 => Difficulty::Extreme,
            _ => Difficulty::Insane,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Trivial => "Trivial",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Extreme => "Extreme",
            Difficulty::Insane => "Insane",
            Difficulty::Unsolvable => "N/A",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Direction;

    fn board(tiles: [u8; TILE_COUNT]) -> Board {
        Board::new(tiles).unwrap()
    }

    #[test]
    fn test_manhattan_distance() {
        let goal = Board::solved();
        assert_eq!(manhattan_distance(&goal, &goal), 0);

        let one_move = goal.apply(Direction::Up).unwrap();
        assert_eq!(manhattan_distance(&one_move, &goal), 1);

        // Tile 1 swapped with the blank: it sits six cells from home.
        let far = board([0, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 1]);
        assert_eq!(manhattan_distance(&far, &goal), 6);
    }

    #[test]
    fn test_linear_conflict_rows_and_columns() {
        let goal = Board::solved();

        let row_pair = board([2, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 0]);
        assert_eq!(linear_conflict(&row_pair, &goal), 2);

        let reversed_row = board([4, 3, 2, 1, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 0]);
        assert_eq!(linear_conflict(&reversed_row, &goal), 12);
        assert_eq!(manhattan_distance(&reversed_row, &goal), 8);

        let column_pair = board([5, 2, 3, 4, 1, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 0]);
        assert_eq!(linear_conflict(&column_pair, &goal), 2);
    }

    #[test]
    fn test_linear_conflict_ignores_tiles_from_other_lines() {
        let goal = Board::solved();
        // 5 sits in row 0 but belongs to row 1, so it never conflicts with 1.
        let stray = board([5, 1, 3, 4, 2, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 0]);
        assert_eq!(linear_conflict(&stray, &goal), 0);
    }

    #[test]
    fn test_score_is_relative_to_goal() {
        let inverted = board([15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 1, 2, 0]);
        assert_eq!(complexity_score(&inverted, &inverted), 0);
        assert!(complexity_score(&Board::solved(), &inverted) > 0);

        let shuffled = Board::new_shuffled_with_seed(&inverted, 200, 5);
        if shuffled != inverted {
            assert!(complexity_score(&shuffled, &inverted) > 0);
        }
    }

    #[test]
    fn test_score_zero_only_for_goal() {
        let goal = Board::solved();
        for seed in 0..50 {
            let shuffled = Board::new_shuffled_with_seed(&goal, 30, seed);
            assert_eq!(complexity_score(&shuffled, &goal) == 0, shuffled == goal);
        }
    }

    #[test]
    fn test_goal_index_matches_free_functions() {
        let goal = Board::new_shuffled_with_seed(&Board::solved(), 300, 9);
        let index = GoalIndex::new(&goal);
        assert_eq!(index.goal(), &goal);
        for seed in 0..10 {
            let candidate = Board::new_shuffled_with_seed(&goal, 60, seed);
            assert_eq!(index.score(&candidate), complexity_score(&candidate, &goal));
        }
    }

    #[test]
    fn test_difficulty_buckets() {
        let goal = Board::solved();
        assert_eq!(Difficulty::assess(&goal, &goal), Difficulty::Trivial);

        let one_move = goal.apply(Direction::Left).unwrap();
        assert_eq!(Difficulty::assess(&one_move, &goal), Difficulty::Easy);

        let unsolvable = board([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 14, 0]);
        assert_eq!(Difficulty::assess(&unsolvable, &goal), Difficulty::Unsolvable);

        assert_eq!(Difficulty::from_score(17), Difficulty::Easy);
        assert_eq!(Difficulty::from_score(18), Difficulty::Medium);
        assert_eq!(Difficulty::from_score(34), Difficulty::Hard);
        assert_eq!(Difficulty::from_score(50), Difficulty::Extreme);
        assert_eq!(Difficulty::from_score(66), Difficulty::Insane);
        assert_eq!(Difficulty::Unsolvable.to_string(), "N/A");
    }
}

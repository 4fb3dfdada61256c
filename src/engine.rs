//! Board model for the 4x4 sliding-tile puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Direction`: The way the blank travels in a single move (or `Start` for a root).
//! - `Board`: An immutable permutation of the tiles `0..16`, where `0` is the blank,
//!   together with the row/column arithmetic and the random-walk shuffler.
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;

use crate::error::BoardError;

/// Number of rows (and columns) of the grid.
pub const GRID_SIZE: usize = 4;

/// Number of cells on the board, blank included.
pub const TILE_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// The tile value that marks the blank cell.
pub const BLANK: u8 = 0;

/// Returns the row of a cell index.
pub const fn row(index: usize) -> usize {
    index / GRID_SIZE
}

/// Returns the column of a cell index.
pub const fn col(index: usize) -> usize {
    index % GRID_SIZE
}

/// Returns the cell index of a `(row, col)` pair.
pub const fn cell(row: usize, col: usize) -> usize {
    row * GRID_SIZE + col
}

/// The direction the blank moved to produce a board from its parent.
///
/// `Start` marks a root board that was not produced by a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Start,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The four real moves, in the order successors are generated.
    pub const MOVES: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the move that undoes this one. `Start` is its own opposite.
    ///
    /// # Examples
    ///
    /// ```
    /// use fifteen_solver::engine::Direction;
    /// assert_eq!(Direction::Up.opposite(), Direction::Down);
    /// assert_eq!(Direction::Start.opposite(), Direction::Start);
    /// ```
    pub fn opposite(self) -> Self {
        match self {
            Direction::Start => Direction::Start,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the cell the blank lands on when moving this way from `blank`,
    /// or `None` if that would leave the grid.
    pub fn target(self, blank: usize) -> Option<usize> {
        let (r, c) = (row(blank), col(blank));
        match self {
            Direction::Start => None,
            Direction::Up if r > 0 => Some(cell(r - 1, c)),
            Direction::Down if r + 1 < GRID_SIZE => Some(cell(r + 1, c)),
            Direction::Left if c > 0 => Some(cell(r, c - 1)),
            Direction::Right if c + 1 < GRID_SIZE => Some(cell(r, c + 1)),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Start => "START",
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 4x4 board stored row-major: index = row * 4 + column.
///
/// A `Board` is always a permutation of `0..16`; the only way to build one is
/// through the validating constructors. Moves never mutate a board, they
/// return a new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    tiles: [u8; TILE_COUNT],
    blank: u8,
}

impl Board {
    /// Creates a board from 16 tiles, checking that they form a permutation of `0..16`.
    ///
    /// # Arguments
    /// * `tiles`: The tiles in row-major order, `0` for the blank.
    ///
    /// # Returns
    /// * `Ok(Board)` if every value in `0..=15` appears exactly once.
    /// * `Err(BoardError)` naming the first out-of-range or duplicated tile.
    ///
    /// # Examples
    /// ```
    /// use fifteen_solver::engine::Board;
    /// let board = Board::new([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0, 15]).unwrap();
    /// assert_eq!(board.blank_index(), 14);
    ///
    /// assert!(Board::new([1; 16]).is_err());
    /// ```
    pub fn new(tiles: [u8; TILE_COUNT]) -> Result<Self, BoardError> {
        let mut seen = [false; TILE_COUNT];
        let mut blank = 0;
        for (index, &value) in tiles.iter().enumerate() {
            let slot = seen
                .get_mut(value as usize)
                .ok_or(BoardError::OutOfRange {
                    index,
                    value: u32::from(value),
                })?;
            if *slot {
                return Err(BoardError::Duplicate { value });
            }
            *slot = true;
            if value == BLANK {
                blank = index;
            }
        }
        Ok(Board {
            tiles,
            blank: blank as u8,
        })
    }

    /// Creates a board from a slice, rejecting anything that is not exactly 16 tiles.
    pub fn from_slice(tiles: &[u8]) -> Result<Self, BoardError> {
        let tiles: [u8; TILE_COUNT] = tiles
            .try_into()
            .map_err(|_| BoardError::WrongLength(tiles.len()))?;
        Self::new(tiles)
    }

    /// The ascending goal: tiles `1..=15` in order with the blank in the bottom-right corner.
    pub fn solved() -> Self {
        let mut tiles = [BLANK; TILE_COUNT];
        for (index, tile) in tiles.iter_mut().take(TILE_COUNT - 1).enumerate() {
            *tile = index as u8 + 1;
        }
        Board {
            tiles,
            blank: (TILE_COUNT - 1) as u8,
        }
    }

    /// Creates a board by walking the blank randomly away from `goal`.
    ///
    /// Every step is a legal move, so the result is always reachable from `goal`.
    ///
    /// # Arguments
    /// * `goal`: The board the walk starts from.
    /// * `steps`: The number of random moves to apply.
    /// * `rng`: The random source picking each move.
    pub fn random_walk(goal: &Board, steps: usize, rng: &mut impl Rng) -> Self {
        let mut board = *goal;
        for _ in 0..steps {
            let moves: Vec<Board> = Direction::MOVES
                .iter()
                .filter_map(|&direction| board.apply(direction))
                .collect();
            if let Some(next) = moves.choose(rng) {
                board = *next;
            }
        }
        board
    }

    /// Same as `random_walk`, with a `SmallRng` seeded from `seed` so the result is reproducible.
    ///
    /// # Examples
    /// ```
    /// use fifteen_solver::engine::Board;
    /// let goal = Board::solved();
    /// let a = Board::new_shuffled_with_seed(&goal, 600, 7);
    /// let b = Board::new_shuffled_with_seed(&goal, 600, 7);
    /// assert_eq!(a, b);
    /// ```
    pub fn new_shuffled_with_seed(goal: &Board, steps: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        Self::random_walk(goal, steps, &mut rng)
    }

    /// Returns the tiles in row-major order.
    pub fn tiles(&self) -> &[u8; TILE_COUNT] {
        &self.tiles
    }

    /// Returns the tile at a cell index.
    ///
    /// # Panics
    /// Panics if `index >= 16`.
    pub fn tile(&self, index: usize) -> u8 {
        self.tiles[index]
    }

    /// Returns the cell index of the blank.
    pub fn blank_index(&self) -> usize {
        self.blank as usize
    }

    /// For every tile value, the cell index it occupies on this board.
    pub fn positions(&self) -> [u8; TILE_COUNT] {
        let mut positions = [0u8; TILE_COUNT];
        for (index, &tile) in self.tiles.iter().enumerate() {
            positions[tile as usize] = index as u8;
        }
        positions
    }

    /// Returns a new board with cells `i` and `j` exchanged; `self` is left untouched.
    ///
    /// # Panics
    /// Panics if `i` or `j` is not a cell index.
    pub fn swap(&self, i: usize, j: usize) -> Self {
        let mut next = *self;
        next.tiles.swap(i, j);
        if next.tiles[i] == BLANK {
            next.blank = i as u8;
        } else if next.tiles[j] == BLANK {
            next.blank = j as u8;
        }
        next
    }

    /// Moves the blank one cell in `direction`.
    ///
    /// # Returns
    /// The resulting board, or `None` if the blank is against that edge
    /// (or `direction` is `Start`).
    ///
    /// # Examples
    /// ```
    /// use fifteen_solver::engine::{Board, Direction};
    /// let solved = Board::solved();
    /// assert!(solved.apply(Direction::Down).is_none());
    /// let moved = solved.apply(Direction::Left).unwrap();
    /// assert_eq!(moved.blank_index(), 14);
    /// assert_eq!(moved.apply(Direction::Right), Some(solved));
    /// ```
    pub fn apply(&self, direction: Direction) -> Option<Self> {
        let blank = self.blank_index();
        direction.target(blank).map(|target| self.swap(blank, target))
    }

    /// Packs the board into a `u64`, four bits per cell. Distinct boards give distinct keys.
    pub fn key(&self) -> u64 {
        self.tiles
            .iter()
            .fold(0u64, |key, &tile| (key << 4) | u64::from(tile))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.tiles.chunks(GRID_SIZE) {
            for (c, &tile) in line.iter().enumerate() {
                if c > 0 {
                    write!(f, " ")?;
                }
                if tile == BLANK {
                    write!(f, "{:>2}", ".")?;
                } else {
                    write!(f, "{:>2}", tile)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

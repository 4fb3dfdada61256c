use crate::engine::{Board, TILE_COUNT};
use crate::error::BoardError;

/// Parses a board from sixteen tile numbers in row-major order.
///
/// Numbers may be separated by commas, whitespace or both. `0` is the blank.
///
/// # Arguments
/// * `s`: The text to parse, for example `"1,2,3,4, 5,6,7,8, 9,10,11,12, 13,14,15,0"`.
///
/// # Returns
/// * `Ok(Board)` if the text holds a permutation of `0..=15`.
/// * `Err(BoardError)` if:
///     - A token is not a non-negative integer (`InvalidToken`).
///     - A number is above 15 (`OutOfRange`).
///     - There are not exactly 16 numbers (`WrongLength`).
///     - A number repeats (`Duplicate`).
///
/// # Examples
/// ```
/// use fifteen_solver::engine::Board;
/// use fifteen_solver::utils::parse_board;
///
/// let board = parse_board("1 2 3 4\n5 6 7 8\n9 10 11 12\n13 14 15 0").unwrap();
/// assert_eq!(board, Board::solved());
///
/// let board = parse_board("1,2,3,4,5,6,7,8,9,10,11,12,13,14,0,15").unwrap();
/// assert_eq!(board.blank_index(), 14);
///
/// assert!(parse_board("1,2,3").is_err());
/// ```
pub fn parse_board(s: &str) -> Result<Board, BoardError> {
    let mut tiles = Vec::with_capacity(TILE_COUNT);
    for (index, token) in s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
    {
        let value: u32 = token
            .parse()
            .map_err(|_| BoardError::InvalidToken(token.to_string()))?;
        let tile = u8::try_from(value)
            .ok()
            .filter(|&tile| usize::from(tile) < TILE_COUNT)
            .ok_or(BoardError::OutOfRange { index, value })?;
        tiles.push(tile);
    }
    Board::from_slice(&tiles)
}

//! Win detection logic for gomoku.

use super::super::{Board, Cell, Player, Position, WIN_LENGTH};
use tracing::instrument;

/// The four line axes: horizontal, vertical, and both diagonals.
const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Checks whether the stone just placed at `last` completes a line of
/// five or more for `player`.
///
/// For each axis, consecutive same-player stones are counted walking
/// outward from the placed stone in both directions independently,
/// stopping at the first non-matching or off-board cell. Only lines
/// through the last move can be new wins, so the scan inspects at most
/// a handful of cells regardless of board size.
#[instrument(skip(board))]
pub fn check_win(board: &Board, last: Position, player: Player) -> bool {
    for (dr, dc) in DIRECTIONS {
        let count = 1 + ray_length(board, last, player, dr, dc) + ray_length(board, last, player, -dr, -dc);
        if count >= WIN_LENGTH {
            return true;
        }
    }
    false
}

/// Counts consecutive `player` stones along `(dr, dc)` starting one
/// step away from `from`.
fn ray_length(board: &Board, from: Position, player: Player, dr: i32, dc: i32) -> usize {
    let mut count = 0;
    for step in 1..WIN_LENGTH as i32 {
        let row = from.row() as i32 + dr * step;
        let col = from.col() as i32 + dc * step;
        match board.get_raw(row, col) {
            Some(Cell::Occupied(p)) if p == player => count += 1,
            _ => break,
        }
    }
    count
}

//! Draw detection logic for gomoku.

use super::super::{BOARD_SIZE, Board};
use tracing::instrument;

/// Checks if the board is full (all 225 cells occupied).
///
/// A full board with no five-in-a-row ends the game in a draw.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.stone_count() == BOARD_SIZE * BOARD_SIZE
}

//! Bounds-checked board coordinates.

use super::action::MoveError;
use super::types::BOARD_SIZE;
use serde::{Deserialize, Serialize};

/// A position on the gomoku board.
///
/// Both coordinates are proven in-range at construction, so every
/// `Position` held by the engine is a valid board index. Raw wire
/// coordinates must pass through [`Position::try_new`] before they
/// reach the game, which keeps out-of-range requests from ever
/// consuming a sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

/// Unvalidated wire form of a position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawPosition {
    row: u8,
    col: u8,
}

impl Position {
    /// Creates a position, validating both coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::OutOfRange`] if either coordinate is
    /// outside `0..15`.
    pub fn try_new(row: u8, col: u8) -> Result<Self, MoveError> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Ok(Self { row, col })
        } else {
            Err(MoveError::OutOfRange { row, col })
        }
    }

    /// Returns the row index (0-14).
    pub fn row(&self) -> u8 {
        self.row
    }

    /// Returns the column index (0-14).
    pub fn col(&self) -> u8 {
        self.col
    }
}

impl TryFrom<RawPosition> for Position {
    type Error = MoveError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::try_new(raw.row, raw.col)
    }
}

impl From<Position> for RawPosition {
    fn from(pos: Position) -> Self {
        RawPosition {
            row: pos.row,
            col: pos.col,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

//! Core domain types for gomoku.

use super::position::Position;
use serde::{Deserialize, Serialize};

/// Side length of the board.
pub const BOARD_SIZE: usize = 15;

/// Stones in a row needed to win.
pub const WIN_LENGTH: usize = 5;

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Player {
    /// Black stones (moves first).
    Black,
    /// White stones (moves second).
    White,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

/// A cell on the gomoku board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell occupied by a player's stone.
    Occupied(Player),
}

/// Error raised by board mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// The target cell already holds a stone.
    #[display("Cell is already occupied")]
    Occupied,
}

impl std::error::Error for BoardError {}

/// 15x15 gomoku board.
///
/// Cells are stored row-major. A cell, once occupied, is never
/// cleared except by [`Board::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.row() as usize][pos.col() as usize]
    }

    /// Places a stone at the given position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Occupied`] if the cell is not empty.
    pub fn place(&mut self, pos: Position, player: Player) -> Result<(), BoardError> {
        let cell = &mut self.cells[pos.row() as usize][pos.col() as usize];
        if *cell != Cell::Empty {
            return Err(BoardError::Occupied);
        }
        *cell = Cell::Occupied(player);
        Ok(())
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Returns the number of stones on the board.
    pub fn stone_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c != Cell::Empty)
            .count()
    }

    /// Clears every cell (used only on restart).
    pub fn reset(&mut self) {
        self.cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
    }

    /// Returns the cell at raw coordinates, or `None` if off the board.
    ///
    /// Used by the win scan, which walks rays that may leave the grid.
    pub fn get_raw(&self, row: i32, col: i32) -> Option<Cell> {
        if (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col) {
            Some(self.cells[row as usize][col as usize])
        } else {
            None
        }
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in self.cells.iter() {
            for (col, cell) in row.iter().enumerate() {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::Occupied(Player::Black) => 'X',
                    Cell::Occupied(Player::White) => 'O',
                };
                result.push(symbol);
                if col < BOARD_SIZE - 1 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

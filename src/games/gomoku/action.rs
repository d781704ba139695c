//! First-class move records for gomoku.
//!
//! Moves are domain events, not side effects. The engine stamps each
//! applied move with a sequence number, which is the sole ordering
//! authority for a session; client-supplied timestamps are never read.

use super::position::Position;
use super::types::Player;
use serde::{Deserialize, Serialize};

/// An applied move: a player's stone at a position, stamped with the
/// sequence number the engine assigned at apply time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player who placed the stone.
    pub player: Player,
    /// Where the stone was placed.
    pub position: Position,
    /// Server-assigned order of this move within the session (from 0).
    pub sequence: u32,
}

impl Move {
    /// Creates a new move record.
    pub fn new(player: Player, position: Position, sequence: u32) -> Self {
        Self {
            player,
            position,
            sequence,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} -> {}", self.sequence, self.player, self.position)
    }
}

/// Error that can occur when validating or applying a move.
///
/// Every variant is recoverable: the offending request is rejected and
/// the game state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// A coordinate is outside the board.
    #[display("Position ({}, {}) is outside the board", row, col)]
    OutOfRange {
        /// Offending row.
        row: u8,
        /// Offending column.
        col: u8,
    },

    /// The target cell already holds a stone.
    #[display("Cell is already occupied")]
    CellOccupied,

    /// It's not this player's turn.
    #[display("It's not {}'s turn", _0)]
    NotYourTurn(Player),

    /// The game is not accepting moves (terminal, or opponent missing).
    #[display("Game is not active")]
    GameNotActive,
}

impl std::error::Error for MoveError {}

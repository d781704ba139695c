//! Gomoku (five-in-a-row) game engine.

mod action;
mod game;
mod position;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use game::{Game, GameStatus};
pub use position::Position;
pub use types::{BOARD_SIZE, Board, BoardError, Cell, Player, WIN_LENGTH};

//! Authoritative gomoku game engine.
//!
//! `Game` owns the board and the move log. Every mutation goes through
//! [`Game::apply`], which either fully commits a move (stone placed,
//! log appended, turn/status updated) or rejects it leaving no trace.

use super::action::{Move, MoveError};
use super::position::Position;
use super::rules;
use super::types::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Current status of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended with a winner. Terminal.
    Won(Player),
    /// Board filled with no five-in-a-row. Terminal.
    Draw,
}

impl GameStatus {
    /// Returns true for `Won` and `Draw`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Gomoku game state: board, turn, status, and the ordered move log.
///
/// Black always moves first. The sequence numbers stamped onto the log
/// totally order all applied moves within one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    to_move: Player,
    status: GameStatus,
    move_log: Vec<Move>,
}

impl Game {
    /// Creates a new game with an empty board, Black to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Player::Black,
            status: GameStatus::InProgress,
            move_log: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose turn it is.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the ordered log of applied moves.
    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    /// Applies a move for `player` at `pos`.
    ///
    /// On success the returned [`Move`] carries the sequence number
    /// assigned to it. The winning move is game-ending: once the status
    /// is terminal no further `apply` succeeds until [`Game::restart`].
    ///
    /// # Errors
    ///
    /// - [`MoveError::GameNotActive`] if the status is terminal.
    /// - [`MoveError::NotYourTurn`] if it is not `player`'s turn.
    /// - [`MoveError::CellOccupied`] if the cell holds a stone.
    #[instrument(skip(self), fields(to_move = %self.to_move, status = ?self.status))]
    pub fn apply(&mut self, player: Player, pos: Position) -> Result<Move, MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameNotActive);
        }
        if player != self.to_move {
            return Err(MoveError::NotYourTurn(player));
        }
        self.board
            .place(pos, player)
            .map_err(|_| MoveError::CellOccupied)?;

        let mv = Move::new(player, pos, self.move_log.len() as u32);
        self.move_log.push(mv);

        if rules::check_win(&self.board, pos, player) {
            info!(%mv, "Winning move");
            self.status = GameStatus::Won(player);
        } else if rules::is_full(&self.board) {
            info!(%mv, "Board full, game drawn");
            self.status = GameStatus::Draw;
        } else {
            self.to_move = player.opponent();
            debug!(%mv, next = %self.to_move, "Move applied");
        }

        Ok(mv)
    }

    /// Resets the board and log for a fresh game, Black to move.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        info!(moves = self.move_log.len(), "Restarting game");
        self.board.reset();
        self.move_log.clear();
        self.to_move = Player::Black;
        self.status = GameStatus::InProgress;
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

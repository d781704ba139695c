//! Per-room game sessions: seat binding and authoritative move handling.

use crate::games::gomoku::{Game, GameStatus, Move, MoveError, Player, Position};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Opaque identity a participant presents when joining a room.
pub type ParticipantId = String;

/// Unique identifier for a room.
pub type RoomId = String;

/// Policy choosing the seat of the very first participant.
///
/// The default is a coin flip; tests inject a deterministic policy so
/// role assignment is reproducible.
pub type RolePolicy = fn() -> Player;

/// Coin-flip seat assignment for the first joiner.
pub fn coin_flip_role() -> Player {
    if rand::random() {
        Player::Black
    } else {
        Player::White
    }
}

/// Session status as both participants see it.
///
/// `WaitingForOpponent` until both seats are bound; afterwards this
/// mirrors the engine status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Only one seat is bound; moves are refused.
    WaitingForOpponent,
    /// Both seats bound, game running.
    InProgress,
    /// Terminal: a player completed five in a row.
    Won(Player),
    /// Terminal: board full with no winner.
    Draw,
}

/// Error raised when joining a session.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// Both seats are already bound to other identities.
    #[display("Room already has two players")]
    RoomFull,
}

impl std::error::Error for SessionError {}

/// The state change produced by one applied move.
///
/// Broadcast identically to both participants in apply order; it is
/// the sole source of truth clients render from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateDelta {
    /// The applied move, carrying its sequence number.
    pub mv: Move,
    /// Whose turn it is after the move.
    pub next_turn: Player,
    /// Session status after the move.
    pub status: SessionStatus,
}

/// A game session binding two participant identities to seats.
///
/// Seat bindings persist for the session's whole life: a participant
/// that reconnects with the same identity gets its original role back,
/// and the binding is never re-negotiated mid-game.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: RoomId,
    game: Game,
    seat_black: Option<ParticipantId>,
    seat_white: Option<ParticipantId>,
    created_at: DateTime<Utc>,
    role_policy: RolePolicy,
}

impl GameSession {
    /// Creates a new session with coin-flip first-seat assignment.
    #[instrument]
    pub fn new(id: RoomId) -> Self {
        Self::with_role_policy(id, coin_flip_role)
    }

    /// Creates a new session with an explicit first-seat policy.
    pub fn with_role_policy(id: RoomId, role_policy: RolePolicy) -> Self {
        info!(room_id = %id, "Creating new game session");
        Self {
            id,
            game: Game::new(),
            seat_black: None,
            seat_white: None,
            created_at: Utc::now(),
            role_policy,
        }
    }

    /// Returns the room id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the underlying game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Returns the session creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the identity bound to `role`, if any.
    pub fn seat(&self, role: Player) -> Option<&str> {
        match role {
            Player::Black => self.seat_black.as_deref(),
            Player::White => self.seat_white.as_deref(),
        }
    }

    /// Returns the number of bound seats (0-2).
    pub fn seat_count(&self) -> usize {
        [&self.seat_black, &self.seat_white]
            .iter()
            .filter(|s| s.is_some())
            .count()
    }

    /// Returns the session status both participants see.
    pub fn status(&self) -> SessionStatus {
        if self.seat_count() < 2 {
            return SessionStatus::WaitingForOpponent;
        }
        match self.game.status() {
            GameStatus::InProgress => SessionStatus::InProgress,
            GameStatus::Won(player) => SessionStatus::Won(player),
            GameStatus::Draw => SessionStatus::Draw,
        }
    }

    /// Seats a participant, or returns their existing seat on rejoin.
    ///
    /// The first distinct identity is seated by the role policy, the
    /// second takes the remaining seat, and a known identity is simply
    /// handed its original role back (the move log is untouched).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::RoomFull`] for a third distinct identity.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn join(&mut self, identity: &str) -> Result<Player, SessionError> {
        if self.seat_black.as_deref() == Some(identity) {
            debug!(identity, "Rejoin as black");
            return Ok(Player::Black);
        }
        if self.seat_white.as_deref() == Some(identity) {
            debug!(identity, "Rejoin as white");
            return Ok(Player::White);
        }

        let role = match (&self.seat_black, &self.seat_white) {
            (None, None) => (self.role_policy)(),
            (Some(_), None) => Player::White,
            (None, Some(_)) => Player::Black,
            (Some(_), Some(_)) => {
                warn!(identity, "Room already has two players");
                return Err(SessionError::RoomFull);
            }
        };

        match role {
            Player::Black => self.seat_black = Some(identity.to_string()),
            Player::White => self.seat_white = Some(identity.to_string()),
        }
        info!(identity, %role, "Seated participant");
        Ok(role)
    }

    /// Applies a move for the given role.
    ///
    /// Raw coordinates are validated here, before the engine is
    /// touched, so an out-of-range request never consumes a sequence
    /// number. Moves are refused until both seats are bound.
    ///
    /// # Errors
    ///
    /// [`MoveError::OutOfRange`], [`MoveError::GameNotActive`],
    /// [`MoveError::NotYourTurn`], or [`MoveError::CellOccupied`];
    /// every rejection leaves the session untouched.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn apply_move(&mut self, role: Player, row: u8, col: u8) -> Result<StateDelta, MoveError> {
        let pos = Position::try_new(row, col)?;

        if self.seat_count() < 2 {
            warn!(%role, "Move before both seats bound");
            return Err(MoveError::GameNotActive);
        }

        let mv = self.game.apply(role, pos)?;
        Ok(StateDelta {
            mv,
            next_turn: self.game.to_move(),
            status: self.status(),
        })
    }

    /// Resets the game for a rematch.
    ///
    /// Seat bindings survive: the status returns to `InProgress` if
    /// both seats are bound, `WaitingForOpponent` otherwise.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn restart(&mut self) {
        self.game.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_first() -> Player {
        Player::Black
    }

    fn session() -> GameSession {
        GameSession::with_role_policy("abcde".to_string(), black_first)
    }

    #[test]
    fn test_two_joins_get_distinct_roles() {
        let mut s = session();
        let a = s.join("p1").unwrap();
        let b = s.join("p2").unwrap();
        assert_eq!(a, Player::Black);
        assert_eq!(b, Player::White);
        assert_eq!(s.status(), SessionStatus::InProgress);
    }

    #[test]
    fn test_third_identity_rejected() {
        let mut s = session();
        s.join("p1").unwrap();
        s.join("p2").unwrap();
        assert_eq!(s.join("p3"), Err(SessionError::RoomFull));
    }

    #[test]
    fn test_rejoin_returns_original_role() {
        let mut s = session();
        s.join("p1").unwrap();
        s.join("p2").unwrap();
        s.apply_move(Player::Black, 7, 7).unwrap();

        let role = s.join("p2").unwrap();
        assert_eq!(role, Player::White);
        assert_eq!(s.game().move_log().len(), 1);
    }

    #[test]
    fn test_waiting_refuses_moves() {
        let mut s = session();
        s.join("p1").unwrap();
        assert_eq!(s.status(), SessionStatus::WaitingForOpponent);
        assert_eq!(
            s.apply_move(Player::Black, 7, 7),
            Err(MoveError::GameNotActive)
        );
    }

    #[test]
    fn test_out_of_range_rejected_before_engine() {
        let mut s = session();
        s.join("p1").unwrap();
        s.join("p2").unwrap();
        assert!(matches!(
            s.apply_move(Player::Black, 15, 0),
            Err(MoveError::OutOfRange { .. })
        ));
        assert!(s.game().move_log().is_empty());
    }

    #[test]
    fn test_delta_carries_sequence_and_turn() {
        let mut s = session();
        s.join("p1").unwrap();
        s.join("p2").unwrap();

        let delta = s.apply_move(Player::Black, 7, 7).unwrap();
        assert_eq!(delta.mv.sequence, 0);
        assert_eq!(delta.next_turn, Player::White);
        assert_eq!(delta.status, SessionStatus::InProgress);
    }

    #[test]
    fn test_restart_keeps_seats() {
        let mut s = session();
        s.join("p1").unwrap();
        s.join("p2").unwrap();
        s.apply_move(Player::Black, 7, 7).unwrap();
        s.restart();
        assert_eq!(s.status(), SessionStatus::InProgress);
        assert_eq!(s.seat(Player::Black), Some("p1"));
        assert_eq!(s.seat(Player::White), Some("p2"));
        assert!(s.game().move_log().is_empty());
    }

    #[test]
    fn test_second_joiner_gets_remaining_role() {
        fn white_first() -> Player {
            Player::White
        }
        let mut s = GameSession::with_role_policy("fghij".to_string(), white_first);
        assert_eq!(s.join("p1").unwrap(), Player::White);
        assert_eq!(s.join("p2").unwrap(), Player::Black);
    }
}

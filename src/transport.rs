//! Transport-agnostic protocol types and the connection abstraction.
//!
//! Room and session logic never touch a socket: they hand
//! [`ServerMessage`]s to a [`ConnectionSink`], an ordered reliable
//! channel to one participant. The WebSocket layer and the tests both
//! implement it with [`ChannelSink`].

use crate::games::gomoku::{MoveError, Player};
use crate::session::{RoomId, SessionStatus, StateDelta};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Messages a participant sends to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join (or rejoin) a room with a participant identity.
    Join {
        /// Target room.
        room_id: RoomId,
        /// Opaque participant identity, stable across reconnects.
        identity: String,
    },
    /// Place a stone.
    Move {
        /// Target room.
        room_id: RoomId,
        /// The role this participant plays as.
        role: Player,
        /// Row index (0-14).
        row: u8,
        /// Column index (0-14).
        col: u8,
    },
    /// Reset the room's game for a rematch.
    Restart {
        /// Target room.
        room_id: RoomId,
    },
}

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// A coordinate was outside 0-14.
    OutOfRange,
    /// The target cell already holds a stone.
    CellOccupied,
    /// It was not the sender's turn.
    NotYourTurn,
    /// The game is terminal or the opponent has not joined.
    GameNotActive,
}

impl From<MoveError> for RejectReason {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::OutOfRange { .. } => RejectReason::OutOfRange,
            MoveError::CellOccupied => RejectReason::CellOccupied,
            MoveError::NotYourTurn(_) => RejectReason::NotYourTurn,
            MoveError::GameNotActive => RejectReason::GameNotActive,
        }
    }
}

/// Messages the server sends to participants.
///
/// `MoveApplied` is broadcast identically to both participants in
/// apply order; rejections go only to the offending sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Reply to a successful join.
    Joined {
        /// The room joined.
        room_id: RoomId,
        /// The role assigned (or re-bound) to the participant.
        role: Player,
        /// Session status at join time.
        status: SessionStatus,
    },
    /// A move was committed.
    MoveApplied {
        /// Row of the placed stone.
        row: u8,
        /// Column of the placed stone.
        col: u8,
        /// Who placed it.
        role: Player,
        /// Server-assigned order of the move.
        sequence: u32,
        /// Whose turn it is now.
        next_turn: Player,
        /// Session status after the move.
        status: SessionStatus,
    },
    /// A move was refused; sent only to the sender.
    MoveRejected {
        /// Why the move was refused.
        reason: RejectReason,
    },
    /// The room's game was reset for a rematch.
    GameReset,
    /// Request-level failure (unknown room, room full, malformed frame).
    Error {
        /// Human-readable description.
        message: String,
    },
}

impl ServerMessage {
    /// Builds the broadcast message for an applied move.
    pub fn move_applied(delta: &StateDelta) -> Self {
        ServerMessage::MoveApplied {
            row: delta.mv.position.row(),
            col: delta.mv.position.col(),
            role: delta.mv.player,
            sequence: delta.mv.sequence,
            next_turn: delta.next_turn,
            status: delta.status,
        }
    }
}

/// Transport failure surfaced to the room layer.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum TransportError {
    /// The participant's connection is gone; the message was dropped.
    #[display("Connection closed")]
    ConnectionClosed,
}

impl std::error::Error for TransportError {}

/// An ordered, reliable, non-blocking channel to one participant.
///
/// Implementations must deliver messages in send order. Sending never
/// blocks the room layer; a dead connection reports
/// [`TransportError::ConnectionClosed`] and is detached by the caller.
pub trait ConnectionSink: Send + Sync {
    /// Enqueues a message for delivery.
    fn send(&self, msg: &ServerMessage) -> Result<(), TransportError>;
}

/// In-process [`ConnectionSink`] backed by an unbounded channel.
///
/// The WebSocket writer task drains the receiving half; tests read it
/// directly.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ServerMessage>,
}

impl ChannelSink {
    /// Creates a sink and the receiver that drains it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ConnectionSink for ChannelSink {
    fn send(&self, msg: &ServerMessage) -> Result<(), TransportError> {
        self.tx
            .send(msg.clone())
            .map_err(|_| TransportError::ConnectionClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_tags() {
        let msg = ClientMessage::Move {
            room_id: "abcde".to_string(),
            role: Player::Black,
            row: 7,
            col: 7,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"move""#));
        assert!(json.contains(r#""role":"black""#));

        let back: ClientMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_join_parses_from_wire() {
        let json = r#"{"type":"join","room_id":"abcde","identity":"p1"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Join {
                room_id: "abcde".to_string(),
                identity: "p1".to_string(),
            }
        );
    }

    #[test]
    fn test_reject_reason_tags() {
        let json = serde_json::to_string(&RejectReason::NotYourTurn).unwrap();
        assert_eq!(json, r#""not_your_turn""#);
        assert_eq!(
            RejectReason::from(MoveError::CellOccupied),
            RejectReason::CellOccupied
        );
    }

    #[test]
    fn test_game_reset_tag() {
        let json = serde_json::to_string(&ServerMessage::GameReset).unwrap();
        assert_eq!(json, r#"{"type":"game_reset"}"#);
    }

    #[test]
    fn test_channel_sink_preserves_order() {
        let (sink, mut rx) = ChannelSink::new();
        sink.send(&ServerMessage::GameReset).unwrap();
        sink.send(&ServerMessage::MoveRejected {
            reason: RejectReason::OutOfRange,
        })
        .unwrap();

        assert_eq!(rx.try_recv().unwrap(), ServerMessage::GameReset);
        assert_eq!(
            rx.try_recv().unwrap(),
            ServerMessage::MoveRejected {
                reason: RejectReason::OutOfRange,
            }
        );
    }

    #[test]
    fn test_closed_sink_reports_error() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        assert_eq!(
            sink.send(&ServerMessage::GameReset),
            Err(TransportError::ConnectionClosed)
        );
    }
}

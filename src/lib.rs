//! Gomoku Rooms library - server-authoritative five-in-a-row
//!
//! Two remote participants share a room and play on a 15x15 board. The
//! server owns the only authoritative game state: it enforces turn
//! order and move legality, detects wins after every move, and assigns
//! each applied move a sequence number that totally orders the match.
//! Clients converge by rendering the broadcast deltas in order.
//!
//! # Architecture
//!
//! - **Engine**: pure gomoku rules (board, win scan, draw, move log)
//! - **Session**: seat binding per room, rejoin with a stable role
//! - **Registry**: one session per room id, dispatch and broadcast
//! - **Transport**: JSON message taxonomy over an ordered sink
//!   abstraction; the WebSocket layer is one implementation of it
//!
//! # Example
//!
//! ```
//! use gomoku_rooms::{GameSession, Player, SessionStatus};
//!
//! let mut session = GameSession::with_role_policy("abcde".to_string(), || Player::Black);
//! let black = session.join("p1").unwrap();
//! let white = session.join("p2").unwrap();
//! assert_ne!(black, white);
//!
//! let delta = session.apply_move(black, 7, 7).unwrap();
//! assert_eq!(delta.mv.sequence, 0);
//! assert_eq!(delta.status, SessionStatus::InProgress);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod config;
mod games;
mod registry;
mod server;
mod session;
mod transport;

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - Config
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Game engine
pub use games::gomoku::{
    BOARD_SIZE, Board, BoardError, Cell, Game, GameStatus, Move, MoveError, Player, Position,
    WIN_LENGTH, rules,
};

// Crate-level exports - Session management
pub use session::{
    GameSession, ParticipantId, RolePolicy, RoomId, SessionError, SessionStatus, StateDelta,
    coin_flip_role,
};

// Crate-level exports - Room registry
pub use registry::{ConnectionId, Joined, RoomError, RoomRegistry, RoomSummary};

// Crate-level exports - Transport
pub use transport::{
    ChannelSink, ClientMessage, ConnectionSink, RejectReason, ServerMessage, TransportError,
};

// Crate-level exports - Server wiring
pub use server::{router, serve};

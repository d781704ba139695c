//! Room registry: maps room ids to sessions and their live connections.
//!
//! The registry is the only component that creates or destroys
//! sessions. All mutation of a room happens under the registry lock,
//! so moves and joins within one room are processed strictly
//! one-at-a-time in arrival order; rooms are independent of each other.

use crate::games::gomoku::{MoveError, Player};
use crate::session::{
    GameSession, RolePolicy, RoomId, SessionError, SessionStatus, StateDelta, coin_flip_role,
};
use crate::transport::{ConnectionSink, ServerMessage};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Identifies one attached connection within a room.
pub type ConnectionId = u64;

/// Length of generated room id tokens.
const ROOM_ID_LENGTH: usize = 6;

/// Charset for room id tokens: lowercase base-36, URL-safe.
const ROOM_ID_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Error raised by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum RoomError {
    /// No session exists for the given room id.
    #[display("Unknown room")]
    #[from(ignore)]
    UnknownRoom,
    /// Joining failed.
    #[display("{}", _0)]
    Join(SessionError),
    /// The move was rejected.
    #[display("{}", _0)]
    Move(MoveError),
}

impl std::error::Error for RoomError {}

/// Summary of one room for listings.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    /// The room id.
    pub room_id: RoomId,
    /// Number of bound seats (0-2).
    pub seats: usize,
    /// Number of live connections.
    pub connections: usize,
    /// Session status.
    pub status: SessionStatus,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

/// Result of attaching a participant to a room.
#[derive(Debug)]
pub struct Joined {
    /// Handle for detaching this connection later.
    pub connection_id: ConnectionId,
    /// The role bound to the participant's identity.
    pub role: Player,
    /// Session status right after the join.
    pub status: SessionStatus,
}

/// One room: its session plus the connections currently bound to it.
struct Room {
    session: GameSession,
    connections: HashMap<ConnectionId, Box<dyn ConnectionSink>>,
    last_activity: Instant,
}

impl Room {
    fn new(session: GameSession) -> Self {
        Self {
            session,
            connections: HashMap::new(),
            last_activity: Instant::now(),
        }
    }

    /// Sends `msg` to every attached connection, pruning dead ones.
    fn broadcast(&mut self, msg: &ServerMessage) {
        let dead: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|(_, sink)| sink.send(msg).is_err())
            .map(|(id, _)| *id)
            .collect();
        for id in dead {
            debug!(connection_id = id, "Pruning dead connection");
            self.connections.remove(&id);
        }
    }
}

/// Manages all rooms.
///
/// Cloning shares the underlying map, so the WebSocket handlers and
/// the eviction task operate on the same registry.
#[derive(Clone)]
pub struct RoomRegistry {
    rooms: Arc<Mutex<HashMap<RoomId, Room>>>,
    next_connection: Arc<AtomicU64>,
    role_policy: RolePolicy,
}

impl RoomRegistry {
    /// Creates a registry with coin-flip first-seat assignment.
    #[instrument]
    pub fn new() -> Self {
        Self::with_role_policy(coin_flip_role)
    }

    /// Creates a registry with an explicit first-seat policy.
    pub fn with_role_policy(role_policy: RolePolicy) -> Self {
        info!("Creating room registry");
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            next_connection: Arc::new(AtomicU64::new(0)),
            role_policy,
        }
    }

    /// Creates a room under a freshly generated id and returns the id.
    ///
    /// Generated tokens are 6 lowercase base-36 characters; a
    /// collision with a live room draws another token.
    #[instrument(skip(self))]
    pub fn create_room(&self) -> RoomId {
        let mut rooms = self.rooms.lock().unwrap();
        let room_id = loop {
            let candidate = generate_room_id();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
            debug!(%candidate, "Room id collision, regenerating");
        };
        let session = GameSession::with_role_policy(room_id.clone(), self.role_policy);
        rooms.insert(room_id.clone(), Room::new(session));
        info!(room_id = %room_id, "Created room");
        room_id
    }

    /// Returns a snapshot of the room's session, creating the room if
    /// it does not exist yet.
    #[instrument(skip(self))]
    pub fn get_or_create(&self, room_id: &str) -> GameSession {
        let mut rooms = self.rooms.lock().unwrap();
        rooms
            .entry(room_id.to_string())
            .or_insert_with(|| {
                Room::new(GameSession::with_role_policy(
                    room_id.to_string(),
                    self.role_policy,
                ))
            })
            .session
            .clone()
    }

    /// Seats `identity` in `room_id` and attaches `sink` for broadcasts.
    ///
    /// The room is created on first join (the original flow: the first
    /// participant brings the id from the share link). The sink
    /// receives the `joined` reply followed by a replay of every
    /// applied move, so a reconnecting participant converges through
    /// the same deltas a live one rendered.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::Join`] if a third distinct identity tries
    /// to enter.
    #[instrument(skip(self, sink))]
    pub fn join(
        &self,
        room_id: &str,
        identity: &str,
        sink: Box<dyn ConnectionSink>,
    ) -> Result<Joined, RoomError> {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.entry(room_id.to_string()).or_insert_with(|| {
            Room::new(GameSession::with_role_policy(
                room_id.to_string(),
                self.role_policy,
            ))
        });
        room.last_activity = Instant::now();

        let role = room.session.join(identity)?;
        let status = room.session.status();

        sink.send(&ServerMessage::Joined {
            room_id: room_id.to_string(),
            role,
            status,
        })
        .ok();
        replay_move_log(&room.session, sink.as_ref());

        let connection_id = self.next_connection.fetch_add(1, Ordering::Relaxed);
        room.connections.insert(connection_id, sink);
        info!(room_id, identity, %role, connection_id, "Participant joined");

        Ok(Joined {
            connection_id,
            role,
            status,
        })
    }

    /// Applies a move and broadcasts the resulting delta to the room.
    ///
    /// The lock is held across validate, apply, and broadcast, so
    /// every connection observes the same delta order. On rejection
    /// nothing is broadcast; the caller replies to the sender alone.
    ///
    /// # Errors
    ///
    /// [`RoomError::UnknownRoom`] if no session exists for `room_id`,
    /// otherwise [`RoomError::Move`] wrapping the engine's rejection.
    #[instrument(skip(self))]
    pub fn dispatch(
        &self,
        room_id: &str,
        role: Player,
        row: u8,
        col: u8,
    ) -> Result<StateDelta, RoomError> {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.get_mut(room_id).ok_or(RoomError::UnknownRoom)?;
        room.last_activity = Instant::now();

        let delta = room.session.apply_move(role, row, col).inspect_err(|err| {
            warn!(room_id, %role, row, col, %err, "Move rejected");
        })?;
        room.broadcast(&ServerMessage::move_applied(&delta));
        Ok(delta)
    }

    /// Resets a room's game and broadcasts `game_reset`.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::UnknownRoom`] if no session exists.
    #[instrument(skip(self))]
    pub fn restart(&self, room_id: &str) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.get_mut(room_id).ok_or(RoomError::UnknownRoom)?;
        room.last_activity = Instant::now();
        room.session.restart();
        room.broadcast(&ServerMessage::GameReset);
        Ok(())
    }

    /// Detaches a connection after its transport dropped.
    ///
    /// Seat bindings are untouched; the participant rejoins with the
    /// same identity to resume.
    #[instrument(skip(self))]
    pub fn detach(&self, room_id: &str, connection_id: ConnectionId) {
        let mut rooms = self.rooms.lock().unwrap();
        if let Some(room) = rooms.get_mut(room_id) {
            room.connections.remove(&connection_id);
            room.last_activity = Instant::now();
            debug!(room_id, connection_id, "Connection detached");
        }
    }

    /// Removes rooms with zero connections idle for longer than `ttl`.
    ///
    /// Returns the number of rooms evicted.
    #[instrument(skip(self))]
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let mut rooms = self.rooms.lock().unwrap();
        let before = rooms.len();
        rooms.retain(|room_id, room| {
            let keep = !room.connections.is_empty() || room.last_activity.elapsed() <= ttl;
            if !keep {
                info!(%room_id, "Evicting idle room");
            }
            keep
        });
        before - rooms.len()
    }

    /// Lists all rooms with seat occupancy and status.
    #[instrument(skip(self))]
    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.lock().unwrap();
        rooms
            .iter()
            .map(|(room_id, room)| RoomSummary {
                room_id: room_id.clone(),
                seats: room.session.seat_count(),
                connections: room.connections.len(),
                status: room.session.status(),
                created_at: room.session.created_at(),
            })
            .collect()
    }

    /// Returns the number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.lock().unwrap().len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Replays the session's move log to one sink so a late or
/// reconnecting participant catches up through ordinary deltas.
fn replay_move_log(session: &GameSession, sink: &dyn ConnectionSink) {
    let log = session.game().move_log();
    for (i, mv) in log.iter().enumerate() {
        let last = i + 1 == log.len();
        let msg = ServerMessage::MoveApplied {
            row: mv.position.row(),
            col: mv.position.col(),
            role: mv.player,
            sequence: mv.sequence,
            next_turn: if last {
                session.game().to_move()
            } else {
                mv.player.opponent()
            },
            status: if last {
                session.status()
            } else {
                SessionStatus::InProgress
            },
        };
        if sink.send(&msg).is_err() {
            break;
        }
    }
}

/// Draws a random room id token.
fn generate_room_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ROOM_ID_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..ROOM_ID_CHARSET.len());
            ROOM_ID_CHARSET[idx] as char
        })
        .collect()
}

//! WebSocket and REST wiring for the room registry.
//!
//! One WebSocket connection carries one participant. Frames are JSON
//! [`ClientMessage`]s; replies and broadcasts are [`ServerMessage`]s
//! drained from the connection's [`ChannelSink`] by a writer task, so
//! delivery order matches apply order.

use crate::config::ServerConfig;
use crate::games::gomoku::Player;
use crate::registry::{ConnectionId, RoomError, RoomRegistry, RoomSummary};
use crate::session::RoomId;
use crate::transport::{ChannelSink, ClientMessage, ConnectionSink, RejectReason, ServerMessage};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Reply to `POST /rooms`.
#[derive(Debug, Serialize)]
struct CreatedRoom {
    room_id: RoomId,
}

/// Builds the application router.
pub fn router(registry: RoomRegistry) -> Router {
    Router::new()
        .route("/rooms", post(create_room).get(list_rooms))
        .route("/ws", get(ws_upgrade))
        .with_state(registry)
}

/// Runs the server until shutdown, with the eviction sweep alongside.
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let registry = RoomRegistry::new();
    spawn_eviction_task(registry.clone(), &config);

    let app = router(registry);
    let listener =
        tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at http://{}:{}/", config.host(), config.port());
    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically evicts rooms nobody is connected to.
///
/// Room expiry is a policy addition over the core protocol; the knobs
/// live in [`ServerConfig`] and the pure registry never self-expires.
fn spawn_eviction_task(registry: RoomRegistry, config: &ServerConfig) {
    let ttl = config.idle_room_ttl();
    let period = config.eviction_interval();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let evicted = registry.evict_idle(ttl);
            if evicted > 0 {
                info!(evicted, "Idle rooms evicted");
            }
        }
    });
}

#[instrument(skip(registry))]
async fn create_room(State(registry): State<RoomRegistry>) -> Json<CreatedRoom> {
    let room_id = registry.create_room();
    Json(CreatedRoom { room_id })
}

#[instrument(skip(registry))]
async fn list_rooms(State(registry): State<RoomRegistry>) -> Json<Vec<RoomSummary>> {
    Json(registry.list_rooms())
}

async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(registry): State<RoomRegistry>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, registry))
}

/// The participant this socket is bound to after a successful join.
struct Binding {
    room_id: RoomId,
    connection_id: ConnectionId,
    role: Player,
}

/// Drives one participant connection to completion.
async fn handle_socket(socket: WebSocket, registry: RoomRegistry) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (sink, mut outbound) = ChannelSink::new();

    // Writer task: drain the sink into the socket in send order.
    let writer = tokio::spawn(async move {
        while let Some(msg) = outbound.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(err) => {
                    warn!(%err, "Failed to encode server message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut binding: Option<Binding> = None;

    while let Some(Ok(frame)) = ws_rx.next().await {
        let Message::Text(text) = frame else {
            continue;
        };
        match serde_json::from_str::<ClientMessage>(&text) {
            Ok(msg) => handle_message(&registry, &sink, &mut binding, msg),
            Err(err) => {
                debug!(%err, "Malformed client frame");
                sink.send(&ServerMessage::Error {
                    message: format!("Malformed message: {}", err),
                })
                .ok();
            }
        }
    }

    if let Some(binding) = binding {
        registry.detach(&binding.room_id, binding.connection_id);
    }
    writer.abort();
}

/// Applies one client message against the registry.
///
/// The registry handles broadcasts; rejections and errors go back
/// through this connection's sink only.
fn handle_message(
    registry: &RoomRegistry,
    sink: &ChannelSink,
    binding: &mut Option<Binding>,
    msg: ClientMessage,
) {
    match msg {
        ClientMessage::Join { room_id, identity } => {
            // A re-join on the same socket supersedes the old binding.
            if let Some(old) = binding.take() {
                registry.detach(&old.room_id, old.connection_id);
            }
            match registry.join(&room_id, &identity, Box::new(sink.clone())) {
                Ok(joined) => {
                    *binding = Some(Binding {
                        room_id,
                        connection_id: joined.connection_id,
                        role: joined.role,
                    });
                }
                Err(err) => {
                    sink.send(&ServerMessage::Error {
                        message: err.to_string(),
                    })
                    .ok();
                }
            }
        }
        ClientMessage::Move {
            room_id,
            role,
            row,
            col,
        } => {
            // The role a connection plays as is fixed at join time; a
            // frame claiming the opponent's role is rejected without
            // consulting the engine.
            let bound_role = binding.as_ref().map(|b| b.role);
            if bound_role != Some(role) {
                warn!(%room_id, claimed = %role, ?bound_role, "Role mismatch on move");
                sink.send(&ServerMessage::MoveRejected {
                    reason: RejectReason::NotYourTurn,
                })
                .ok();
                return;
            }
            match registry.dispatch(&room_id, role, row, col) {
                Ok(_) => {}
                Err(RoomError::Move(err)) => {
                    sink.send(&ServerMessage::MoveRejected { reason: err.into() })
                        .ok();
                }
                Err(err) => {
                    sink.send(&ServerMessage::Error {
                        message: err.to_string(),
                    })
                    .ok();
                }
            }
        }
        ClientMessage::Restart { room_id } => {
            if let Err(err) = registry.restart(&room_id) {
                sink.send(&ServerMessage::Error {
                    message: err.to_string(),
                })
                .ok();
            }
        }
    }
}

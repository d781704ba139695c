//! Wire-format tests for the client/server message taxonomy.

use gomoku_rooms::{
    ChannelSink, ClientMessage, Player, RoomRegistry, ServerMessage, SessionStatus,
};

fn black_first() -> Player {
    Player::Black
}

#[test]
fn test_move_applied_wire_shape() {
    let registry = RoomRegistry::with_role_policy(black_first);
    let (sink1, _rx1) = ChannelSink::new();
    let (sink2, mut rx2) = ChannelSink::new();
    registry.join("abcde", "p1", Box::new(sink1)).unwrap();
    registry.join("abcde", "p2", Box::new(sink2)).unwrap();
    registry.dispatch("abcde", Player::Black, 7, 3).unwrap();

    // Skip joined, take the broadcast delta.
    let _ = rx2.try_recv().unwrap();
    let delta = rx2.try_recv().unwrap();
    let json: serde_json::Value = serde_json::to_value(&delta).unwrap();

    assert_eq!(json["type"], "move_applied");
    assert_eq!(json["row"], 7);
    assert_eq!(json["col"], 3);
    assert_eq!(json["role"], "black");
    assert_eq!(json["sequence"], 0);
    assert_eq!(json["next_turn"], "white");
    assert_eq!(json["status"], "in_progress");
}

#[test]
fn test_won_status_wire_shape() {
    let msg = ServerMessage::MoveApplied {
        row: 7,
        col: 4,
        role: Player::Black,
        sequence: 8,
        next_turn: Player::Black,
        status: SessionStatus::Won(Player::Black),
    };
    let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["status"]["won"], "black");
}

#[test]
fn test_client_messages_parse_from_raw_json() {
    let join: ClientMessage =
        serde_json::from_str(r#"{"type":"join","room_id":"abcde","identity":"p1"}"#).unwrap();
    assert!(matches!(join, ClientMessage::Join { .. }));

    let mv: ClientMessage = serde_json::from_str(
        r#"{"type":"move","room_id":"abcde","role":"white","row":0,"col":14}"#,
    )
    .unwrap();
    assert_eq!(
        mv,
        ClientMessage::Move {
            room_id: "abcde".to_string(),
            role: Player::White,
            row: 0,
            col: 14,
        }
    );

    let restart: ClientMessage =
        serde_json::from_str(r#"{"type":"restart","room_id":"abcde"}"#).unwrap();
    assert_eq!(
        restart,
        ClientMessage::Restart {
            room_id: "abcde".to_string(),
        }
    );
}

#[test]
fn test_rejection_reasons_serialize_as_documented() {
    use gomoku_rooms::RejectReason;

    let reasons = [
        (RejectReason::OutOfRange, "out_of_range"),
        (RejectReason::CellOccupied, "cell_occupied"),
        (RejectReason::NotYourTurn, "not_your_turn"),
        (RejectReason::GameNotActive, "game_not_active"),
    ];
    for (reason, expected) in reasons {
        let msg = ServerMessage::MoveRejected { reason };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "move_rejected");
        assert_eq!(json["reason"], expected);
    }
}

#[test]
fn test_room_listing_shape() {
    let registry = RoomRegistry::with_role_policy(black_first);
    let (sink, _rx) = ChannelSink::new();
    registry.join("abcde", "p1", Box::new(sink)).unwrap();

    let listing = registry.list_rooms();
    assert_eq!(listing.len(), 1);
    let json: serde_json::Value = serde_json::to_value(&listing[0]).unwrap();
    assert_eq!(json["room_id"], "abcde");
    assert_eq!(json["seats"], 1);
    assert_eq!(json["connections"], 1);
    assert_eq!(json["status"], "waiting_for_opponent");
}

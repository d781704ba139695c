//! Tests for gomoku win detection through the public API.

use gomoku_rooms::rules::check_win;
use gomoku_rooms::{Board, Player, Position};

fn pos(row: u8, col: u8) -> Position {
    Position::try_new(row, col).unwrap()
}

#[test]
fn test_five_in_a_row_wins() {
    let mut board = Board::new();
    for col in 0..5 {
        board.place(pos(7, col), Player::Black).unwrap();
    }
    assert!(check_win(&board, pos(7, 4), Player::Black));
}

#[test]
fn test_broken_line_is_not_a_win() {
    let mut board = Board::new();
    // Same five cells, but one belongs to the opponent.
    for col in [0, 1, 3, 4] {
        board.place(pos(7, col), Player::Black).unwrap();
    }
    board.place(pos(7, 2), Player::White).unwrap();
    assert!(!check_win(&board, pos(7, 4), Player::Black));
}

#[test]
fn test_all_four_axes_win() {
    let lines: [[(u8, u8); 5]; 4] = [
        [(7, 0), (7, 1), (7, 2), (7, 3), (7, 4)],
        [(0, 7), (1, 7), (2, 7), (3, 7), (4, 7)],
        [(2, 2), (3, 3), (4, 4), (5, 5), (6, 6)],
        [(10, 2), (9, 3), (8, 4), (7, 5), (6, 6)],
    ];
    for line in lines {
        let mut board = Board::new();
        for (row, col) in line {
            board.place(pos(row, col), Player::White).unwrap();
        }
        let (row, col) = line[4];
        assert!(
            check_win(&board, pos(row, col), Player::White),
            "line {:?} should win",
            line
        );
    }
}

#[test]
fn test_win_only_counts_consecutive_stones() {
    let mut board = Board::new();
    // Five stones on the row, but with a one-cell gap.
    for col in [0, 1, 2, 3, 5] {
        board.place(pos(7, col), Player::Black).unwrap();
    }
    assert!(!check_win(&board, pos(7, 5), Player::Black));
    assert!(!check_win(&board, pos(7, 3), Player::Black));
}

#[test]
fn test_occupied_cell_is_permanent() {
    let mut board = Board::new();
    board.place(pos(7, 7), Player::Black).unwrap();
    assert!(board.place(pos(7, 7), Player::Black).is_err());
    assert!(board.place(pos(7, 7), Player::White).is_err());

    board.reset();
    assert!(board.is_empty(pos(7, 7)));
}

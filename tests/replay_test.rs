//! Integration tests: advance the example game to intermediate and final positions.

mod common;

use common::{c, example_game, parse, piece_at};
use icn_core::{
    advance_position, to_notation, Color, Compactness, Halfmoves, MoveRule, WriteOptions,
};

#[test]
fn test_before_last_move() {
    let record = example_game();
    let out = advance_position(&record, Halfmoves::Count(21)).unwrap();

    assert!(out.moves.is_empty());
    assert_eq!(out.turn, Color::Black);
    assert_eq!(out.full_move, Some(11));
    assert_eq!(out.move_rule, Some(MoveRule::new(0, 100)));
    assert_eq!(out.enpassant, Some(c(8, 3)));

    assert_eq!(piece_at(&out, 8, 4).as_deref(), Some("pawnsW"));
    assert_eq!(piece_at(&out, 6, 8).as_deref(), Some("rooksB"));
    assert_eq!(piece_at(&out, 7, 7).as_deref(), Some("kingsB"));
    assert_eq!(piece_at(&out, 0, 4).as_deref(), Some("queensB"));
    assert_eq!(piece_at(&out, 4, 4), None);
    // taken en passant
    assert_eq!(piece_at(&out, 3, 5), None);
    assert_eq!(piece_at(&out, 8, 8), None);

    let rights = &out.special_rights;
    assert!(rights.contains(&c(1, 1)) && rights.contains(&c(8, 1)));
    assert!(!rights.contains(&c(5, 8)) && !rights.contains(&c(8, 8)));
    assert!(!rights.contains(&c(8, 2)));

    // The input keeps its moves.
    assert_eq!(record.moves.len(), 22);
}

#[test]
fn test_final_position() {
    let out = advance_position(&example_game(), Halfmoves::All).unwrap();

    assert_eq!(out.turn, Color::White);
    assert_eq!(out.full_move, Some(12));
    assert_eq!(out.move_rule, Some(MoveRule::new(1, 100)));
    assert_eq!(out.enpassant, None);
    assert_eq!(piece_at(&out, 4, 4).as_deref(), Some("queensB"));
    assert_eq!(piece_at(&out, 0, 4), None);

    // Past the end is the same as all of it.
    let past = advance_position(&example_game(), Halfmoves::Count(500)).unwrap();
    assert_eq!(past, out);
}

#[test]
fn test_zero_halfmoves() {
    let record = example_game();
    let out = advance_position(&record, Halfmoves::from(0)).unwrap();

    assert_eq!(out.starting_position, record.starting_position);
    assert_eq!(out.special_rights, record.special_rights);
    assert_eq!(out.turn, record.turn);
    assert_eq!(out.full_move, record.full_move);
    assert_eq!(out.move_rule, record.move_rule);
    assert!(out.moves.is_empty());
}

#[test]
fn test_advanced_position_round_trips() {
    let out = advance_position(&example_game(), Halfmoves::Count(21)).unwrap();
    let text = to_notation(&out, &WriteOptions::new(Compactness::Nice, false)).unwrap();

    assert!(text.contains("b 8,3 0/100 11 "), "{text}");
    assert_eq!(parse(&text), out);
}

use super::*;
use crate::movegen::legal_moves;
use crate::moves::parse_move;

fn fen(s: &str) -> Position {
    Position::from_fen(s).unwrap()
}

fn play_all(pos: &Position, moves: &[&str]) -> Position {
    moves.iter().fold(pos.clone(), |p, m| {
        let mv = parse_move(&p, m).unwrap();
        p.play(mv).unwrap()
    })
}

#[test]
fn test_startpos_matches_start_fen() {
    let start = Position::startpos();
    assert_eq!(start.to_fen(), START_FEN);
    assert_eq!(fen(START_FEN), start);
    assert_eq!(start.hash(), start.compute_hash());
}

#[test]
fn test_fen_round_trip() {
    let fens = [
        START_FEN,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        "4k3/8/8/8/8/8/8/4K3 b - - 37 90",
    ];
    for f in fens {
        assert_eq!(fen(f).to_fen(), f);
    }
}

#[test]
fn test_fen_clock_fields_optional() {
    let pos = fen("4k3/8/8/8/8/8/8/4K3 w - -");
    assert_eq!(pos.halfmove_clock(), 0);
    assert_eq!(pos.fullmove_number(), 1);
}

#[test]
fn test_fen_rejects_garbage() {
    let bad = [
        "",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
        "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkX - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1",
        "rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - zero 1",
    ];
    for f in bad {
        assert!(
            matches!(Position::from_fen(f), Err(EngineError::InvalidFen { .. })),
            "{f:?} should be rejected"
        );
    }
}

#[test]
fn test_validate_rejects_impossible_positions() {
    let bad = [
        // No black king
        "8/8/8/8/8/8/8/4K3 w - - 0 1",
        // Two white kings
        "4k3/8/8/8/8/8/8/3KK3 w - - 0 1",
        // Pawn on the back rank
        "P3k3/8/8/8/8/8/8/4K3 w - - 0 1",
        // Castling right with the rook gone
        "4k3/8/8/8/8/8/8/4K3 w K - 0 1",
        // Side not to move is in check
        "4k3/8/8/8/8/8/8/4R1K1 w - - 0 1",
        // En-passant square on the wrong rank
        "4k3/8/8/8/8/8/8/4K3 w - e3 0 1",
    ];
    for f in bad {
        assert!(
            matches!(Position::from_fen(f), Err(EngineError::InvalidPosition(_))),
            "{f:?} should be rejected"
        );
    }
}

#[test]
fn test_en_passant_square_needs_a_pushed_pawn() {
    let bad = [
        // Knight where the pushed pawn should be
        "4k3/8/8/3PN3/8/8/8/4K3 w - e6 0 1",
        // Own pawn behind the target
        "4k3/8/8/3PP3/8/8/8/4K3 w - e6 0 1",
        // Origin square still occupied
        "4k3/4p3/8/3Pp3/8/8/8/4K3 w - e6 0 1",
        // Black to move, nothing on e4
        "4k3/8/8/8/3p4/8/8/4K3 b - e3 0 1",
    ];
    for f in bad {
        assert!(
            matches!(Position::from_fen(f), Err(EngineError::InvalidPosition(_))),
            "{f:?} should be rejected"
        );
    }

    let pos = fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 1");
    let after = play_all(&pos, &["d5e6"]);
    assert_eq!(after.to_fen(), "4k3/8/4P3/8/8/8/8/4K3 b - - 0 1");
}

#[test]
fn test_huge_clocks_saturate() {
    let pos = fen("4k3/8/8/8/8/8/8/R3K3 b - - 4294967295 4294967295");
    let after = play_all(&pos, &["e8d8"]);
    assert_eq!(after.halfmove_clock(), u32::MAX);
    assert_eq!(after.fullmove_number(), u32::MAX);
    assert_eq!(after.hash(), after.compute_hash());
}

#[test]
fn test_make_unmake_restores_everything() {
    let mut pos = fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let before = pos.clone();
    for mv in legal_moves(&before) {
        let undo = pos.make_move(mv);
        assert_eq!(pos.hash(), pos.compute_hash(), "hash drift after {mv}");
        pos.unmake_move(mv, undo);
        assert_eq!(pos, before, "unmake of {mv} did not restore the position");
    }
}

#[test]
fn test_play_leaves_original_untouched() {
    let start = Position::startpos();
    let mv = parse_move(&start, "e2e4").unwrap();
    let next = start.play(mv).unwrap();
    assert_eq!(start, Position::startpos());
    assert_eq!(next.side_to_move(), Color::Black);
    assert_eq!(next.en_passant(), coord_to_sq("e3"));
    assert_eq!(
        next.piece_at(coord_to_sq("e4").unwrap()),
        Some(Piece::new(Color::White, PieceKind::Pawn))
    );
}

#[test]
fn test_castling_moves_rook_and_clears_rights() {
    let pos = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let after = play_all(&pos, &["e1g1"]);
    assert_eq!(after.piece_at(6), Some(Piece::new(Color::White, PieceKind::King)));
    assert_eq!(after.piece_at(5), Some(Piece::new(Color::White, PieceKind::Rook)));
    assert_eq!(after.piece_at(7), None);
    assert!(!after.castling().wk && !after.castling().wq);
    assert!(after.castling().bk && after.castling().bq);

    let after = play_all(&pos, &["e1g1", "e8c8"]);
    assert_eq!(after.piece_at(59), Some(Piece::new(Color::Black, PieceKind::Rook)));
    assert_eq!(after.castling().mask(), 0);
}

#[test]
fn test_capturing_rook_removes_castling_right() {
    let pos = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let after = play_all(&pos, &["a1a8"]);
    assert!(!after.castling().wq);
    assert!(!after.castling().bq);
    assert!(after.castling().bk);
}

#[test]
fn test_en_passant_capture_removes_pawn() {
    let pos = play_all(&Position::startpos(), &["e2e4", "a7a6", "e4e5", "d7d5", "e5d6"]);
    assert_eq!(pos.piece_at(coord_to_sq("d5").unwrap()), None);
    assert_eq!(
        pos.piece_at(coord_to_sq("d6").unwrap()),
        Some(Piece::new(Color::White, PieceKind::Pawn))
    );
    assert_eq!(pos.hash(), pos.compute_hash());
}

#[test]
fn test_promotion_and_clocks() {
    let pos = fen("7k/P7/8/8/8/8/8/K7 w - - 12 40");
    let after = play_all(&pos, &["a7a8q"]);
    assert_eq!(after.piece_at(56), Some(Piece::new(Color::White, PieceKind::Queen)));
    assert_eq!(after.halfmove_clock(), 0);
    assert_eq!(after.fullmove_number(), 40);

    let after = play_all(&after, &["h8h7"]);
    assert_eq!(after.halfmove_clock(), 1);
    assert_eq!(after.fullmove_number(), 41);
}

#[test]
fn test_same_position_same_hash_by_transposition() {
    let a = play_all(&Position::startpos(), &["g1f3", "g8f6", "b1c3"]);
    let b = play_all(&Position::startpos(), &["b1c3", "g8f6", "g1f3"]);
    assert_eq!(a.hash(), b.hash());
    assert_ne!(a.hash(), Position::startpos().hash());
}

#[test]
fn test_status_variants() {
    // Fool's mate
    let mated = play_all(&Position::startpos(), &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert_eq!(mated.status(), GameStatus::Checkmate);

    let stalemate = fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert_eq!(stalemate.status(), GameStatus::Stalemate);

    let fifty = fen("4k3/8/8/8/8/8/4P3/4K3 w - - 100 80");
    assert_eq!(fifty.status(), GameStatus::FiftyMoveRule);

    let bare = fen("4k3/8/8/8/8/8/8/4K1N1 w - - 0 1");
    assert_eq!(bare.status(), GameStatus::InsufficientMaterial);

    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    let twice: Vec<&str> = shuffle.iter().chain(shuffle.iter()).copied().collect();
    let repeated = play_all(&Position::startpos(), &twice);
    assert_eq!(repeated.repetition_count(), 2);
    assert_eq!(repeated.status(), GameStatus::ThreefoldRepetition);
    assert!(repeated.status().is_draw());
}

#[test]
fn test_same_colored_bishops_are_insufficient() {
    assert!(!fen("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1").is_insufficient_material());
    // c1 and f1 are opposite colors; a1 and c3 share one.
    assert!(fen("4k3/8/8/8/8/2B5/8/B3K3 w - - 0 1").is_insufficient_material());
}

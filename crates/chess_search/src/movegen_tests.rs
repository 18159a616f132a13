use super::*;
use crate::moves::MoveKind;

fn fen(s: &str) -> Position {
    Position::from_fen(s).unwrap()
}

#[test]
fn test_startpos_moves() {
    let moves = legal_moves(&Position::startpos());
    assert_eq!(moves.len(), 20);
    assert!(moves.iter().all(|m| m.kind() == MoveKind::Normal));
}

#[test]
fn test_kiwipete_moves() {
    let pos = fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -");
    let moves = legal_moves(&pos);
    assert_eq!(moves.len(), 48);
    assert_eq!(moves.iter().filter(|m| m.is_capture()).count(), 8);
    assert_eq!(moves.iter().filter(|m| m.is_castle()).count(), 2);
}

#[test]
fn test_promotion_generates_four_choices() {
    let pos = fen("8/P7/8/8/8/8/8/k6K w - - 0 1");
    let promos: Vec<_> = legal_moves(&pos)
        .into_iter()
        .filter(|m| m.is_promotion())
        .collect();
    assert_eq!(promos.len(), 4);
}

#[test]
fn test_castling_blocked_through_attacked_square() {
    // Black rook on f8 covers f1: no kingside castling, queenside still fine.
    let pos = fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    let moves = legal_moves(&pos);
    assert!(!moves.iter().any(|m| m.kind() == MoveKind::CastleKingside));
    assert!(moves.iter().any(|m| m.kind() == MoveKind::CastleQueenside));
}

#[test]
fn test_queenside_castle_allowed_with_b_file_attacked() {
    // Only b1 is attacked; the king never crosses it.
    let pos = fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
    assert!(legal_moves(&pos)
        .iter()
        .any(|m| m.kind() == MoveKind::CastleQueenside));
}

#[test]
fn test_no_castling_out_of_check() {
    let pos = fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    assert!(!legal_moves(&pos).iter().any(|m| m.is_castle()));
}

#[test]
fn test_en_passant_only_on_target_square() {
    let with_ep = fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
    assert!(legal_moves(&with_ep)
        .iter()
        .any(|m| m.kind() == MoveKind::EnPassant));

    let without_ep = fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 2");
    assert!(!legal_moves(&without_ep)
        .iter()
        .any(|m| m.kind() == MoveKind::EnPassant));
}

#[test]
fn test_en_passant_discovered_check_is_illegal() {
    // Capturing e.p. would expose the white king on a5 to the rook on h5.
    let pos = fen("8/8/8/KPp4r/8/8/8/4k3 w - c6 0 2");
    assert!(!legal_moves(&pos)
        .iter()
        .any(|m| m.kind() == MoveKind::EnPassant));
}

#[test]
fn test_pinned_piece_cannot_leave_line() {
    // Knight on e2 is pinned by the rook on e8.
    let pos = fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
    assert!(!legal_moves(&pos).iter().any(|m| m.from() == 12));
}

#[test]
fn test_tactical_moves_are_captures_or_promotions() {
    let mut pos = fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -");
    let mut out = Vec::new();
    legal_tactical_into(&mut pos, &mut out);
    assert_eq!(out.len(), 8);
    assert!(out.iter().all(|m| m.is_capture() || m.is_promotion()));
}

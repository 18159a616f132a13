use super::*;
use crate::movegen::legal_moves;
use crate::moves::parse_move;

fn fen(s: &str) -> Position {
    Position::from_fen(s).unwrap()
}

#[test]
fn test_hash_move_first_then_captures() {
    let mut pos = fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let mut moves = legal_moves(&pos);
    let hash_move = parse_move(&pos, "a2a3").unwrap();
    order_moves(&mut pos, &mut moves, Some(hash_move), [None; 2]);

    assert_eq!(moves[0], hash_move);
    // The eight captures come straight after.
    assert!(moves[1..9].iter().all(|m| m.is_capture()));
    assert!(moves[9..].iter().all(|m| !m.is_capture()));
}

#[test]
fn test_mvv_lva_prefers_big_victims_and_small_attackers() {
    // Pawn and queen can both take the rook on d5; knight and queen can take g5.
    let mut pos = fen("4k3/8/8/3r2p1/2P5/5N2/3Q4/4K3 w - - 0 1");
    let mut moves = legal_moves(&pos);
    order_moves(&mut pos, &mut moves, None, [None; 2]);

    assert_eq!(moves[0].to_notation(), "c4d5");
    assert_eq!(moves[1].to_notation(), "d2d5");
    assert_eq!(moves[2].to_notation(), "f3g5");
    assert_eq!(moves[3].to_notation(), "d2g5");
}

#[test]
fn test_checks_precede_killers_precede_quiets() {
    let mut pos = fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
    let mut moves = legal_moves(&pos);
    let killer = parse_move(&pos, "a1b1").unwrap();
    order_moves(&mut pos, &mut moves, None, [Some(killer), None]);

    // Only a1a8 gives check.
    assert_eq!(moves[0].to_notation(), "a1a8");
    assert_eq!(moves[1], killer);
}

#[test]
fn test_advancing_quiets_come_after_killers() {
    // The black king is walled in, so no white move checks or captures.
    let mut pos = fen("6bk/6pp/8/8/8/3R4/8/4K3 w - - 0 1");
    let mut moves = legal_moves(&pos);
    let killer = parse_move(&pos, "d3a3").unwrap();
    order_moves(&mut pos, &mut moves, None, [Some(killer), None]);
    assert_eq!(moves[0], killer);

    let rest: Vec<String> = moves[1..].iter().map(|m| m.to_notation()).collect();
    let split = rest
        .iter()
        .position(|m| !moves_up_the_board(m))
        .unwrap_or(rest.len());
    assert!(rest[split..].iter().all(|m| !moves_up_the_board(m)), "{rest:?}");
    assert_eq!(split, 8, "{rest:?}");
}

#[test]
fn test_black_advances_down_the_board() {
    let mut pos = fen("k7/8/8/8/8/3R4/8/4K3 b - - 0 1");
    let mut moves = legal_moves(&pos);
    order_moves(&mut pos, &mut moves, None, [None; 2]);
    let order: Vec<String> = moves.iter().map(|m| m.to_notation()).collect();
    assert_eq!(order.last().map(String::as_str), Some("a8b8"), "{order:?}");
}

fn moves_up_the_board(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes[3] > bytes[1]
}

#[test]
fn test_stable_for_equal_scores() {
    let mut pos = Position::startpos();
    let generated = legal_moves(&pos);
    let mut moves = generated.clone();
    order_moves(&mut pos, &mut moves, None, [None; 2]);
    assert_eq!(moves, generated);
    assert_eq!(pos, Position::startpos());
}

#[test]
fn test_promotions_rank_with_captures() {
    let pos = fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
    let mut captures: Vec<Move> = legal_moves(&pos)
        .into_iter()
        .filter(|m| !m.is_quiet())
        .collect();
    order_captures(&pos, &mut captures);
    assert_eq!(captures[0].promotion_piece(), Some(PieceKind::Queen));
    assert_eq!(captures.last().unwrap().promotion_piece(), Some(PieceKind::Knight));
}

#[test]
fn test_killers_shift_and_ignore_duplicates() {
    let pos = Position::startpos();
    let a = parse_move(&pos, "g1f3").unwrap();
    let b = parse_move(&pos, "b1c3").unwrap();
    let mut killers = Killers::new();
    killers.record(3, a);
    killers.record(3, a);
    assert_eq!(killers.get(3), [Some(a), None]);
    killers.record(3, b);
    assert_eq!(killers.get(3), [Some(b), Some(a)]);
    assert_eq!(killers.get(4), [None, None]);
    assert_eq!(killers.get(10_000), [None, None]);
}

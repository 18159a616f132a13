use super::*;

#[test]
fn test_knight_attacks() {
    // Knight on e4 (square 28) should attack 8 squares
    assert_eq!(knight_attacks(28).popcount(), 8);

    let attacks = knight_attacks(0);
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(10)); // c2
    assert!(attacks.contains(17)); // b3

    // h1 must not wrap onto the a-file
    let attacks = knight_attacks(7);
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(13)); // f2
    assert!(attacks.contains(22)); // g3
}

#[test]
fn test_king_attacks() {
    assert_eq!(king_attacks(28).popcount(), 8);
    assert_eq!(king_attacks(0).popcount(), 3);
    assert_eq!(king_attacks(63).popcount(), 3);
}

#[test]
fn test_pawn_attacks_by_color() {
    // White pawn on e4 attacks d5 and f5
    let attacks = pawn_attacks(28, Color::White);
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(35));
    assert!(attacks.contains(37));

    // Black pawn on e4 attacks d3 and f3
    let attacks = pawn_attacks(28, Color::Black);
    assert!(attacks.contains(19));
    assert!(attacks.contains(21));

    // White pawn on a2 attacks only b3
    let attacks = pawn_attacks(8, Color::White);
    assert_eq!(attacks.popcount(), 1);
    assert!(attacks.contains(17));
}

#[test]
fn test_slider_attacks_empty_board() {
    assert_eq!(rook_attacks(28, Bitboard::EMPTY).popcount(), 14);
    assert_eq!(bishop_attacks(28, Bitboard::EMPTY).popcount(), 13);
    assert_eq!(queen_attacks(28, Bitboard::EMPTY).popcount(), 27);
}

#[test]
fn test_rook_attacks_with_blockers() {
    // Rook on a1, blocker on a4
    let attacks = rook_attacks(0, Bitboard::from_square(24));
    assert!(attacks.contains(8)); // a2
    assert!(attacks.contains(16)); // a3
    assert!(attacks.contains(24)); // a4 (can capture)
    assert!(!attacks.contains(32)); // a5 (blocked)
    assert!(attacks.contains(7)); // h1
}

#[test]
fn test_bishop_attacks_blocked_on_negative_ray() {
    // Bishop on f6 (45), blocker on d4 (27): c3 is hidden
    let attacks = bishop_attacks(45, Bitboard::from_square(27));
    assert!(attacks.contains(36)); // e5
    assert!(attacks.contains(27)); // d4
    assert!(!attacks.contains(18)); // c3
    assert!(attacks.contains(63)); // h8
}

use super::*;

#[test]
fn test_file_masks() {
    assert_eq!(Bitboard::file(0), Bitboard::FILE_A);
    assert_eq!(Bitboard::file(7), Bitboard::FILE_H);
    assert!(Bitboard::file(4).contains(4)); // e1
    assert!(Bitboard::file(4).contains(60)); // e8
}

#[test]
fn test_light_squares() {
    assert!(!Bitboard::LIGHT_SQUARES.contains(0)); // a1 dark
    assert!(Bitboard::LIGHT_SQUARES.contains(1)); // b1 light
    assert!(Bitboard::LIGHT_SQUARES.contains(7)); // h1 light
    assert!(Bitboard::LIGHT_SQUARES.contains(56)); // a8 light
    assert!(!Bitboard::LIGHT_SQUARES.contains(63)); // h8 dark
    assert_eq!(Bitboard::LIGHT_SQUARES.popcount(), 32);
}

#[test]
fn test_lsb_msb() {
    let bb = Bitboard::from_square(3) | Bitboard::from_square(40);
    assert_eq!(bb.lsb(), Some(3));
    assert_eq!(bb.msb(), Some(40));
    assert_eq!(Bitboard::EMPTY.lsb(), None);
    assert_eq!(Bitboard::EMPTY.msb(), None);
}

#[test]
fn test_iterator_pops_in_order() {
    let bb = Bitboard(0b1010) | Bitboard::from_square(63);
    let squares: Vec<u8> = bb.collect();
    assert_eq!(squares, vec![1, 3, 63]);
}

#[test]
fn test_set_and_clear() {
    let mut bb = Bitboard::EMPTY;
    bb.set(12);
    assert!(bb.contains(12));
    bb.clear(12);
    assert!(bb.is_empty());
}

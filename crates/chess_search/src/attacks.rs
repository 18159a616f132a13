//! Pre-computed attack tables.
//!
//! Leaper tables (knight, king, pawn) are built at compile time from their
//! step offsets. Sliders use per-direction rays cut at the first blocker.

use crate::bitboard::Bitboard;
use crate::types::Color;

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const WHITE_PAWN_STEPS: [(i8, i8); 2] = [(-1, 1), (1, 1)];
const BLACK_PAWN_STEPS: [(i8, i8); 2] = [(-1, -1), (1, -1)];

/// Ray directions as (file, rank) steps: N, NE, E, SE, S, SW, W, NW.
/// Even indices are orthogonal, odd indices diagonal.
const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const N: usize = 0;
const NE: usize = 1;
const E: usize = 2;
const SE: usize = 3;
const S: usize = 4;
const SW: usize = 5;
const W: usize = 6;
const NW: usize = 7;

const fn on_board(file: i8, rank: i8) -> bool {
    file >= 0 && file < 8 && rank >= 0 && rank < 8
}

const fn leaper_table(steps: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < steps.len() {
            let (df, dr) = steps[i];
            if on_board(file + df, rank + dr) {
                bits |= 1u64 << (((rank + dr) * 8 + file + df) as u32);
            }
            i += 1;
        }
        table[sq] = Bitboard(bits);
        sq += 1;
    }
    table
}

const fn ray_table() -> [[Bitboard; 64]; 8] {
    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (df, dr) = DIRECTIONS[dir];
        let mut sq = 0;
        while sq < 64 {
            let mut file = (sq % 8) as i8 + df;
            let mut rank = (sq / 8) as i8 + dr;
            let mut bits = 0u64;
            while on_board(file, rank) {
                bits |= 1u64 << ((rank * 8 + file) as u32);
                file += df;
                rank += dr;
            }
            rays[dir][sq] = Bitboard(bits);
            sq += 1;
        }
        dir += 1;
    }
    rays
}

pub static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_STEPS);
pub static KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_STEPS);

/// Squares attacked by a pawn, indexed by [color][square].
pub static PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&WHITE_PAWN_STEPS),
    leaper_table(&BLACK_PAWN_STEPS),
];

/// RAYS[direction][square]: every square in that direction, excluding `square`.
pub static RAYS: [[Bitboard; 64]; 8] = ray_table();

#[inline(always)]
pub fn pawn_attacks(sq: u8, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.idx()][sq as usize]
}

#[inline(always)]
pub fn knight_attacks(sq: u8) -> Bitboard {
    KNIGHT_ATTACKS[sq as usize]
}

#[inline(always)]
pub fn king_attacks(sq: u8) -> Bitboard {
    KING_ATTACKS[sq as usize]
}

/// Ray from `sq` in `dir`, stopping at (and including) the first occupied square.
#[inline(always)]
fn slide(dir: usize, sq: u8, occupied: Bitboard) -> Bitboard {
    let ray = RAYS[dir][sq as usize];
    let blockers = ray & occupied;
    // Rays pointing toward higher squares meet their nearest blocker at the lsb.
    let nearest = match dir {
        N | NE | E | NW => blockers.lsb(),
        _ => blockers.msb(),
    };
    match nearest {
        Some(b) => ray ^ RAYS[dir][b as usize],
        None => ray,
    }
}

#[inline]
pub fn bishop_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    slide(NE, sq, occupied)
        | slide(SE, sq, occupied)
        | slide(SW, sq, occupied)
        | slide(NW, sq, occupied)
}

#[inline]
pub fn rook_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    slide(N, sq, occupied)
        | slide(E, sq, occupied)
        | slide(S, sq, occupied)
        | slide(W, sq, occupied)
}

#[inline]
pub fn queen_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;

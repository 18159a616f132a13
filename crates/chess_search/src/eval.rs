//! Static evaluation.
//!
//! Material, piece-square tables, pawn structure and mobility, summed
//! white-relative and then flipped to the side to move.

use crate::attacks::{bishop_attacks, knight_attacks, queen_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::config::EvalWeights;
use crate::pst::{self, ENDGAME_PIECES};
use crate::types::*;

/// Evaluates the position from the side-to-move's perspective.
///
/// Returns a score in centipawns:
/// - Positive = good for side to move
/// - Negative = bad for side to move
/// - 0 = equal position
pub fn evaluate(pos: &Position, weights: &EvalWeights) -> i32 {
    let endgame = pos.occupied().popcount() < ENDGAME_PIECES;
    let white = side_score(pos, Color::White, weights, endgame)
        - side_score(pos, Color::Black, weights, endgame);
    white * pos.side_to_move().sign()
}

/// Returns the material value of a piece in centipawns.
#[inline]
pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

fn side_score(pos: &Position, c: Color, w: &EvalWeights, endgame: bool) -> i32 {
    let occ = pos.occupied();
    let not_own = !pos.occupancy(c);
    let mut score = 0;

    for kind in PieceKind::ALL {
        for s in pos.pieces(c, kind) {
            score += w.material * piece_value(kind);
            score += w.piece_square * pst::value(kind, c, s, endgame);

            let reach = match kind {
                PieceKind::Knight => knight_attacks(s),
                PieceKind::Bishop => bishop_attacks(s, occ),
                PieceKind::Rook => rook_attacks(s, occ),
                PieceKind::Queen => queen_attacks(s, occ),
                PieceKind::Pawn | PieceKind::King => continue,
            };
            score += w.mobility * (reach & not_own).popcount() as i32;
        }
    }

    score + pawn_structure(pos, c, w)
}

fn pawn_structure(pos: &Position, c: Color, w: &EvalWeights) -> i32 {
    let ours = pos.pieces(c, PieceKind::Pawn);
    let theirs = pos.pieces(c.other(), PieceKind::Pawn);
    let mut score = 0;

    for file in 0..8 {
        let count = (ours & Bitboard::file(file)).popcount() as i32;
        if count == 0 {
            continue;
        }
        // Tripled and worse count three times as bad as doubled.
        let doubled = match count {
            1 => 0,
            2 => 1,
            _ => 3,
        };
        score -= w.doubled_pawn * doubled;
        if (ours & adjacent_files(file)).is_empty() {
            score -= w.isolated_pawn * count;
        }
    }

    for s in ours {
        if (theirs & front_span(c, s)).is_empty() {
            let advanced = match c {
                Color::White => rank_of(s),
                Color::Black => 7 - rank_of(s),
            };
            score += w.passed_pawn * advanced as i32;
        }
    }

    score
}

fn adjacent_files(file: i8) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    if file > 0 {
        bb |= Bitboard::file(file - 1);
    }
    if file < 7 {
        bb |= Bitboard::file(file + 1);
    }
    bb
}

/// Squares ahead of a `c` pawn on `s`, on its own and both adjacent files.
fn front_span(c: Color, s: u8) -> Bitboard {
    let (f, r) = (file_of(s), rank_of(s));
    let ahead = match c {
        Color::White if r < 7 => !0u64 << ((r + 1) * 8),
        Color::Black => (1u64 << (r * 8)) - 1,
        Color::White => 0,
    };
    (Bitboard::file(f) | adjacent_files(f)) & Bitboard(ahead)
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;

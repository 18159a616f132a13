//! Legal move generation.
//!
//! Moves are generated pseudo-legally per piece kind from the attack tables,
//! then filtered by playing each one on the position and rejecting those
//! that leave the mover's king attacked.

use crate::attacks::*;
use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::moves::Move;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Generate {
    /// Every move.
    All,
    /// Captures, en-passant and queen promotions; what quiescence looks at.
    Tactical,
}

/// Generate all legal moves, returning a freshly allocated vector.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
pub(crate) fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    out.clear();
    pseudo_moves(pos, Generate::All, out);
    retain_legal(pos, out);
}

/// Legal captures and queen promotions only.
pub(crate) fn legal_tactical_into(pos: &mut Position, out: &mut Vec<Move>) {
    out.clear();
    pseudo_moves(pos, Generate::Tactical, out);
    retain_legal(pos, out);
}

fn retain_legal(pos: &mut Position, out: &mut Vec<Move>) {
    let mover = pos.side_to_move();
    out.retain(|&mv| {
        let undo = pos.make_move(mv);
        let illegal = pos.in_check(mover);
        pos.unmake_move(mv, undo);
        !illegal
    });
}

fn pseudo_moves(pos: &Position, mode: Generate, out: &mut Vec<Move>) {
    let us = pos.side_to_move();
    let own = pos.occupancy(us);
    let occ = pos.occupied();
    let targets = match mode {
        Generate::All => !own,
        Generate::Tactical => pos.occupancy(us.other()),
    };

    gen_pawns(pos, us, mode, out);

    for from in pos.pieces(us, PieceKind::Knight) {
        push_targets(pos, from, knight_attacks(from) & targets, out);
    }
    for from in pos.pieces(us, PieceKind::Bishop) {
        push_targets(pos, from, bishop_attacks(from, occ) & targets, out);
    }
    for from in pos.pieces(us, PieceKind::Rook) {
        push_targets(pos, from, rook_attacks(from, occ) & targets, out);
    }
    for from in pos.pieces(us, PieceKind::Queen) {
        push_targets(pos, from, queen_attacks(from, occ) & targets, out);
    }

    let king = pos.king_sq(us);
    push_targets(pos, king, king_attacks(king) & targets, out);
    if mode == Generate::All {
        gen_castles(pos, us, out);
    }
}

fn push_targets(pos: &Position, from: u8, targets: Bitboard, out: &mut Vec<Move>) {
    for to in targets {
        if pos.piece_at(to).is_some() {
            out.push(Move::capture(from, to));
        } else {
            out.push(Move::normal(from, to));
        }
    }
}

fn push_promotions(from: u8, to: u8, capture: bool, mode: Generate, out: &mut Vec<Move>) {
    match mode {
        Generate::All => {
            for pk in PieceKind::PROMOTIONS {
                out.push(Move::promotion(from, to, pk, capture));
            }
        }
        Generate::Tactical => out.push(Move::promotion(from, to, PieceKind::Queen, capture)),
    }
}

fn gen_pawns(pos: &Position, us: Color, mode: Generate, out: &mut Vec<Move>) {
    let (step, start_rank, promo_rank): (i8, i8, i8) = match us {
        Color::White => (8, 1, 7),
        Color::Black => (-8, 6, 0),
    };
    let enemy = pos.occupancy(us.other());

    for from in pos.pieces(us, PieceKind::Pawn) {
        // Pawns never stand on the last rank, so one step forward stays on the board.
        let push = (from as i8 + step) as u8;
        if pos.piece_at(push).is_none() {
            if rank_of(push) == promo_rank {
                push_promotions(from, push, false, mode, out);
            } else if mode == Generate::All {
                out.push(Move::normal(from, push));
                let double = (push as i8 + step) as u8;
                if rank_of(from) == start_rank && pos.piece_at(double).is_none() {
                    out.push(Move::normal(from, double));
                }
            }
        }

        let attacks = pawn_attacks(from, us);
        for to in attacks & enemy {
            if rank_of(to) == promo_rank {
                push_promotions(from, to, true, mode, out);
            } else {
                out.push(Move::capture(from, to));
            }
        }
        if let Some(ep) = pos.en_passant()
            && attacks.contains(ep)
        {
            out.push(Move::en_passant(from, ep));
        }
    }
}

fn gen_castles(pos: &Position, us: Color, out: &mut Vec<Move>) {
    let rights = pos.castling();
    if !rights.kingside(us) && !rights.queenside(us) {
        return;
    }
    let home = (us.back_rank() * 8) as u8;
    let king_from = home + 4;
    if pos.king_sq(us) != king_from || pos.in_check(us) {
        return;
    }

    let occ = pos.occupied();
    let them = us.other();
    let empty = |squares: &[u8]| squares.iter().all(|&s| !occ.contains(s));
    let safe = |squares: &[u8]| squares.iter().all(|&s| !pos.is_square_attacked(s, them));

    if rights.kingside(us) && empty(&[home + 5, home + 6]) && safe(&[home + 5, home + 6]) {
        out.push(Move::castle(king_from, home + 6));
    }
    // b1/b8 must be empty but may be attacked.
    if rights.queenside(us)
        && empty(&[home + 1, home + 2, home + 3])
        && safe(&[home + 3, home + 2])
    {
        out.push(Move::castle(king_from, home + 2));
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;

//! Zobrist hashing for chess positions.
//!
//! A position hash is the XOR of one key per feature:
//! - each piece on each square (12 × 64 keys)
//! - black to move
//! - the castling-rights mask (one key per 4-bit combination)
//! - the en-passant file, when an en-passant target exists
//!
//! `Position` keeps its hash current across make/unmake; `Position::compute_hash`
//! rebuilds it from scratch for verification.

use crate::types::Piece;

pub struct ZobristKeys {
    /// Indexed by [color][piece_kind][square].
    pieces: [[[u64; 64]; 6]; 2],
    black_to_move: u64,
    /// Indexed by the castling-rights bit mask (0..16).
    castling: [u64; 16],
    en_passant: [u64; 8],
}

const fn xorshift64(mut state: u64) -> u64 {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    state
}

impl ZobristKeys {
    /// Keys come from a fixed-seed xorshift64 stream so hashes are stable across runs.
    const fn generate() -> Self {
        let mut state = 0x9E37_79B9_7F4A_7C15u64;

        let mut pieces = [[[0u64; 64]; 6]; 2];
        let mut color = 0;
        while color < 2 {
            let mut kind = 0;
            while kind < 6 {
                let mut sq = 0;
                while sq < 64 {
                    state = xorshift64(state);
                    pieces[color][kind][sq] = state;
                    sq += 1;
                }
                kind += 1;
            }
            color += 1;
        }

        state = xorshift64(state);
        let black_to_move = state;

        // Mask 0 (no rights) hashes to zero so a bare board needs no castling key.
        let mut castling = [0u64; 16];
        let mut i = 1;
        while i < 16 {
            state = xorshift64(state);
            castling[i] = state;
            i += 1;
        }

        let mut en_passant = [0u64; 8];
        let mut i = 0;
        while i < 8 {
            state = xorshift64(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline(always)]
    pub fn piece(&self, piece: Piece, sq: u8) -> u64 {
        self.pieces[piece.color.idx()][piece.kind.idx()][sq as usize]
    }

    #[inline(always)]
    pub fn black_to_move(&self) -> u64 {
        self.black_to_move
    }

    #[inline(always)]
    pub fn castling(&self, mask: u8) -> u64 {
        self.castling[(mask & 0xF) as usize]
    }

    #[inline(always)]
    pub fn en_passant(&self, file: i8) -> u64 {
        self.en_passant[file as usize]
    }
}

/// Global keys, computed at compile time. Read-only, so sharing them is safe.
pub static ZOBRIST: ZobristKeys = ZobristKeys::generate();

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;

use std::fmt;

use crate::attacks::*;
use crate::bitboard::Bitboard;
use crate::error::EngineError;
use crate::moves::{Move, MoveKind};
use crate::types::*;
use crate::zobrist::ZOBRIST;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub wk: bool,
    pub wq: bool,
    pub bk: bool,
    pub bq: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        wk: true,
        wq: true,
        bk: true,
        bq: true,
    };

    pub fn kingside(self, c: Color) -> bool {
        match c {
            Color::White => self.wk,
            Color::Black => self.bk,
        }
    }

    pub fn queenside(self, c: Color) -> bool {
        match c {
            Color::White => self.wq,
            Color::Black => self.bq,
        }
    }

    /// Bit mask used for hashing: wk=1, wq=2, bk=4, bq=8.
    pub fn mask(self) -> u8 {
        (self.wk as u8) | ((self.wq as u8) << 1) | ((self.bk as u8) << 2) | ((self.bq as u8) << 3)
    }

    /// Drop every right that depends on a piece standing on `sq`.
    fn touch(&mut self, sq: u8) {
        match sq {
            0 => self.wq = false,
            4 => {
                self.wk = false;
                self.wq = false;
            }
            7 => self.wk = false,
            56 => self.bq = false,
            60 => {
                self.bk = false;
                self.bq = false;
            }
            63 => self.bk = false,
            _ => {}
        }
    }
}

/// Why (or whether) the game is over in a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }

    pub fn is_draw(self) -> bool {
        !matches!(self, GameStatus::Ongoing | GameStatus::Checkmate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::FiftyMoveRule => "fifty-move rule",
            GameStatus::ThreefoldRepetition => "threefold repetition",
            GameStatus::InsufficientMaterial => "insufficient material",
        };
        f.write_str(s)
    }
}

/// A chess position.
///
/// The mailbox and the bitboards describe the same placement and are updated
/// together; the zobrist hash is maintained incrementally. `history` holds the
/// hashes of earlier positions, newest last, for repetition detection.
///
/// Outside the crate a `Position` is only ever produced as a fresh value
/// (`startpos`, `from_fen`, `play`); in-place make/unmake is reserved for the
/// search's scratch copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; 64],
    pieces: [[Bitboard; 6]; 2],
    occupancy: [Bitboard; 2],
    kings: [u8; 2],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<u8>, // square behind a pawn that just advanced 2
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
    history: Vec<u64>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Undo {
    captured: Option<(Piece, u8)>,
    castling: CastlingRights,
    en_passant: Option<u8>,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
}

fn castle_rook_squares(c: Color, kind: MoveKind) -> (u8, u8) {
    match (c, kind) {
        (Color::White, MoveKind::CastleKingside) => (7, 5),
        (Color::White, _) => (0, 3),
        (Color::Black, MoveKind::CastleKingside) => (63, 61),
        (Color::Black, _) => (56, 59),
    }
}

impl Position {
    fn empty() -> Self {
        Position {
            board: [None; 64],
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupancy: [Bitboard::EMPTY; 2],
            kings: [0; 2],
            side_to_move: Color::White,
            castling: CastlingRights::default(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            history: Vec::new(),
        }
    }

    pub fn startpos() -> Self {
        let mut p = Position::empty();
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            let f = f as u8;
            p.put_piece(f, Piece::new(Color::White, kind));
            p.put_piece(8 + f, Piece::new(Color::White, PieceKind::Pawn));
            p.put_piece(48 + f, Piece::new(Color::Black, PieceKind::Pawn));
            p.put_piece(56 + f, Piece::new(Color::Black, kind));
        }
        p.castling = CastlingRights::ALL;
        p.hash = p.compute_hash();
        p
    }

    /// Parse Forsyth-Edwards Notation. The clock fields are optional.
    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 || parts.len() > 6 {
            return Err(EngineError::fen(fen, "expected 4 to 6 fields"));
        }

        let mut p = Position::empty();

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(EngineError::fen(fen, "board must have 8 ranks"));
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
            let mut file: i8 = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10)
                    && (1..=8).contains(&d)
                {
                    file += d as i8;
                } else {
                    let pc = Piece::from_fen_char(ch)
                        .ok_or_else(|| EngineError::fen(fen, format!("bad piece char `{ch}`")))?;
                    let s = sq(file, rank)
                        .ok_or_else(|| EngineError::fen(fen, "too many files in a rank"))?;
                    p.put_piece(s, pc);
                    file += 1;
                }
                if file > 8 {
                    return Err(EngineError::fen(fen, "too many files in a rank"));
                }
            }
            if file != 8 {
                return Err(EngineError::fen(fen, "not enough files in a rank"));
            }
        }

        p.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(EngineError::fen(
                    fen,
                    format!("bad side to move `{other}`"),
                ));
            }
        };

        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => p.castling.wk = true,
                    'Q' => p.castling.wq = true,
                    'k' => p.castling.bk = true,
                    'q' => p.castling.bq = true,
                    _ => return Err(EngineError::fen(fen, format!("bad castling char `{c}`"))),
                }
            }
        }

        p.en_passant = match parts[3] {
            "-" => None,
            s => Some(
                coord_to_sq(s)
                    .ok_or_else(|| EngineError::fen(fen, format!("bad en-passant square `{s}`")))?,
            ),
        };

        p.halfmove_clock = match parts.get(4) {
            Some(s) => s
                .parse()
                .map_err(|_| EngineError::fen(fen, "bad halfmove clock"))?,
            None => 0,
        };
        p.fullmove_number = match parts.get(5) {
            Some(s) => s
                .parse()
                .map_err(|_| EngineError::fen(fen, "bad fullmove number"))?,
            None => 1,
        };

        p.validate()?;
        p.hash = p.compute_hash();
        Ok(p)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.board[(rank * 8 + file) as usize] {
                    Some(pc) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(pc.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        let c = self.castling;
        if c.mask() == 0 {
            out.push('-');
        } else {
            for (flag, ch) in [(c.wk, 'K'), (c.wq, 'Q'), (c.bk, 'k'), (c.bq, 'q')] {
                if flag {
                    out.push(ch);
                }
            }
        }

        out.push(' ');
        match self.en_passant {
            Some(ep) => out.push_str(&sq_to_coord(ep)),
            None => out.push('-'),
        }

        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }

    /// Check the structural invariants of the position.
    pub fn validate(&self) -> Result<(), EngineError> {
        let bad = |msg: String| Err(EngineError::InvalidPosition(msg));

        for c in Color::BOTH {
            let kings = self.pieces(c, PieceKind::King).popcount();
            if kings != 1 {
                return bad(format!("{c:?} has {kings} kings"));
            }
        }

        let mut seen = Bitboard::EMPTY;
        for c in Color::BOTH {
            let mut union = Bitboard::EMPTY;
            for kind in PieceKind::ALL {
                let bb = self.pieces(c, kind);
                if !(seen & bb).is_empty() {
                    return bad(format!("{c:?} {kind:?} bitboard overlaps another piece set"));
                }
                seen |= bb;
                union |= bb;
            }
            if union != self.occupancy[c.idx()] {
                return bad(format!("{c:?} occupancy does not match its piece sets"));
            }
        }
        for s in 0..64u8 {
            let from_sets = Color::BOTH.iter().find_map(|&c| {
                PieceKind::ALL
                    .iter()
                    .find(|&&k| self.pieces(c, k).contains(s))
                    .map(|&k| Piece::new(c, k))
            });
            if from_sets != self.board[s as usize] {
                return bad(format!("mailbox and bitboards disagree on {}", sq_to_coord(s)));
            }
        }

        let pawns =
            self.pieces(Color::White, PieceKind::Pawn) | self.pieces(Color::Black, PieceKind::Pawn);
        if !(pawns & (Bitboard::RANK_1 | Bitboard::RANK_8)).is_empty() {
            return bad("pawn on the first or last rank".to_string());
        }

        for c in Color::BOTH {
            let home = c.back_rank() * 8;
            let king = Piece::new(c, PieceKind::King);
            let rook = Piece::new(c, PieceKind::Rook);
            let king_home = self.board[(home + 4) as usize] == Some(king);
            let kingside_ok = king_home && self.board[(home + 7) as usize] == Some(rook);
            let queenside_ok = king_home && self.board[home as usize] == Some(rook);
            if (self.castling.kingside(c) && !kingside_ok)
                || (self.castling.queenside(c) && !queenside_ok)
            {
                return bad(format!("{c:?} castling right without king and rook at home"));
            }
        }

        // The target must sit behind an enemy pawn that just advanced two
        // squares from a now-empty origin.
        if let Some(ep) = self.en_passant {
            let (expected_rank, pawn_sq, origin_sq) = match self.side_to_move {
                Color::White => (5, ep.wrapping_sub(8), ep.wrapping_add(8)),
                Color::Black => (2, ep.wrapping_add(8), ep.wrapping_sub(8)),
            };
            let pushed = Piece::new(self.side_to_move.other(), PieceKind::Pawn);
            if rank_of(ep) != expected_rank
                || self.board[ep as usize].is_some()
                || self.board[pawn_sq as usize] != Some(pushed)
                || self.board[origin_sq as usize].is_some()
            {
                return bad(format!("impossible en-passant square {}", sq_to_coord(ep)));
            }
        }

        if self.in_check(self.side_to_move.other()) {
            return bad("side not to move is in check".to_string());
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    #[inline(always)]
    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }

    #[inline(always)]
    pub fn pieces(&self, c: Color, kind: PieceKind) -> Bitboard {
        self.pieces[c.idx()][kind.idx()]
    }

    #[inline(always)]
    pub fn occupancy(&self, c: Color) -> Bitboard {
        self.occupancy[c.idx()]
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.occupancy[0] | self.occupancy[1]
    }

    #[inline(always)]
    pub fn king_sq(&self, c: Color) -> u8 {
        self.kings[c.idx()]
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant(&self) -> Option<u8> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Zobrist hash of the placement, side to move, castling rights and en-passant file.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn compute_hash(&self) -> u64 {
        let mut h = 0u64;
        for (s, pc) in self.board.iter().enumerate() {
            if let Some(pc) = pc {
                h ^= ZOBRIST.piece(*pc, s as u8);
            }
        }
        if self.side_to_move == Color::Black {
            h ^= ZOBRIST.black_to_move();
        }
        h ^= ZOBRIST.castling(self.castling.mask());
        if let Some(ep) = self.en_passant {
            h ^= ZOBRIST.en_passant(file_of(ep));
        }
        h
    }

    // ---------------------------------------------------------------------
    // Attacks and game state
    // ---------------------------------------------------------------------

    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        let occ = self.occupied();
        let queens = self.pieces(by, PieceKind::Queen);

        // A `by` pawn attacks `target` iff a pawn of the other color on `target` would attack it.
        !(pawn_attacks(target, by.other()) & self.pieces(by, PieceKind::Pawn)).is_empty()
            || !(knight_attacks(target) & self.pieces(by, PieceKind::Knight)).is_empty()
            || !(king_attacks(target) & self.pieces(by, PieceKind::King)).is_empty()
            || !(bishop_attacks(target, occ) & (self.pieces(by, PieceKind::Bishop) | queens))
                .is_empty()
            || !(rook_attacks(target, occ) & (self.pieces(by, PieceKind::Rook) | queens)).is_empty()
    }

    pub fn in_check(&self, c: Color) -> bool {
        self.is_square_attacked(self.king_sq(c), c.other())
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// How many earlier positions since the last capture or pawn move match this one.
    pub fn repetition_count(&self) -> usize {
        self.history
            .iter()
            .rev()
            .take(self.halfmove_clock as usize)
            .filter(|&&h| h == self.hash)
            .count()
    }

    /// Neither side can possibly deliver mate.
    ///
    /// Covers K v K, K+minor v K, and bishops-only endings where every bishop
    /// stands on the same square color.
    pub fn is_insufficient_material(&self) -> bool {
        let heavy_or_pawn = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen];
        for c in Color::BOTH {
            if heavy_or_pawn.iter().any(|&k| !self.pieces(c, k).is_empty()) {
                return false;
            }
        }

        let knights = self.pieces(Color::White, PieceKind::Knight)
            | self.pieces(Color::Black, PieceKind::Knight);
        let bishops = self.pieces(Color::White, PieceKind::Bishop)
            | self.pieces(Color::Black, PieceKind::Bishop);

        if knights.popcount() + bishops.popcount() <= 1 {
            return true;
        }
        knights.is_empty()
            && ((bishops & Bitboard::LIGHT_SQUARES).is_empty()
                || (bishops & !Bitboard::LIGHT_SQUARES).is_empty())
    }

    /// Full game status. Checkmate and stalemate take precedence over the draw rules.
    pub fn status(&self) -> GameStatus {
        if crate::movegen::legal_moves(self).is_empty() {
            return if self.in_check(self.side_to_move) {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
        }
        if self.is_fifty_move_draw() {
            GameStatus::FiftyMoveRule
        } else if self.repetition_count() >= 2 {
            GameStatus::ThreefoldRepetition
        } else if self.is_insufficient_material() {
            GameStatus::InsufficientMaterial
        } else {
            GameStatus::Ongoing
        }
    }

    // ---------------------------------------------------------------------
    // Applying moves
    // ---------------------------------------------------------------------

    /// Play a legal move and return the resulting position; `self` is untouched.
    pub fn play(&self, mv: Move) -> Result<Position, EngineError> {
        if !crate::movegen::legal_moves(self).contains(&mv) {
            return Err(EngineError::illegal(
                &mv.to_notation(),
                "not a legal move in this position",
            ));
        }
        Ok(self.apply(mv))
    }

    /// `play` without the legality check, for moves taken from this position's legal set.
    pub(crate) fn apply(&self, mv: Move) -> Position {
        let mut next = self.clone();
        next.make_move(mv);
        // Positions before the last irreversible move can never repeat.
        let keep = next.halfmove_clock as usize;
        if next.history.len() > keep {
            next.history.drain(..next.history.len() - keep);
        }
        next
    }

    fn put_piece(&mut self, s: u8, pc: Piece) {
        self.board[s as usize] = Some(pc);
        self.pieces[pc.color.idx()][pc.kind.idx()].set(s);
        self.occupancy[pc.color.idx()].set(s);
        if pc.kind == PieceKind::King {
            self.kings[pc.color.idx()] = s;
        }
        self.hash ^= ZOBRIST.piece(pc, s);
    }

    fn remove_piece(&mut self, s: u8) -> Option<Piece> {
        let pc = self.board[s as usize].take()?;
        self.pieces[pc.color.idx()][pc.kind.idx()].clear(s);
        self.occupancy[pc.color.idx()].clear(s);
        self.hash ^= ZOBRIST.piece(pc, s);
        Some(pc)
    }

    fn move_piece(&mut self, from: u8, to: u8) {
        if let Some(pc) = self.remove_piece(from) {
            self.put_piece(to, pc);
        }
    }

    /// Make a move generated for this position. Pair with `unmake_move`.
    pub(crate) fn make_move(&mut self, mv: Move) -> Undo {
        let us = self.side_to_move;
        let (from, to) = (mv.from(), mv.to());
        let moved = self.board[from as usize].expect("move origin holds a piece");

        let mut undo = Undo {
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
        };
        self.history.push(self.hash);

        if let Some(ep) = self.en_passant.take() {
            self.hash ^= ZOBRIST.en_passant(file_of(ep));
        }
        self.hash ^= ZOBRIST.castling(self.castling.mask());

        match mv.kind() {
            MoveKind::EnPassant => {
                // The captured pawn sits beside the origin, on the destination file.
                let cap_sq = (rank_of(from) * 8 + file_of(to)) as u8;
                undo.captured = self.remove_piece(cap_sq).map(|pc| (pc, cap_sq));
            }
            MoveKind::Capture | MoveKind::Promotion { capture: true } => {
                undo.captured = self.remove_piece(to).map(|pc| (pc, to));
            }
            kind @ (MoveKind::CastleKingside | MoveKind::CastleQueenside) => {
                let (rf, rt) = castle_rook_squares(us, kind);
                self.move_piece(rf, rt);
            }
            _ => {}
        }

        self.move_piece(from, to);
        if let Some(promo) = mv.promotion_piece() {
            self.remove_piece(to);
            self.put_piece(to, Piece::new(us, promo));
        }

        self.castling.touch(from);
        self.castling.touch(to);
        self.hash ^= ZOBRIST.castling(self.castling.mask());

        if moved.kind == PieceKind::Pawn && from.abs_diff(to) == 16 {
            let ep = (from + to) / 2;
            self.en_passant = Some(ep);
            self.hash ^= ZOBRIST.en_passant(file_of(ep));
        }

        self.halfmove_clock = if moved.kind == PieceKind::Pawn || undo.captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = us.other();
        self.hash ^= ZOBRIST.black_to_move();

        undo
    }

    pub(crate) fn unmake_move(&mut self, mv: Move, undo: Undo) {
        self.side_to_move = self.side_to_move.other();
        let us = self.side_to_move;
        let (from, to) = (mv.from(), mv.to());

        if mv.is_promotion() {
            self.remove_piece(to);
            self.put_piece(to, Piece::new(us, PieceKind::Pawn));
        }
        self.move_piece(to, from);

        if mv.is_castle() {
            let (rf, rt) = castle_rook_squares(us, mv.kind());
            self.move_piece(rt, rf);
        }
        if let Some((pc, s)) = undo.captured {
            self.put_piece(s, pc);
        }

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.hash = undo.hash;
        self.history.pop();
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;

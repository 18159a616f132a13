//! Chess move search.
//!
//! Board representation, legal move generation and a time-boxed
//! alpha-beta search behind a small value-producing API:
//!
//! ```no_run
//! use chess_search::{play_move, search, start_state};
//!
//! let pos = play_move(&start_state(), "e2e4")?;
//! let (reply, after) = search(&pos, 0.5)?;
//! println!("{reply} -> {}", after.to_fen());
//! # Ok::<(), chess_search::EngineError>(())
//! ```

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod moves;
mod ordering;
pub mod perft;
pub mod pst;
pub mod search;
pub mod time_control;
pub mod tt;
pub mod types;
pub mod zobrist;

pub use bitboard::Bitboard;
pub use board::{CastlingRights, GameStatus, Position, START_FEN};
pub use config::{EngineConfig, EvalWeights, SearchConfig, TimeConfig};
pub use engine::{Engine, play_move, search, start_state};
pub use error::{ConfigError, EngineError};
pub use eval::{evaluate, piece_value};
pub use movegen::legal_moves;
pub use moves::{Move, MoveKind, parse_move};
pub use perft::{perft, perft_divide};
pub use search::{MATE_VALUE, SearchResult, Termination};
pub use time_control::{ClockState, TimeManager};
pub use types::*;
pub use zobrist::ZOBRIST;

//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document (or a missing table)
//! yields the stock engine:
//!
//! ```toml
//! [search]
//! max_depth = 64
//! quiescence_depth = 8
//! tt_entries = 65536
//! check_interval = 1024
//!
//! [time]
//! next_depth_factor = 2.0
//! max_seconds = 86400.0
//!
//! [eval]
//! material = 1
//! piece_square = 1
//! doubled_pawn = 15
//! isolated_pawn = 10
//! passed_pawn = 8
//! mobility = 2
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound on nominal plus quiescence plies.
pub const MAX_PLY: usize = 127;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub time: TimeConfig,
    pub eval: EvalWeights,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Deepest nominal depth iterative deepening will start.
    pub max_depth: u8,
    /// Extra plies of capture-only search below the nominal horizon.
    pub quiescence_depth: u8,
    /// Transposition table capacity; rounded down to a power of two.
    pub tt_entries: usize,
    /// Nodes between deadline checks.
    pub check_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            quiescence_depth: 8,
            tt_entries: 1 << 16,
            check_interval: 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeConfig {
    /// A new depth is only started if the remaining time exceeds the last
    /// depth's duration times this factor.
    pub next_depth_factor: f64,
    /// Budgets above this many seconds are clamped.
    pub max_seconds: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            next_depth_factor: 2.0,
            max_seconds: 86_400.0,
        }
    }
}

/// Centipawn weights of the evaluation terms.
///
/// `material` and `piece_square` scale the tables; the pawn terms are per
/// pawn; `passed_pawn` is per rank of advancement; `mobility` is per
/// attacked square not held by a friendly piece.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EvalWeights {
    pub material: i32,
    pub piece_square: i32,
    pub doubled_pawn: i32,
    pub isolated_pawn: i32,
    pub passed_pawn: i32,
    pub mobility: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            material: 1,
            piece_square: 1,
            doubled_pawn: 15,
            isolated_pawn: 10,
            passed_pawn: 8,
            mobility: 2,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: EngineConfig = toml::from_str(text)?;
        config.clamp();
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Same configuration with a different depth cap.
    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.search.max_depth = depth;
        self.clamp();
        self
    }

    /// Keep the recursion bound and table sizes within what the search can hold.
    pub(crate) fn clamp(&mut self) {
        let s = &mut self.search;
        s.max_depth = s.max_depth.clamp(1, MAX_PLY as u8);
        let room = MAX_PLY as u8 - s.max_depth;
        s.quiescence_depth = s.quiescence_depth.min(room);
        s.tt_entries = s.tt_entries.max(1);
        s.check_interval = s.check_interval.max(1);

        let t = &mut self.time;
        if !t.next_depth_factor.is_finite() || t.next_depth_factor < 0.0 {
            t.next_depth_factor = TimeConfig::default().next_depth_factor;
        }
        if !t.max_seconds.is_finite() || t.max_seconds <= 0.0 {
            t.max_seconds = TimeConfig::default().max_seconds;
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

//! Race options threaded explicitly into the calls that need them.

use serde::{Deserialize, Serialize};

use crate::error::RouletteError;

/// Per-race configuration chosen by the host before the race starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceOptions {
    /// Whether marbles roll for skills while racing.
    pub use_skills: bool,
    /// Legacy single winning position (0-indexed).
    pub winning_rank: usize,
    /// Winning positions (0-indexed). Takes precedence when non-empty.
    pub winning_ranks: Vec<usize>,
    /// Whether the host should record the race.
    pub auto_recording: bool,
}

impl Default for RaceOptions {
    fn default() -> Self {
        Self {
            use_skills: true,
            winning_rank: 0,
            winning_ranks: vec![0],
            auto_recording: true,
        }
    }
}

impl RaceOptions {
    /// Parses options from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, RouletteError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Winning positions to highlight.
    ///
    /// `winning_ranks` wins when non-empty; otherwise the single
    /// `winning_rank` is used.
    pub fn selected_ranks(&self) -> Vec<usize> {
        selected_ranks(self.winning_rank, Some(&self.winning_ranks))
    }
}

/// Resolves the set of selected winning positions from the legacy single rank
/// and the optional multi-rank list.
pub fn selected_ranks(winning_rank: usize, winning_ranks: Option<&[usize]>) -> Vec<usize> {
    match winning_ranks {
        Some(ranks) if !ranks.is_empty() => ranks.to_vec(),
        _ => vec![winning_rank],
    }
}

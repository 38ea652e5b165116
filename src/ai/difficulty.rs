use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseDifficultyError;

/// Strength of the computer opponent. Ordered from weakest to strongest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// Search settings for one difficulty tier.
///
/// Only `depth` is required in TOML; the rest default to "off".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Maximum search depth in plies.
    pub depth: usize,
    /// Chance of ignoring the search and playing a uniformly random column.
    #[serde(default)]
    pub random_move_probability: f64,
    /// Always take an immediate win, otherwise always block an immediate loss.
    #[serde(default)]
    pub tactical_floor: bool,
    /// Search the root moves on the rayon thread pool.
    #[serde(default)]
    pub parallel_root: bool,
    /// Stop deepening once this many nodes have been visited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_budget: Option<u64>,
    /// Stop deepening once this much wall-clock time has passed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget_ms: Option<u64>,
}

impl TierConfig {
    pub fn easy() -> Self {
        TierConfig {
            depth: 2,
            random_move_probability: 0.4,
            tactical_floor: false,
            parallel_root: false,
            node_budget: None,
            time_budget_ms: None,
        }
    }

    pub fn medium() -> Self {
        TierConfig {
            depth: 4,
            random_move_probability: 0.0,
            tactical_floor: false,
            parallel_root: false,
            node_budget: None,
            time_budget_ms: None,
        }
    }

    pub fn hard() -> Self {
        TierConfig {
            depth: 7,
            random_move_probability: 0.0,
            tactical_floor: true,
            parallel_root: false,
            node_budget: Some(2_000_000),
            time_budget_ms: None,
        }
    }

    /// Whether the search must stop early on a node or time budget
    pub fn is_bounded(&self) -> bool {
        self.node_budget.is_some() || self.time_budget_ms.is_some()
    }
}

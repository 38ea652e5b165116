use serde::{Deserialize, Serialize};

use super::Side;

/// State of a round as read from the board after the latest placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    InProgress,
    Win(Side),
    Draw,
}

impl GameOutcome {
    /// True for a win or a draw
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    /// The winning side, if any
    pub fn winner(self) -> Option<Side> {
        match self {
            GameOutcome::Win(side) => Some(side),
            _ => None,
        }
    }

    /// The same outcome with the sides' identities exchanged
    pub fn swapped(self) -> GameOutcome {
        match self {
            GameOutcome::Win(side) => GameOutcome::Win(side.other()),
            other => other,
        }
    }
}

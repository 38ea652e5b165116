use super::difficulty::Difficulty;
use super::search::SearchEngine;
use crate::error::SearchError;
use crate::game::{Board, Side};

/// Anything that can pick a column for a side.
pub trait Agent {
    /// Select a column for `side` on `board`. The board is left untouched.
    fn select_action(&mut self, board: &Board, side: Side) -> Result<usize, SearchError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}

/// The search engine playing at a fixed difficulty.
pub struct EngineAgent {
    engine: SearchEngine,
    difficulty: Difficulty,
    name: String,
}

impl EngineAgent {
    pub fn new(engine: SearchEngine, difficulty: Difficulty) -> Self {
        EngineAgent {
            engine,
            difficulty,
            name: format!("engine ({difficulty})"),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

impl Agent for EngineAgent {
    fn select_action(&mut self, board: &Board, side: Side) -> Result<usize, SearchError> {
        self.engine.choose_move(board, side, self.difficulty)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::agent::Agent;
use crate::error::SearchError;
use crate::game::{Board, Side};

/// An agent that selects uniformly at random from legal columns.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, board: &Board, _side: Side) -> Result<usize, SearchError> {
        let columns = board.legal_columns();
        if columns.is_empty() || board.is_terminal() {
            return Err(SearchError::NoLegalMove);
        }
        let idx = self.rng.random_range(0..columns.len());
        Ok(columns[idx])
    }

    fn name(&self) -> &str {
        "random"
    }
}

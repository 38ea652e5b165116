//! Move selection: difficulty tiers, the leaf heuristic, the alpha-beta
//! search engine, and the agents that wrap it.

mod agent;
mod difficulty;
mod heuristic;
mod random;
mod search;

pub use agent::{Agent, EngineAgent};
pub use difficulty::{Difficulty, TierConfig};
pub use heuristic::{ConnectFourHeuristic, Heuristic, HeuristicWeights};
pub use random::RandomAgent;
pub use search::{MoveReason, SearchEngine, SearchReport, MOVE_ORDER, WIN_SCORE};

use std::path::PathBuf;

use crate::game::Side;

/// A move the board refused. Always recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is out of range")]
    InvalidColumn { column: usize },

    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("the round is already over")]
    GameOver,

    #[error("it is {expected}'s turn, not {got}'s")]
    OutOfTurn { expected: Side, got: Side },
}

/// Errors raised by the search engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("no legal move available")]
    NoLegalMove,
}

/// Errors raised while orchestrating a round.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("illegal move: {0}")]
    IllegalHumanMove(#[from] MoveError),

    #[error("it is not the human's turn")]
    NotHumanTurn,

    #[error("it is not the AI's turn")]
    NotAiTurn,

    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("engine chose illegal column {column}: {source}")]
    EngineIllegalMove { column: usize, source: MoveError },
}

impl SessionError {
    /// Whether the error signals a broken engine or orchestration contract
    /// rather than a bad human input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            SessionError::Search(_) | SessionError::EngineIllegalMove { .. }
        )
    }
}

/// Errors that abort an arena game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("agent '{agent}' failed to move: {source}")]
    Search { agent: String, source: SearchError },

    #[error("agent '{agent}' chose illegal column {column}: {source}")]
    IllegalAction {
        agent: String,
        column: usize,
        source: MoveError,
    },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Returned when a difficulty name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty '{0}' (expected 'easy', 'medium', or 'hard')")]
pub struct ParseDifficultyError(pub String);

//! Round orchestration for a human playing the engine, with a running score.
//!
//! A [`Session`] owns exactly one [`Board`] at a time. When a round ends the
//! board stays in its final state (so the caller can show the winning line)
//! until [`Session::new_round`] replaces it.

use serde::{Deserialize, Serialize};

use crate::ai::{Difficulty, SearchEngine};
use crate::error::SessionError;
use crate::game::{Board, GameOutcome, Side};

/// Tally of concluded rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub human_wins: u32,
    pub ai_wins: u32,
    pub draws: u32,
}

impl Score {
    /// Count a concluded round. Returns false for an in-progress outcome,
    /// which is not counted.
    pub fn record(&mut self, outcome: GameOutcome, human: Side) -> bool {
        match outcome {
            GameOutcome::InProgress => return false,
            GameOutcome::Win(side) if side == human => self.human_wins += 1,
            GameOutcome::Win(_) => self.ai_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }
        true
    }

    pub fn rounds(&self) -> u32 {
        self.human_wins + self.ai_wins + self.draws
    }
}

/// A human against the engine over any number of rounds.
pub struct Session {
    board: Board,
    engine: SearchEngine,
    difficulty: Difficulty,
    human: Side,
    score: Score,
}

impl Session {
    /// New session with the human moving first as `Side::A`.
    pub fn new(engine: SearchEngine, difficulty: Difficulty) -> Self {
        Session {
            board: Board::new(),
            engine,
            difficulty,
            human: Side::A,
            score: Score::default(),
        }
    }

    /// Play the human as `side` instead. Starts a fresh round.
    pub fn with_human_side(mut self, side: Side) -> Self {
        self.human = side;
        self.board = Board::new();
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Takes effect from the next AI move, mid-round included.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if difficulty != self.difficulty {
            log::info!("difficulty changed from {} to {difficulty}", self.difficulty);
        }
        self.difficulty = difficulty;
    }

    pub fn human_side(&self) -> Side {
        self.human
    }

    pub fn ai_side(&self) -> Side {
        self.human.other()
    }

    pub fn is_human_turn(&self) -> bool {
        !self.board.is_terminal() && self.board.side_to_move() == self.human
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.board.is_terminal() && self.board.side_to_move() == self.ai_side()
    }

    /// Discard the current board and start an empty one.
    pub fn new_round(&mut self) {
        self.board = Board::new();
    }

    /// Zero the score and start a new round.
    pub fn reset_scores(&mut self) {
        self.score = Score::default();
        self.new_round();
    }

    /// Drop the human's piece in `column`.
    pub fn play_human(&mut self, column: usize) -> Result<GameOutcome, SessionError> {
        if !self.board.is_terminal() && self.board.side_to_move() != self.human {
            return Err(SessionError::NotHumanTurn);
        }
        let outcome = self.board.apply_move(column, self.human)?;
        self.conclude(outcome);
        Ok(outcome)
    }

    /// Let the engine choose and play its column. Returns the column played.
    ///
    /// Errors other than `NotAiTurn` mean the engine or the caller broke its
    /// contract and should be treated as fatal.
    pub fn play_ai(&mut self) -> Result<(usize, GameOutcome), SessionError> {
        let ai = self.ai_side();
        if !self.board.is_terminal() && self.board.side_to_move() != ai {
            return Err(SessionError::NotAiTurn);
        }

        let column = self.engine.choose_move(&self.board, ai, self.difficulty)?;
        let outcome = self.board.apply_move(column, ai).map_err(|source| {
            log::error!("engine chose illegal column {column}: {source}");
            SessionError::EngineIllegalMove { column, source }
        })?;
        self.conclude(outcome);
        Ok((column, outcome))
    }

    fn conclude(&mut self, outcome: GameOutcome) {
        if self.score.record(outcome, self.human) {
            let score = self.score;
            log::info!(
                "round over: {outcome:?} (human {}, ai {}, draws {})",
                score.human_wins,
                score.ai_wins,
                score.draws
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::{MoveError, SearchError};

    fn session(difficulty: Difficulty) -> Session {
        let engine = SearchEngine::with_seed(EngineConfig::default(), 3).unwrap();
        Session::new(engine, difficulty)
    }

    #[test]
    fn test_score_record() {
        let mut score = Score::default();
        assert!(!score.record(GameOutcome::InProgress, Side::A));
        assert!(score.record(GameOutcome::Win(Side::A), Side::A));
        assert!(score.record(GameOutcome::Win(Side::A), Side::B));
        assert!(score.record(GameOutcome::Draw, Side::A));
        assert_eq!(
            score,
            Score {
                human_wins: 1,
                ai_wins: 1,
                draws: 1
            }
        );
        assert_eq!(score.rounds(), 3);
    }

    #[test]
    fn test_turn_order_enforced() {
        let mut session = session(Difficulty::Medium);
        assert!(session.is_human_turn());
        assert_eq!(session.play_ai(), Err(SessionError::NotAiTurn));

        session.play_human(3).unwrap();
        assert!(session.is_ai_turn());
        assert_eq!(session.play_human(3), Err(SessionError::NotHumanTurn));

        let (column, outcome) = session.play_ai().unwrap();
        assert!(column < 7);
        assert_eq!(outcome, GameOutcome::InProgress);
        assert_eq!(session.board().move_count(), 2);
    }

    #[test]
    fn test_illegal_human_move_is_recoverable() {
        let mut session = session(Difficulty::Easy);
        let err = session.play_human(9).unwrap_err();
        assert_eq!(
            err,
            SessionError::IllegalHumanMove(MoveError::InvalidColumn { column: 9 })
        );
        assert!(!err.is_internal());
        // Still the human's turn
        assert!(session.is_human_turn());
        session.play_human(0).unwrap();
    }

    #[test]
    fn test_ai_blocks_in_session() {
        let mut session = session(Difficulty::Hard);
        // Whenever the human threatens four, the AI must play a blocking column
        for col in [0, 1, 2, 4, 5, 6] {
            if session.board().is_terminal() {
                break;
            }
            session.play_human(col).unwrap();
            if session.board().is_terminal() {
                break;
            }
            let board = *session.board();
            let threats: Vec<usize> = board
                .legal_columns()
                .into_iter()
                .filter(|&c| board.outcome_after(c, Side::A) == Ok(GameOutcome::Win(Side::A)))
                .collect();
            let (ai_col, outcome) = session.play_ai().unwrap();
            if threats.len() == 1 && outcome != GameOutcome::Win(Side::B) {
                assert_eq!(ai_col, threats[0]);
            }
        }
        assert_eq!(session.score().human_wins, 0);
    }

    #[test]
    fn test_round_scored_once() {
        let mut session = session(Difficulty::Medium);
        // Engine plays both sides until the round ends
        let mut engine = SearchEngine::with_seed(EngineConfig::default(), 9).unwrap();
        while !session.board().is_terminal() {
            if session.is_human_turn() {
                let col = engine
                    .choose_move(session.board(), Side::A, Difficulty::Easy)
                    .unwrap();
                session.play_human(col).unwrap();
            } else {
                session.play_ai().unwrap();
            }
        }
        assert_eq!(session.score().rounds(), 1);

        // Further moves are refused and do not change the score
        assert_eq!(
            session.play_human(0),
            Err(SessionError::IllegalHumanMove(MoveError::GameOver))
        );
        assert_eq!(
            session.play_ai(),
            Err(SessionError::Search(SearchError::NoLegalMove))
        );
        assert_eq!(session.score().rounds(), 1);

        session.new_round();
        assert_eq!(session.board().move_count(), 0);
        assert!(session.is_human_turn());
        assert_eq!(session.score().rounds(), 1);

        session.reset_scores();
        assert_eq!(session.score(), Score::default());
    }

    #[test]
    fn test_ai_win_counted_for_ai() {
        let mut session = session(Difficulty::Hard);
        // Human scatters pieces on the edges; Hard wins eventually
        let edges = [0, 6, 0, 6, 0, 6, 1, 5, 1, 5, 1, 5];
        let mut edge = edges.iter().cycle();
        while !session.board().is_terminal() {
            if session.is_human_turn() {
                let board = *session.board();
                let col = edge
                    .by_ref()
                    .take(edges.len())
                    .copied()
                    .find(|&c| !board.is_column_full(c))
                    .or_else(|| board.legal_columns().first().copied())
                    .unwrap();
                session.play_human(col).unwrap();
            } else {
                session.play_ai().unwrap();
            }
        }
        assert_eq!(session.score().ai_wins, 1);
        assert_eq!(session.score().human_wins, 0);
    }

    #[test]
    fn test_ai_moves_first_when_human_is_b() {
        let mut session = session(Difficulty::Medium).with_human_side(Side::B);
        assert_eq!(session.ai_side(), Side::A);
        assert!(session.is_ai_turn());
        session.play_ai().unwrap();
        assert!(session.is_human_turn());
    }

    #[test]
    fn test_difficulty_changes_mid_session() {
        let mut session = session(Difficulty::Easy);
        session.play_human(3).unwrap();
        session.set_difficulty(Difficulty::Hard);
        assert_eq!(session.difficulty(), Difficulty::Hard);
        session.play_ai().unwrap();
        assert_eq!(session.board().move_count(), 2);
    }
}

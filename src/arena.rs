//! Headless matches between two agents.

use serde::Serialize;

use crate::ai::Agent;
use crate::error::MatchError;
use crate::game::{Board, GameOutcome, Side};

/// One finished game of a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecord {
    /// Name of the agent that played `Side::A`.
    pub first_mover: String,
    /// Name of the winning agent, `None` for a draw.
    pub winner: Option<String>,
    pub moves: Vec<usize>,
}

/// Aggregate result of [`play_match`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub first: String,
    pub second: String,
    pub games: usize,
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
    pub average_length: f64,
    pub records: Vec<GameRecord>,
}

impl MatchReport {
    pub fn first_win_rate(&self) -> f64 {
        rate(self.first_wins, self.games)
    }

    pub fn second_win_rate(&self) -> f64 {
        rate(self.second_wins, self.games)
    }

    pub fn draw_rate(&self) -> f64 {
        rate(self.draws, self.games)
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Play one game with `a` as `Side::A`. Returns the final outcome and the
/// columns played in order.
pub fn play_game(
    a: &mut dyn Agent,
    b: &mut dyn Agent,
) -> Result<(GameOutcome, Vec<usize>), MatchError> {
    let mut board = Board::new();
    let mut moves = Vec::new();

    while !board.is_terminal() {
        let side = board.side_to_move();
        let agent: &mut dyn Agent = match side {
            Side::A => &mut *a,
            Side::B => &mut *b,
        };
        let column = agent
            .select_action(&board, side)
            .map_err(|source| MatchError::Search {
                agent: agent.name().to_string(),
                source,
            })?;
        board
            .apply_move(column, side)
            .map_err(|source| MatchError::IllegalAction {
                agent: agent.name().to_string(),
                column,
                source,
            })?;
        moves.push(column);
    }

    Ok((board.outcome(), moves))
}

/// Play `games` games between `first` and `second`, alternating who moves
/// first. `first` opens the even-numbered games.
pub fn play_match(
    first: &mut dyn Agent,
    second: &mut dyn Agent,
    games: usize,
) -> Result<MatchReport, MatchError> {
    let first_name = first.name().to_string();
    let second_name = second.name().to_string();

    let mut report = MatchReport {
        first: first_name.clone(),
        second: second_name.clone(),
        games,
        first_wins: 0,
        second_wins: 0,
        draws: 0,
        average_length: 0.0,
        records: Vec::with_capacity(games),
    };
    let mut total_moves = 0;

    for game_idx in 0..games {
        let first_is_a = game_idx % 2 == 0;
        let (outcome, moves) = if first_is_a {
            play_game(first, second)?
        } else {
            play_game(second, first)?
        };

        let winner = outcome.winner().map(|side| {
            if (side == Side::A) == first_is_a {
                report.first_wins += 1;
                first_name.clone()
            } else {
                report.second_wins += 1;
                second_name.clone()
            }
        });
        if winner.is_none() {
            report.draws += 1;
        }

        log::debug!(
            "game {}/{}: {} in {} moves",
            game_idx + 1,
            games,
            winner.as_deref().unwrap_or("draw"),
            moves.len()
        );

        total_moves += moves.len();
        report.records.push(GameRecord {
            first_mover: if first_is_a {
                first_name.clone()
            } else {
                second_name.clone()
            },
            winner,
            moves,
        });
    }

    report.average_length = rate(total_moves, games);
    log::info!(
        "{} vs {}: {}-{} with {} draws over {} games",
        report.first,
        report.second,
        report.first_wins,
        report.second_wins,
        report.draws,
        games
    );
    Ok(report)
}

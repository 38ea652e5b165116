//! Alpha-beta search over column drops.
//!
//! The engine scores every legal root column with a negamax search to the
//! depth of the requested [`Difficulty`] tier and picks uniformly at random
//! among the best-scoring columns. Tiers can layer a one-ply tactical floor on
//! top (take a win, else block a loss), mix in random moves, search the root in
//! parallel, and bound the search with a node or time budget. A bounded search
//! deepens iteratively and falls back to the deepest completed iteration when
//! the budget runs out.
//!
//! Randomness comes only from the engine's own seedable RNG, so a fixed seed
//! gives a fixed column for a given board, side, and difficulty.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::difficulty::{Difficulty, TierConfig};
use super::heuristic::{ConnectFourHeuristic, Heuristic};
use crate::config::EngineConfig;
use crate::error::{ConfigError, SearchError};
use crate::game::{Board, GameOutcome, Side, COLS};

/// Score of a win on the move. Wins further from the root lose one point per
/// ply so faster wins and slower losses are preferred.
pub const WIN_SCORE: i32 = 1_000_000;

const INF: i32 = WIN_SCORE + 1;

/// Scores at or beyond this magnitude are forced wins or losses.
const DECISIVE_SCORE: i32 = WIN_SCORE - 64;

/// Column ordering: center-first for better alpha-beta pruning.
pub const MOVE_ORDER: [usize; COLS] = [3, 2, 4, 1, 5, 0, 6];

/// Why the engine picked its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum MoveReason {
    /// Tactical floor: the column wins on the spot.
    ImmediateWin,
    /// Tactical floor: the column stops the opponent winning next move.
    Block,
    /// The tier rolled a random move.
    Random,
    /// Best score from the alpha-beta search.
    Search,
}

/// Result of [`SearchEngine::analyze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub column: usize,
    /// Score from the mover's perspective. `None` for random moves and blocks.
    pub score: Option<i32>,
    /// Deepest fully completed search iteration.
    pub depth_reached: usize,
    pub nodes: u64,
    pub reason: MoveReason,
}

/// Shared node counter plus optional limits. Workers on the rayon pool share
/// one budget.
struct Budget {
    nodes: AtomicU64,
    max_nodes: Option<u64>,
    deadline: Option<Instant>,
    armed: bool,
}

impl Budget {
    fn new(tier: &TierConfig) -> Self {
        Budget {
            nodes: AtomicU64::new(0),
            max_nodes: tier.node_budget,
            deadline: tier
                .time_budget_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
            armed: false,
        }
    }

    /// Count one node. Returns true once an armed budget is spent.
    fn tick(&self) -> bool {
        let visited = self.nodes.fetch_add(1, Ordering::Relaxed) + 1;
        if !self.armed {
            return false;
        }
        if self.max_nodes.is_some_and(|max| visited > max) {
            return true;
        }
        visited % 1024 == 0 && self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn visited(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }
}

/// Chooses columns for the computer side.
pub struct SearchEngine {
    config: EngineConfig,
    heuristic: Box<dyn Heuristic>,
    rng: StdRng,
}

impl SearchEngine {
    /// Engine seeded from the OS. Rejects a config that fails validation.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Engine whose random choices are fully determined by `seed`.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: EngineConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let heuristic = Box::new(ConnectFourHeuristic::new(config.heuristic.clone()));
        Ok(SearchEngine {
            config,
            heuristic,
            rng,
        })
    }

    /// Replace the leaf evaluation.
    pub fn with_heuristic(mut self, heuristic: Box<dyn Heuristic>) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Restart the random stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// The validated configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Pick a column for `side` at `difficulty`. Never mutates `board`.
    pub fn choose_move(
        &mut self,
        board: &Board,
        side: Side,
        difficulty: Difficulty,
    ) -> Result<usize, SearchError> {
        self.analyze(board, side, difficulty).map(|report| report.column)
    }

    /// Like [`choose_move`](Self::choose_move), with the reasoning and search
    /// statistics behind the choice.
    pub fn analyze(
        &mut self,
        board: &Board,
        side: Side,
        difficulty: Difficulty,
    ) -> Result<SearchReport, SearchError> {
        let legal = board.legal_columns();
        if legal.is_empty() || board.is_terminal() {
            log::error!("move requested for {side} on a finished board:\n{board}");
            return Err(SearchError::NoLegalMove);
        }

        let tier = self.config.tier(difficulty).clone();

        if tier.tactical_floor {
            if let Some(report) = self.tactical_move(board, side) {
                log::debug!(
                    "{difficulty} {side}: column {} ({:?})",
                    report.column,
                    report.reason
                );
                return Ok(report);
            }
        }

        if tier.random_move_probability > 0.0 && self.rng.random_bool(tier.random_move_probability)
        {
            let column = legal[self.rng.random_range(0..legal.len())];
            log::debug!("{difficulty} {side}: column {column} (random)");
            return Ok(SearchReport {
                column,
                score: None,
                depth_reached: 0,
                nodes: 0,
                reason: MoveReason::Random,
            });
        }

        let report = self.search(board, side, &tier);
        log::debug!(
            "{difficulty} {side}: column {} score {:?} depth {} nodes {}",
            report.column,
            report.score,
            report.depth_reached,
            report.nodes
        );
        Ok(report)
    }

    /// One-ply safety net: an immediate win, or else a block of the
    /// opponent's immediate win.
    fn tactical_move(&mut self, board: &Board, side: Side) -> Option<SearchReport> {
        let wins = columns_winning_for(board, side);
        if !wins.is_empty() {
            let column = wins[self.rng.random_range(0..wins.len())];
            return Some(SearchReport {
                column,
                score: Some(WIN_SCORE - 1),
                depth_reached: 1,
                nodes: 0,
                reason: MoveReason::ImmediateWin,
            });
        }

        let threats = columns_winning_for(board, side.other());
        if !threats.is_empty() {
            let column = threats[self.rng.random_range(0..threats.len())];
            return Some(SearchReport {
                column,
                score: None,
                depth_reached: 1,
                nodes: 0,
                reason: MoveReason::Block,
            });
        }

        None
    }

    fn search(&mut self, board: &Board, side: Side, tier: &TierConfig) -> SearchReport {
        let mut budget = Budget::new(tier);
        let max_depth = tier.depth.max(1);
        let first_depth = if tier.is_bounded() { 1 } else { max_depth };

        let mut depth_reached = first_depth;
        // The first iteration always completes: the budget is not armed yet.
        let mut scored = self
            .score_root(board, side, first_depth, tier.parallel_root, &budget)
            .unwrap_or_default();
        budget.armed = true;

        for depth in first_depth + 1..=max_depth {
            if best_score(&scored).abs() >= DECISIVE_SCORE {
                break;
            }
            match self.score_root(board, side, depth, tier.parallel_root, &budget) {
                Some(deeper) => {
                    scored = deeper;
                    depth_reached = depth;
                }
                None => {
                    log::debug!(
                        "search budget spent after {} nodes, keeping depth {depth_reached}",
                        budget.visited()
                    );
                    break;
                }
            }
        }

        let best = best_score(&scored);
        let ties: Vec<usize> = scored
            .iter()
            .filter(|&&(_, score)| score == best)
            .map(|&(col, _)| col)
            .collect();
        let column = ties[self.rng.random_range(0..ties.len())];

        SearchReport {
            column,
            score: Some(best),
            depth_reached,
            nodes: budget.visited(),
            reason: MoveReason::Search,
        }
    }

    /// Exact score of every legal root column, in `MOVE_ORDER`. `None` if
    /// the budget ran out part way.
    fn score_root(
        &self,
        board: &Board,
        side: Side,
        depth: usize,
        parallel: bool,
        budget: &Budget,
    ) -> Option<Vec<(usize, i32)>> {
        let columns: Vec<usize> = MOVE_ORDER
            .iter()
            .copied()
            .filter(|&col| !board.is_column_full(col))
            .collect();

        if parallel {
            // Each branch searches its own copy of the board with a full
            // window, so every score is exact.
            return columns
                .par_iter()
                .map(|&col| {
                    self.score_move(board, side, col, depth, -INF, INF, budget)
                        .map(|score| (col, score))
                })
                .collect();
        }

        let mut scored = Vec::with_capacity(columns.len());
        let mut best = -INF;
        for col in columns {
            // Lower bound one below the best so far: columns tying the best
            // come back exact, worse ones come back below it.
            let score = self.score_move(board, side, col, depth, best - 1, INF, budget)?;
            best = best.max(score);
            scored.push((col, score));
        }
        Some(scored)
    }

    #[allow(clippy::too_many_arguments)]
    fn score_move(
        &self,
        board: &Board,
        side: Side,
        col: usize,
        depth: usize,
        alpha: i32,
        beta: i32,
        budget: &Budget,
    ) -> Option<i32> {
        let mut child = *board;
        match child.drop_piece(col, side) {
            GameOutcome::Win(_) => Some(WIN_SCORE - 1),
            GameOutcome::Draw => Some(0),
            GameOutcome::InProgress => {
                let score =
                    self.negamax(&child, side.other(), depth - 1, 1, -beta, -alpha, budget)?;
                Some(-score)
            }
        }
    }

    /// Negamax with alpha-beta pruning. `side` is to move on `board`, which
    /// sits `ply` half-moves below the root. Returns `None` when the budget
    /// runs out.
    #[allow(clippy::too_many_arguments)]
    fn negamax(
        &self,
        board: &Board,
        side: Side,
        depth: usize,
        ply: usize,
        mut alpha: i32,
        beta: i32,
        budget: &Budget,
    ) -> Option<i32> {
        if budget.tick() {
            return None;
        }
        if depth == 0 {
            return Some(self.heuristic.evaluate(board, side));
        }

        let mut best = -INF;
        for &col in &MOVE_ORDER {
            if board.is_column_full(col) {
                continue;
            }
            let mut child = *board;
            let score = match child.drop_piece(col, side) {
                GameOutcome::Win(_) => WIN_SCORE - (ply as i32 + 1),
                GameOutcome::Draw => 0,
                GameOutcome::InProgress => {
                    -self.negamax(&child, side.other(), depth - 1, ply + 1, -beta, -alpha, budget)?
                }
            };
            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        Some(best)
    }
}

/// Legal columns where `side` would complete a line right now, in
/// `MOVE_ORDER`.
fn columns_winning_for(board: &Board, side: Side) -> Vec<usize> {
    MOVE_ORDER
        .iter()
        .copied()
        .filter(|&col| matches!(board.outcome_after(col, side), Ok(GameOutcome::Win(_))))
        .collect()
}

fn best_score(scored: &[(usize, i32)]) -> i32 {
    scored.iter().map(|&(_, score)| score).max().unwrap_or(-INF)
}

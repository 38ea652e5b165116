use serde::{Deserialize, Serialize};

use crate::game::{Board, Cell, Side, COLS, ROWS};

/// Trait for evaluating a board position from a side's perspective.
pub trait Heuristic: Send + Sync {
    fn evaluate(&self, board: &Board, side: Side) -> i32;
}

/// Relative value of a piece in each column. Central columns take part in
/// more potential lines than edge columns.
const COLUMN_PROFILE: [i32; COLS] = [0, 1, 2, 3, 2, 1, 0];

/// Line directions for window scanning: right, down, down-right, down-left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Weights of the static evaluation at the search horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Window with three own pieces and one empty cell.
    pub own_three: i32,
    /// Window with two own pieces and two empty cells.
    pub own_two: i32,
    /// Penalty for a window with three opponent pieces and one empty cell.
    pub opponent_three: i32,
    /// Penalty for a window with two opponent pieces and two empty cells.
    pub opponent_two: i32,
    /// Per-piece bonus, scaled by `COLUMN_PROFILE`.
    pub center: i32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        HeuristicWeights {
            own_three: 50,
            own_two: 10,
            opponent_three: 80,
            opponent_two: 10,
            center: 1,
        }
    }
}

/// Default heuristic that scans all 4-cell windows and scores threats.
#[derive(Debug, Clone, Default)]
pub struct ConnectFourHeuristic {
    weights: HeuristicWeights,
}

impl ConnectFourHeuristic {
    pub fn new(weights: HeuristicWeights) -> Self {
        ConnectFourHeuristic { weights }
    }

    /// Weights this heuristic scores with.
    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    fn score_window(&self, own: usize, opp: usize, empty: usize) -> i32 {
        let w = &self.weights;
        match (own, opp, empty) {
            (3, 0, 1) => w.own_three,
            (2, 0, 2) => w.own_two,
            (0, 3, 1) => -w.opponent_three,
            (0, 2, 2) => -w.opponent_two,
            _ => 0,
        }
    }
}

impl Heuristic for ConnectFourHeuristic {
    fn evaluate(&self, board: &Board, side: Side) -> i32 {
        let own_cell = side.to_cell();
        let opp_cell = side.other().to_cell();
        let mut score = 0;

        // Column bonus
        for row in 0..ROWS {
            for col in 0..COLS {
                let cell = board.get(row, col);
                if cell == own_cell {
                    score += self.weights.center * COLUMN_PROFILE[col];
                } else if cell == opp_cell {
                    score -= self.weights.center * COLUMN_PROFILE[col];
                }
            }
        }

        // Every 4-cell window that fits on the board
        for row in 0..ROWS {
            for col in 0..COLS {
                for &(dr, dc) in &DIRECTIONS {
                    let end_row = row as isize + 3 * dr;
                    let end_col = col as isize + 3 * dc;
                    if end_row >= ROWS as isize || end_col < 0 || end_col >= COLS as isize {
                        continue;
                    }

                    let (mut own, mut opp, mut empty) = (0, 0, 0);
                    for i in 0..4 {
                        let r = (row as isize + i * dr) as usize;
                        let c = (col as isize + i * dc) as usize;
                        match board.get(r, c) {
                            Cell::Empty => empty += 1,
                            cell if cell == own_cell => own += 1,
                            _ => opp += 1,
                        }
                    }
                    score += self.score_window(own, opp, empty);
                }
            }
        }

        score
    }
}

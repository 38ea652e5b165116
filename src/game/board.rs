use std::fmt;

use smallvec::SmallVec;

use super::{GameOutcome, Side};
use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
pub const CELLS: usize = ROWS * COLS;

/// Columns that still accept a piece, in ascending order.
pub type LegalColumns = SmallVec<[usize; COLS]>;

/// The four line directions through a cell: horizontal, vertical, and both
/// diagonals. Each is scanned both ways.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    A,
    B,
}

impl Cell {
    /// The side occupying this cell, if any
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::A => Some(Side::A),
            Cell::B => Some(Side::B),
        }
    }

    fn symbol(self) -> char {
        self.side().map_or('.', Side::symbol)
    }
}

/// A 7x6 Connect Four grid.
///
/// Row 0 is the top, row 5 is the bottom. `heights` is the per-column fill
/// pointer and always equals the number of occupied cells in that column.
/// `outcome` is recomputed on every placement from the lines through the
/// placed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
    heights: [u8; COLS],
    last_move: Option<(usize, usize)>,
    outcome: GameOutcome,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
            heights: [0; COLS],
            last_move: None,
            outcome: GameOutcome::InProgress,
        }
    }

    /// Build a board by playing `columns` in order, starting with `Side::A`.
    pub fn from_moves(columns: &[usize]) -> Result<Self, MoveError> {
        let mut board = Board::new();
        for &col in columns {
            let side = board.side_to_move();
            board.apply_move(col, side)?;
        }
        Ok(board)
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Number of pieces in a column
    pub fn column_height(&self, col: usize) -> usize {
        self.heights[col] as usize
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        col >= COLS || self.heights[col] as usize == ROWS
    }

    /// Every column with fewer than `ROWS` pieces
    pub fn legal_columns(&self) -> LegalColumns {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Total pieces on the board
    pub fn move_count(&self) -> usize {
        self.heights.iter().map(|&h| h as usize).sum()
    }

    /// The side whose turn it is, by move-count parity
    pub fn side_to_move(&self) -> Side {
        if self.move_count() % 2 == 0 {
            Side::A
        } else {
            Side::B
        }
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.move_count() == CELLS
    }

    /// Position `(row, col)` of the most recent placement
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// Outcome as of the most recent placement
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// Check if the round has ended in a win or a draw
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Place `side`'s piece in `col` and return the resulting outcome.
    ///
    /// Fails if the round is over, the column is out of range or full, or it
    /// is not `side`'s turn.
    pub fn apply_move(&mut self, col: usize, side: Side) -> Result<GameOutcome, MoveError> {
        self.check_playable(col)?;
        let expected = self.side_to_move();
        if side != expected {
            return Err(MoveError::OutOfTurn {
                expected,
                got: side,
            });
        }
        Ok(self.drop_piece(col, side))
    }

    /// Outcome `side` would reach by playing `col`, without touching `self`.
    ///
    /// Turn order is not enforced so either side's threats can be probed.
    pub fn outcome_after(&self, col: usize, side: Side) -> Result<GameOutcome, MoveError> {
        self.check_playable(col)?;
        let mut probe = *self;
        Ok(probe.drop_piece(col, side))
    }

    fn check_playable(&self, col: usize) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if col >= COLS {
            return Err(MoveError::InvalidColumn { column: col });
        }
        if self.is_column_full(col) {
            return Err(MoveError::ColumnFull { column: col });
        }
        Ok(())
    }

    /// Drop a piece without validation. The caller guarantees `col` is legal
    /// and the round is still in progress.
    pub(crate) fn drop_piece(&mut self, col: usize, side: Side) -> GameOutcome {
        debug_assert!(!self.is_column_full(col), "drop into full column {col}");
        let row = ROWS - 1 - self.heights[col] as usize;
        self.cells[row][col] = side.to_cell();
        self.heights[col] += 1;
        self.last_move = Some((row, col));

        self.outcome = if self.check_win(row, col) {
            GameOutcome::Win(side)
        } else if self.is_full() {
            GameOutcome::Draw
        } else {
            GameOutcome::InProgress
        };
        self.outcome
    }

    /// Check if the piece at (row, col) completes a line of four or more
    pub fn check_win(&self, row: usize, col: usize) -> bool {
        let cell = self.get(row, col);
        if cell == Cell::Empty {
            return false;
        }
        DIRECTIONS
            .iter()
            .any(|&(dr, dc)| self.line_length(row, col, dr, dc, cell) >= 4)
    }

    /// Contiguous run of `cell` through (row, col) along one direction,
    /// looking at most 3 cells each way.
    fn line_length(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        1 + self.run(row, col, dr, dc, cell) + self.run(row, col, -dr, -dc, cell)
    }

    fn run(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        let mut count = 0;
        let (mut r, mut c) = (row as isize, col as isize);
        for _ in 0..3 {
            r += dr;
            c += dc;
            if r < 0 || c < 0 || r >= ROWS as isize || c >= COLS as isize {
                break;
            }
            if self.cells[r as usize][c as usize] != cell {
                break;
            }
            count += 1;
        }
        count
    }

    /// Cells of the winning line through the last move, top row first.
    pub fn winning_line(&self) -> Option<Vec<(usize, usize)>> {
        if self.outcome.winner().is_none() {
            return None;
        }
        let (row, col) = self.last_move?;
        let cell = self.get(row, col);

        for &(dr, dc) in &DIRECTIONS {
            if self.line_length(row, col, dr, dc, cell) < 4 {
                continue;
            }
            let back = self.run(row, col, -dr, -dc, cell) as isize;
            let forward = self.run(row, col, dr, dc, cell) as isize;
            let mut line: Vec<(usize, usize)> = (-back..=forward)
                .map(|i| {
                    (
                        (row as isize + dr * i) as usize,
                        (col as isize + dc * i) as usize,
                    )
                })
                .collect();
            line.sort_unstable();
            return Some(line);
        }
        None
    }

    /// The board reflected left to right
    pub fn mirrored(&self) -> Board {
        let mut mirrored = *self;
        for row in 0..ROWS {
            for col in 0..COLS {
                mirrored.cells[row][col] = self.cells[row][COLS - 1 - col];
            }
        }
        for col in 0..COLS {
            mirrored.heights[col] = self.heights[COLS - 1 - col];
        }
        mirrored.last_move = self.last_move.map(|(row, col)| (row, COLS - 1 - col));
        mirrored
    }

    /// The board with every piece handed to the other side
    pub fn swapped(&self) -> Board {
        let mut swapped = *self;
        for row in swapped.cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell = match *cell {
                    Cell::Empty => Cell::Empty,
                    Cell::A => Cell::B,
                    Cell::B => Cell::A,
                };
            }
        }
        swapped.outcome = self.outcome.swapped();
        swapped
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            let line: String = (0..COLS).map(|col| self.cells[row][col].symbol()).collect();
            writeln!(f, "{line}")?;
        }
        write!(f, "0123456")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// A full-length game that fills every cell without a line of four.
    const DRAW_SEQUENCE: [usize; 42] = [
        5, 4, 5, 0, 6, 2, 4, 5, 5, 0, 4, 1, 1, 0, 4, 5, 6, 5, 3, 1, 1, 2, 2, 6, 2, 6, 6, 3, 6, 2,
        0, 3, 0, 3, 3, 4, 3, 1, 4, 2, 1, 0,
    ];

    fn random_game(seed: u64) -> Vec<Board> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::new();
        let mut history = vec![board];
        while !board.is_terminal() {
            let legal = board.legal_columns();
            let col = legal[rng.random_range(0..legal.len())];
            let side = board.side_to_move();
            board.apply_move(col, side).unwrap();
            history.push(board);
        }
        history
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
        assert_eq!(board.move_count(), 0);
        assert_eq!(board.side_to_move(), Side::A);
        assert_eq!(board.outcome(), GameOutcome::InProgress);
        assert_eq!(board.legal_columns().as_slice(), &[0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_apply_move() {
        let mut board = Board::new();

        let outcome = board.apply_move(3, Side::A).unwrap();
        assert_eq!(outcome, GameOutcome::InProgress);
        assert_eq!(board.get(5, 3), Cell::A); // Bottom row
        assert_eq!(board.column_height(3), 1);
        assert_eq!(board.last_move(), Some((5, 3)));

        board.apply_move(3, Side::B).unwrap();
        assert_eq!(board.get(4, 3), Cell::B); // Stacked on the first piece
        assert_eq!(board.column_height(3), 2);
        assert_eq!(board.side_to_move(), Side::A);
    }

    #[test]
    fn test_column_full() {
        let mut board = Board::from_moves(&[0, 0, 0, 0, 0, 0]).unwrap();

        assert!(board.is_column_full(0));
        assert!(!board.legal_columns().contains(&0));
        assert_eq!(
            board.apply_move(0, Side::A),
            Err(MoveError::ColumnFull { column: 0 })
        );
        assert_eq!(board.column_height(0), ROWS);
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert_eq!(
            board.apply_move(7, Side::A),
            Err(MoveError::InvalidColumn { column: 7 })
        );
        assert_eq!(board.move_count(), 0);
    }

    #[test]
    fn test_out_of_turn() {
        let mut board = Board::new();
        assert_eq!(
            board.apply_move(2, Side::B),
            Err(MoveError::OutOfTurn {
                expected: Side::A,
                got: Side::B
            })
        );
        assert_eq!(board.move_count(), 0);
    }

    #[test]
    fn test_move_after_win_rejected() {
        // A wins along the bottom row
        let mut board = Board::from_moves(&[0, 0, 1, 1, 2, 2, 3]).unwrap();
        assert_eq!(board.outcome(), GameOutcome::Win(Side::A));
        assert_eq!(board.apply_move(6, Side::B), Err(MoveError::GameOver));
        assert_eq!(board.outcome_after(6, Side::B), Err(MoveError::GameOver));
    }

    #[test]
    fn test_apply_move_increments_only_target_column() {
        for seed in 0..20 {
            let history = random_game(seed);
            for pair in history.windows(2) {
                let (before, after) = (pair[0], pair[1]);
                let (_, col) = after.last_move().unwrap();
                for c in 0..COLS {
                    let expected = before.column_height(c) + usize::from(c == col);
                    assert_eq!(after.column_height(c), expected);
                }
            }
        }
    }

    #[test]
    fn test_horizontal_win() {
        let board = Board::from_moves(&[0, 0, 1, 1, 2, 2, 3]).unwrap();
        assert!(board.check_win(5, 2));
        assert_eq!(board.outcome(), GameOutcome::Win(Side::A));
        assert!(board.is_terminal());
    }

    #[test]
    fn test_vertical_win() {
        let board = Board::from_moves(&[0, 3, 1, 3, 0, 3, 1, 3]).unwrap();
        assert_eq!(board.outcome(), GameOutcome::Win(Side::B));
        assert_eq!(
            board.winning_line(),
            Some(vec![(2, 3), (3, 3), (4, 3), (5, 3)])
        );
    }

    #[test]
    fn test_diagonal_up_win() {
        // A builds a / diagonal from (5,0) to (2,3)
        let board = Board::from_moves(&[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3]).unwrap();
        assert_eq!(board.outcome(), GameOutcome::Win(Side::A));
        assert_eq!(
            board.winning_line(),
            Some(vec![(2, 3), (3, 2), (4, 1), (5, 0)])
        );
    }

    #[test]
    fn test_diagonal_down_win() {
        // Mirror image of the / diagonal
        let board = Board::from_moves(&[6, 5, 5, 4, 4, 3, 4, 3, 3, 0, 3]).unwrap();
        assert_eq!(board.outcome(), GameOutcome::Win(Side::A));
        let line = board.winning_line().unwrap();
        assert_eq!(line.len(), 4);
        assert!(line.contains(&(5, 6)));
        assert!(line.contains(&(2, 3)));
    }

    #[test]
    fn test_win_by_filling_middle_gap() {
        // A holds 0,1 and 3 on the bottom row, then fills the gap at 2
        let board = Board::from_moves(&[0, 6, 1, 6, 3, 5, 2]).unwrap();
        assert_eq!(board.outcome(), GameOutcome::Win(Side::A));
        assert_eq!(
            board.winning_line(),
            Some(vec![(5, 0), (5, 1), (5, 2), (5, 3)])
        );
    }

    #[test]
    fn test_no_win_with_three() {
        let board = Board::from_moves(&[0, 0, 1, 1, 2]).unwrap();
        assert!(!board.check_win(5, 1));
        assert_eq!(board.outcome(), GameOutcome::InProgress);
        assert_eq!(board.winning_line(), None);
    }

    #[test]
    fn test_outcome_after_does_not_mutate() {
        let board = Board::from_moves(&[0, 0, 1, 1, 2, 2]).unwrap();
        let before = board;
        assert_eq!(board.outcome_after(3, Side::A), Ok(GameOutcome::Win(Side::A)));
        // Probing the side not to move is allowed
        assert_eq!(board.outcome_after(3, Side::B), Ok(GameOutcome::InProgress));
        assert_eq!(board.outcome_after(5, Side::A), Ok(GameOutcome::InProgress));
        assert_eq!(board, before);
    }

    #[test]
    fn test_outcome_after_matches_apply() {
        for seed in 100..120 {
            let history = random_game(seed);
            for pair in history.windows(2) {
                let (before, after) = (pair[0], pair[1]);
                let (_, col) = after.last_move().unwrap();
                let side = before.side_to_move();
                assert_eq!(before.outcome_after(col, side), Ok(after.outcome()));
            }
        }
    }

    #[test]
    fn test_full_board_draw() {
        let board = Board::from_moves(&DRAW_SEQUENCE).unwrap();
        assert!(board.is_full());
        assert!(board.is_terminal());
        assert_eq!(board.outcome(), GameOutcome::Draw);
        assert!(board.legal_columns().is_empty());
        assert_eq!(board.winning_line(), None);
    }

    #[test]
    fn test_at_most_one_outcome_per_position() {
        for seed in 0..200 {
            let history = random_game(seed);
            let terminal_positions = history.iter().filter(|b| b.is_terminal()).count();
            assert_eq!(terminal_positions, 1, "seed {seed}");
            let last = history.last().unwrap();
            if let GameOutcome::Win(side) = last.outcome() {
                let (row, col) = last.last_move().unwrap();
                assert_eq!(last.get(row, col).side(), Some(side));
            }
        }
    }

    #[test]
    fn test_win_detection_symmetric_under_mirror() {
        for seed in 300..350 {
            for board in random_game(seed) {
                let mirrored = board.mirrored();
                if let Some((row, col)) = board.last_move() {
                    assert_eq!(board.check_win(row, col), mirrored.check_win(row, COLS - 1 - col));
                }
                assert_eq!(mirrored.outcome(), board.outcome());
                assert_eq!(mirrored.mirrored(), board);
            }
        }
    }

    #[test]
    fn test_win_detection_symmetric_under_side_swap() {
        for seed in 400..450 {
            for board in random_game(seed) {
                let swapped = board.swapped();
                if let Some((row, col)) = board.last_move() {
                    assert_eq!(board.check_win(row, col), swapped.check_win(row, col));
                    assert_eq!(
                        swapped.get(row, col).side(),
                        board.get(row, col).side().map(Side::other)
                    );
                }
                assert_eq!(swapped.outcome(), board.outcome().swapped());
            }
        }
    }

    #[test]
    fn test_display() {
        let board = Board::from_moves(&[3, 3]).unwrap();
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), ROWS + 1);
        assert_eq!(lines[4], "...O...");
        assert_eq!(lines[5], "...X...");
    }
}

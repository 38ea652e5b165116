//! Core Connect Four game logic: the board with gravity and local win
//! detection, the two sides, and round outcomes.

mod board;
mod outcome;
mod side;

pub use board::{Board, Cell, LegalColumns, CELLS, COLS, ROWS};
pub use outcome::GameOutcome;
pub use side::Side;

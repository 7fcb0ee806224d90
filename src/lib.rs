//! A perfect opponent for playing or analysing the board game 'Tic-tac-toe'
//!
//! The optimal opponent uses an exhaustive game tree search to find the
//! mathematically best move for any position. A trivial opponent that takes
//! the first free cell is available as well.
//!
//! # Basic Usage
//!
//! ```
//! use tictactoe_ai::{board::{Board, Move, Player}, solver::Solver};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // X to play, with two in a row along the top
//! let board: Board = "XX_/OO_/___".parse()?;
//! let mut solver = Solver::new(board, Player::X);
//! let (score, best_move) = solver.best_move()?;
//!
//! assert!((score, best_move) == (10, Move::new(0, 2)));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod solver;

pub mod strategy;

pub mod session;

pub mod analysis;

pub mod prompt;

mod test;

/// The width and height of the game board in cells
pub const SIZE: usize = 3;

/// The number of cells on the game board
pub const CELLS: usize = SIZE * SIZE;

// ensure that the board fits in a u32 key with two bits per cell
const_assert!(2 * CELLS <= 32);

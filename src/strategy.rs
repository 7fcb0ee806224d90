use anyhow::{anyhow, Error, Result};

use std::fmt;
use std::str::FromStr;

use crate::{
    board::{Board, Move, Player},
    solver::{first_available_move, Solver},
};

/// How the computer picks its moves, chosen once per session
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Strategy {
    /// Full minimax search, never loses
    Optimal,
    /// Takes the first empty cell in row-major order
    FirstAvailable,
}

impl Strategy {
    /// Chooses a move for `computer`, along with the search score when the
    /// strategy computes one
    ///
    /// Fails if the board is already won or full.
    pub fn choose_move(&self, board: &Board, computer: Player) -> Result<(Move, Option<i32>)> {
        match self {
            Strategy::Optimal => {
                let mut solver = Solver::new(*board, computer);
                let (score, best_move) = solver.best_move()?;
                Ok((best_move, Some(score)))
            }
            Strategy::FirstAvailable => Ok((first_available_move(board)?, None)),
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "optimal" | "minimax" => Ok(Strategy::Optimal),
            "2" | "easy" | "first-available" => Ok(Strategy::FirstAvailable),
            other => Err(anyhow!(
                "unknown game mode '{}', expected 'optimal' or 'easy'",
                other
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Optimal => write!(f, "Minimax AI (Optimal)"),
            Strategy::FirstAvailable => write!(f, "Easy AI (First Available Move)"),
        }
    }
}

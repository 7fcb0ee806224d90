//! An agent to solve the game of Tic-tac-toe

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::{
    board::{Board, Cell, Move, Player},
    CELLS,
};

use std::cmp::Ordering;

/// The score of a win on the maximizing side's own move
pub const MAX_SCORE: i32 = 10;
/// The score of a loss on the very next move
pub const MIN_SCORE: i32 = -MAX_SCORE;

// a score's depth term must never overtake the win/loss offset
static_assertions::const_assert!(CELLS < MAX_SCORE as usize);

/// An agent to solve Tic-tac-toe positions
///
/// # Notes
/// This agent performs a plain minimax search over every continuation of
/// the position. With at most 9! move sequences it needs no pruning, move
/// ordering or transposition table.
///
/// # Position Scoring
/// Scores are from the maximizing side's point of view. A win for the
/// maximizer found `depth` plies below the root scores `10 - depth`, a win
/// for the minimizer scores `depth - 10` and a drawn position scores 0, so
/// faster wins and slower losses are preferred.
#[derive(Clone)]
pub struct Solver {
    // working copy, restored after every probe
    board: Board,
    maximizer: Player,
    minimizer: Player,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
}

impl Solver {
    /// Creates a new `Solver` searching on behalf of `maximizer`
    pub fn new(board: Board, maximizer: Player) -> Self {
        Self {
            board,
            maximizer,
            minimizer: maximizer.opponent(),
            node_count: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn maximizer(&self) -> Player {
        self.maximizer
    }

    pub fn minimizer(&self) -> Player {
        self.minimizer
    }

    /// Performs game tree search
    ///
    /// Returns the score of the position (see [Position Scoring]) with
    /// `maximizing` selecting which side places the next mark.
    ///
    /// [Position Scoring]: #position-scoring
    pub fn score(&mut self, depth: i32, maximizing: bool) -> i32 {
        self.node_count += 1;

        if self.board.has_won(self.maximizer) {
            return MAX_SCORE - depth;
        }
        if self.board.has_won(self.minimizer) {
            return depth - MAX_SCORE;
        }
        if self.board.is_full() {
            return 0;
        }

        let (mark, mut best) = if maximizing {
            (self.maximizer, i32::MIN)
        } else {
            (self.minimizer, i32::MAX)
        };

        // collect first, the board is mutated while the candidates are searched
        let candidates: Vec<Move> = self.board.empty_cells().collect();
        for position in candidates {
            self.board.set(position, Cell::Mark(mark));
            let score = self.score(depth + 1, !maximizing);
            self.board.set(position, Cell::Empty);

            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }
        best
    }

    /// Performs the top-level search for the maximizing side
    ///
    /// Returns the score of the position after the chosen move and the move
    /// itself. Ties go to the first move found in row-major order.
    pub fn best_move(&mut self) -> Result<(i32, Move)> {
        let outcome = self.board.outcome();
        if outcome.is_terminal() {
            return Err(anyhow!(
                "cannot search for a move, the game is already over ({:?})",
                outcome
            ));
        }

        let mut best: Option<(i32, Move)> = None;
        let candidates: Vec<Move> = self.board.empty_cells().collect();
        for position in candidates {
            self.board.set(position, Cell::Mark(self.maximizer));
            let score = self.score(0, false);
            self.board.set(position, Cell::Empty);

            match best {
                Some((best_score, _)) if score <= best_score => {}
                _ => best = Some((score, position)),
            }
        }

        let (score, position) =
            best.ok_or_else(|| anyhow!("no empty cell on a board that is not full"))?;
        debug!(
            board = %self.board,
            player = %self.maximizer,
            row = position.row,
            col = position.col,
            score,
            nodes = self.node_count,
            "best move found"
        );
        Ok((score, position))
    }

    /// Converts a score from [`best_move`] into the number of plies left in
    /// the game, counting the move that was just chosen
    ///
    /// [`best_move`]: Solver::best_move
    pub fn plies_to_end(&self, score: i32) -> usize {
        match score.cmp(&0) {
            // a draw fills the board
            Ordering::Equal => CELLS - self.board.num_moves(),
            Ordering::Greater => (MAX_SCORE - score) as usize + 1,
            Ordering::Less => (score - MIN_SCORE) as usize + 1,
        }
    }
}

/// Returns the first empty cell in row-major order, with no lookahead
pub fn first_available_move(board: &Board) -> Result<Move> {
    let outcome = board.outcome();
    if outcome.is_terminal() {
        return Err(anyhow!(
            "cannot pick a move, the game is already over ({:?})",
            outcome
        ));
    }
    board
        .empty_cells()
        .next()
        .ok_or_else(|| anyhow!("no empty cell on a board that is not full"))
}

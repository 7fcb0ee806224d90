//! Exhaustive check of a computer strategy against every possible opponent
//!
//! The computer follows its strategy while the opponent tries every legal
//! move, so every game the strategy can ever be drawn into is played out.

use anyhow::Result;
use indicatif::*;
use rayon::prelude::*;
use tracing::info;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::*;

use crate::{
    board::{Board, GameOutcome, Move, Player},
    strategy::Strategy,
};

/// Totals over every game reachable against a strategy
#[derive(Clone, Default, Debug)]
pub struct Report {
    pub games: usize,
    pub computer_wins: usize,
    pub draws: usize,
    pub computer_losses: usize,
    pub elapsed: Duration,
    positions: HashSet<u32>,
}

impl Report {
    /// The number of distinct boards met on the way
    pub fn unique_positions(&self) -> usize {
        self.positions.len()
    }

    fn merge(mut self, other: Report) -> Self {
        self.games += other.games;
        self.computer_wins += other.computer_wins;
        self.draws += other.draws;
        self.computer_losses += other.computer_losses;
        self.positions.extend(other.positions);
        self
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} games: {} won, {} drawn, {} lost ({} unique positions)",
            self.games,
            self.computer_wins,
            self.draws,
            self.computer_losses,
            self.unique_positions()
        )
    }
}

// walks one branch of the game tree, remembering the computer's choices
struct Explorer {
    strategy: Strategy,
    computer: Player,
    choices: HashMap<u32, Move>,
    report: Report,
}

impl Explorer {
    fn new(strategy: Strategy, computer: Player) -> Self {
        Self {
            strategy,
            computer,
            choices: HashMap::new(),
            report: Report::default(),
        }
    }

    // records the board, returns true once the game is over
    fn visit(&mut self, board: &Board) -> bool {
        self.report.positions.insert(board.key());
        match board.outcome() {
            GameOutcome::InProgress => return false,
            GameOutcome::Draw => self.report.draws += 1,
            GameOutcome::Win(player) if player == self.computer => self.report.computer_wins += 1,
            GameOutcome::Win(_) => self.report.computer_losses += 1,
        }
        self.report.games += 1;
        true
    }

    fn computer_turn(&mut self, board: Board) -> Result<()> {
        if self.visit(&board) {
            return Ok(());
        }

        let position = match self.choices.get(&board.key()) {
            Some(&position) => position,
            None => {
                let (position, _) = self.strategy.choose_move(&board, self.computer)?;
                self.choices.insert(board.key(), position);
                position
            }
        };

        let mut next = board;
        next.play(position, self.computer)?;
        self.human_turn(next)
    }

    fn human_turn(&mut self, board: Board) -> Result<()> {
        if self.visit(&board) {
            return Ok(());
        }

        let human = self.computer.opponent();
        for reply in board.empty_cells() {
            let mut next = board;
            next.play(reply, human)?;
            self.computer_turn(next)?;
        }
        Ok(())
    }
}

/// Plays `strategy` against every sequence of opponent moves
///
/// Branches at the opponent's first move are searched in parallel.
pub fn analyse(strategy: Strategy, computer_first: bool, show_progress: bool) -> Result<Report> {
    let start = Instant::now();
    let computer = if computer_first { Player::X } else { Player::O };
    let human = computer.opponent();

    let mut root = Explorer::new(strategy, computer);
    let mut board = Board::new();
    root.visit(&board);

    // the computer's opening is shared by every branch
    if computer_first {
        let (position, _) = strategy.choose_move(&board, computer)?;
        board.play(position, computer)?;
        root.visit(&board);
    }

    let branches: Vec<Move> = board.empty_cells().collect();

    let progress = if show_progress {
        ProgressBar::new(branches.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Analysing replies: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let reports = branches
        .par_iter()
        .map(|&reply| -> Result<Report> {
            let mut next = board;
            next.play(reply, human)?;

            let mut explorer = Explorer::new(strategy, computer);
            explorer.computer_turn(next)?;

            progress.inc(1);
            Ok(explorer.report)
        })
        .collect::<Result<Vec<Report>>>()?;
    progress.finish();

    let mut report = reports.into_iter().fold(root.report, Report::merge);
    report.elapsed = start.elapsed();

    info!(?strategy, computer_first, %report, "analysis complete");
    Ok(report)
}

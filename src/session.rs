//! Turn order, symbol assignment and scoring across a run of games

use anyhow::{anyhow, Error, Result};
use tracing::{debug, info};

use std::fmt;
use std::str::FromStr;

use crate::{
    board::{Board, GameOutcome, Move, Player},
    strategy::Strategy,
};

/// The side that places the next mark
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Turn {
    Human,
    Computer,
}

impl Turn {
    pub fn other(self) -> Self {
        match self {
            Turn::Human => Turn::Computer,
            Turn::Computer => Turn::Human,
        }
    }
}

impl FromStr for Turn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "human" | "me" => Ok(Turn::Human),
            "computer" | "ai" => Ok(Turn::Computer),
            other => Err(anyhow!(
                "unknown player '{}', expected 'human' or 'computer'",
                other
            )),
        }
    }
}

/// Finished games of a session
#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub struct Scoreboard {
    pub human_wins: usize,
    pub computer_wins: usize,
    pub draws: usize,
}

impl Scoreboard {
    pub fn games(&self) -> usize {
        self.human_wins + self.computer_wins + self.draws
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You {} - {} Computer ({} drawn)",
            self.human_wins, self.computer_wins, self.draws
        )
    }
}

/// A run of games against one computer strategy
///
/// The side that moves first takes `X`, and the first move alternates
/// between the human and the computer from one game to the next.
#[derive(Clone, Debug)]
pub struct Session {
    strategy: Strategy,
    next_first: Turn,
    scoreboard: Scoreboard,
}

impl Session {
    pub fn new(strategy: Strategy, first: Turn) -> Self {
        Self {
            strategy,
            next_first: first,
            scoreboard: Scoreboard::default(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    /// Starts a game on a fresh board
    pub fn new_game(&mut self) -> Game {
        let first = self.next_first;
        self.next_first = first.other();

        let (human, computer) = match first {
            Turn::Human => (Player::X, Player::O),
            Turn::Computer => (Player::O, Player::X),
        };
        info!(?first, %human, %computer, strategy = ?self.strategy, "new game");

        Game {
            board: Board::new(),
            human,
            computer,
            strategy: self.strategy,
            to_move: first,
        }
    }

    /// Adds a finished game to the scoreboard
    pub fn record(&mut self, game: &Game) -> Result<()> {
        match game.outcome() {
            GameOutcome::InProgress => {
                return Err(anyhow!("cannot record a game that is still in progress"))
            }
            GameOutcome::Draw => self.scoreboard.draws += 1,
            GameOutcome::Win(player) if player == game.human => self.scoreboard.human_wins += 1,
            GameOutcome::Win(_) => self.scoreboard.computer_wins += 1,
        }
        info!(scoreboard = %self.scoreboard, "game recorded");
        Ok(())
    }
}

/// A single game: the board, the symbol assignment and the side to move
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    human: Player,
    computer: Player,
    strategy: Strategy,
    to_move: Turn,
}

impl Game {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn human(&self) -> Player {
        self.human
    }

    pub fn computer(&self) -> Player {
        self.computer
    }

    pub fn to_move(&self) -> Turn {
        self.to_move
    }

    pub fn outcome(&self) -> GameOutcome {
        self.board.outcome()
    }

    fn check_turn(&self, turn: Turn) -> Result<()> {
        let outcome = self.outcome();
        if outcome.is_terminal() {
            return Err(anyhow!("the game is already over ({:?})", outcome));
        }
        if self.to_move != turn {
            return Err(anyhow!("it is not the {:?} player's turn", turn));
        }
        Ok(())
    }

    /// Plays the human's mark, rejecting occupied cells and out-of-turn moves
    pub fn play_human(&mut self, position: Move) -> Result<GameOutcome> {
        self.check_turn(Turn::Human)?;
        self.board.play(position, self.human)?;
        self.to_move = Turn::Computer;

        debug!(board = %self.board, row = position.row, col = position.col, "human played");
        Ok(self.outcome())
    }

    /// Lets the computer strategy play its mark
    ///
    /// Returns the chosen move and the search score, if the strategy
    /// computes one.
    pub fn play_computer(&mut self) -> Result<(Move, Option<i32>)> {
        self.check_turn(Turn::Computer)?;
        let (position, score) = self.strategy.choose_move(&self.board, self.computer)?;
        self.board.play(position, self.computer)?;
        self.to_move = Turn::Human;

        debug!(board = %self.board, row = position.row, col = position.col, ?score, "computer played");
        Ok((position, score))
    }
}

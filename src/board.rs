use anyhow::{anyhow, Error, Result};

use std::fmt;
use std::str::FromStr;

use crate::{CELLS, SIZE};

/// One of the two marks placed on the board. `X` always moves first.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Returns the mark of the other side
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    Empty,
    Mark(Player),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    fn code(self) -> u32 {
        match self {
            Cell::Empty => 0b00,
            Cell::Mark(Player::X) => 0b01,
            Cell::Mark(Player::O) => 0b10,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, " "),
            Cell::Mark(player) => write!(f, "{}", player),
        }
    }
}

/// A cell coordinate, zero-indexed from the top left corner
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    fn in_range(&self) -> bool {
        self.row < SIZE && self.col < SIZE
    }
}

impl fmt::Display for Move {
    // one-indexed, as shown to the player
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}, column {}", self.row + 1, self.col + 1)
    }
}

/// The classification of a board, computed on demand
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameOutcome {
    InProgress,
    Win(Player),
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

/// The 3 rows, 3 columns and 2 diagonals that win the game
pub const LINES: [[Move; SIZE]; 8] = [
    [Move::new(0, 0), Move::new(0, 1), Move::new(0, 2)],
    [Move::new(1, 0), Move::new(1, 1), Move::new(1, 2)],
    [Move::new(2, 0), Move::new(2, 1), Move::new(2, 2)],
    [Move::new(0, 0), Move::new(1, 0), Move::new(2, 0)],
    [Move::new(0, 1), Move::new(1, 1), Move::new(2, 1)],
    [Move::new(0, 2), Move::new(1, 2), Move::new(2, 2)],
    [Move::new(0, 0), Move::new(1, 1), Move::new(2, 2)],
    [Move::new(0, 2), Move::new(1, 1), Move::new(2, 0)],
];

/// A 3x3 tic-tac-toe board
///
/// Boards are plain values: copying one never shares cells with the source board.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    cells: [[Cell; SIZE]; SIZE], // indexed [row][col]
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; SIZE]; SIZE],
        }
    }

    pub fn get(&self, position: Move) -> Cell {
        self.cells[position.row][position.col]
    }

    /// Places `player`'s mark, rejecting cells that are out of range or taken
    pub fn play(&mut self, position: Move, player: Player) -> Result<()> {
        if !position.in_range() {
            return Err(anyhow!(
                "Invalid move, ({}, {}) is off the board. Rows and columns must be between 1 and {}",
                position.row + 1,
                position.col + 1,
                SIZE
            ));
        }
        if !self.get(position).is_empty() {
            return Err(anyhow!("Invalid move, {} is already taken", position));
        }
        self.set(position, Cell::Mark(player));
        Ok(())
    }

    // unchecked, the search uses this to place and undo probes
    pub(crate) fn set(&mut self, position: Move, cell: Cell) {
        self.cells[position.row][position.col] = cell;
    }

    /// Iterates over the empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Move> + '_ {
        (0..CELLS)
            .map(|i| Move::new(i / SIZE, i % SIZE))
            .filter(move |&position| self.get(position).is_empty())
    }

    pub fn num_moves(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// Returns true if `player` owns every cell of any row, column or diagonal
    pub fn has_won(&self, player: Player) -> bool {
        let mark = Cell::Mark(player);
        LINES
            .iter()
            .any(|line| line.iter().all(|&position| self.get(position) == mark))
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    pub fn outcome(&self) -> GameOutcome {
        if self.has_won(Player::X) {
            GameOutcome::Win(Player::X)
        } else if self.has_won(Player::O) {
            GameOutcome::Win(Player::O)
        } else if self.is_full() {
            GameOutcome::Draw
        } else {
            GameOutcome::InProgress
        }
    }

    // key for position deduplication, two bits per cell in row-major order
    pub fn key(&self) -> u32 {
        self.cells
            .iter()
            .flatten()
            .fold(0, |key, cell| (key << 2) | cell.code())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parses rows separated by `/` or newlines, e.g. `"X__/_O_/___"`.
    /// Empty cells may be written as `_`, `.` or a space.
    fn from_str(s: &str) -> Result<Self> {
        let rows: Vec<&str> = s
            .split(|c| c == '/' || c == '\n')
            .map(|row| row.trim_end_matches('\r'))
            .filter(|row| !row.is_empty())
            .collect();
        if rows.len() != SIZE {
            return Err(anyhow!("expected {} rows, found {}", SIZE, rows.len()));
        }

        let mut board = Self::new();
        for (row, text) in rows.iter().enumerate() {
            let chars: Vec<char> = text.chars().collect();
            if chars.len() != SIZE {
                return Err(anyhow!(
                    "row {} has {} cells, expected {}",
                    row + 1,
                    chars.len(),
                    SIZE
                ));
            }
            for (col, c) in chars.into_iter().enumerate() {
                let cell = match c {
                    'X' | 'x' => Cell::Mark(Player::X),
                    'O' | 'o' => Cell::Mark(Player::O),
                    '_' | '.' | ' ' => Cell::Empty,
                    _ => return Err(anyhow!("could not parse '{}' as a cell", c)),
                };
                board.set(Move::new(row, col), cell);
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            for cell in row {
                match cell {
                    Cell::Empty => write!(f, "_")?,
                    Cell::Mark(player) => write!(f, "{}", player)?,
                }
            }
        }
        Ok(())
    }
}

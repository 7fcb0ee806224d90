use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{read, Event, KeyCode, KeyEvent, KeyModifiers},
    style::{style, Attribute, Color, PrintStyledContent},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
    QueueableCommand,
};

use std::io::{stdout, Stdout, Write};

use tictactoe_ai::{
    board::{Board, Move},
    SIZE,
};

/// Raw-mode terminal with a cursor over the board
///
/// Raw mode is left and the cursor shown again when this is dropped.
pub struct Terminal {
    stdout: Stdout,
    cursor: Move,
    // first row below the last screen drawn
    bottom: u16,
}

// the board occupies rows 2..=6, status lines start after a blank row
const ORIGIN_Y: u16 = 2;

/// Returns the first row below the board and `lines` status lines
fn rows_below(lines: usize) -> u16 {
    ORIGIN_Y + 2 * SIZE as u16 + lines as u16
}

impl Terminal {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        // from here on Drop restores the terminal, even if hiding the cursor fails
        let mut terminal = Self {
            stdout: stdout(),
            cursor: Move::new(0, 0),
            bottom: 0,
        };
        terminal.stdout.queue(Hide)?;
        terminal.stdout.flush()?;

        Ok(terminal)
    }

    fn print_line(&mut self, y: u16, text: &str) -> Result<()> {
        self.stdout
            .queue(MoveTo(0, y))?
            .queue(PrintStyledContent(style(text.to_string())))?;
        Ok(())
    }

    /// Clears the screen and draws the board with `lines` underneath
    pub fn draw(&mut self, board: &Board, lines: &[String]) -> Result<()> {
        self.stdout.queue(Clear(ClearType::All))?;
        self.print_line(0, "Use arrow keys to move, Enter to select.")?;

        for row in 0..SIZE {
            let y = ORIGIN_Y + 2 * row as u16;
            self.stdout.queue(MoveTo(1, y))?;
            for col in 0..SIZE {
                let position = Move::new(row, col);
                let text = format!(" {} ", board.get(position));
                let content = if position == self.cursor {
                    style(text)
                        .attribute(Attribute::Bold)
                        .on(Color::Grey)
                        .with(Color::Black)
                } else {
                    style(text)
                };
                self.stdout.queue(PrintStyledContent(content))?;
                if col < SIZE - 1 {
                    self.stdout.queue(PrintStyledContent(style("|")))?;
                }
            }
            if row < SIZE - 1 {
                self.print_line(y + 1, " ---+---+---")?;
            }
        }

        let mut y = rows_below(0);
        for line in lines {
            self.print_line(y, line)?;
            y += 1;
        }
        self.bottom = rows_below(lines.len());
        self.stdout.flush()?;
        Ok(())
    }

    /// Moves the cursor until Enter is pressed on an empty cell
    ///
    /// Returns `None` if the player quits with `q`, Esc or Ctrl-C.
    pub fn read_move(&mut self, board: &Board, lines: &[String]) -> Result<Option<Move>> {
        self.draw(board, lines)?;
        loop {
            let KeyEvent { code, modifiers, .. } = match read()? {
                Event::Key(key) => key,
                _ => continue,
            };
            match code {
                KeyCode::Left => self.cursor.col = self.cursor.col.saturating_sub(1),
                KeyCode::Right => self.cursor.col = (self.cursor.col + 1).min(SIZE - 1),
                KeyCode::Up => self.cursor.row = self.cursor.row.saturating_sub(1),
                KeyCode::Down => self.cursor.row = (self.cursor.row + 1).min(SIZE - 1),
                KeyCode::Enter => {
                    if board.get(self.cursor).is_empty() {
                        return Ok(Some(self.cursor));
                    }
                    // occupied, ring the bell and keep waiting
                    write!(self.stdout, "\x07")?;
                    self.stdout.flush()?;
                    continue;
                }
                KeyCode::Esc | KeyCode::Char('q') => return Ok(None),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(None),
                _ => continue,
            }
            self.draw(board, lines)?;
        }
    }

    /// Waits for a key press, returning true for 'R'
    pub fn ask_replay(&mut self) -> Result<bool> {
        loop {
            if let Event::Key(KeyEvent { code, .. }) = read()? {
                return Ok(matches!(code, KeyCode::Char('r') | KeyCode::Char('R')));
            }
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // best effort, there is nowhere to report a failure from here
        let _ = self
            .stdout
            .queue(MoveTo(0, self.bottom))
            .and_then(|stdout| stdout.queue(Show));
        let _ = self.stdout.flush();
        let _ = disable_raw_mode();
    }
}

//! Line-based questions asked before the game starts

use anyhow::{anyhow, Result};

use std::io::{BufRead, Write};

use crate::{session::Turn, strategy::Strategy};

/// Asks `question` until `parse` accepts an answer
///
/// Fails once the input is closed rather than asking again forever.
pub fn ask<R, W, T, F>(input: &mut R, output: &mut W, question: &str, parse: F) -> Result<T>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Option<T>,
{
    loop {
        write!(output, "{}", question)?;
        output.flush()?;

        let mut buffer = String::new();
        if input.read_line(&mut buffer)? == 0 {
            return Err(anyhow!("no answer given, input closed"));
        }
        match parse(&buffer) {
            Some(answer) => return Ok(answer),
            None => writeln!(output, "Unknown answer given")?,
        }
    }
}

pub fn ask_strategy<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Strategy> {
    let question = format!(
        "Choose game mode: (1) {} or (2) {}: ",
        Strategy::Optimal,
        Strategy::FirstAvailable
    );
    ask(input, output, &question, |answer| answer.trim().parse().ok())
}

pub fn ask_first<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Turn> {
    ask(input, output, "Do you want to go first? y/n: ", |answer| {
        match answer.trim().to_lowercase().chars().next() {
            Some('y') => Some(Turn::Human),
            Some('n') => Some(Turn::Computer),
            _ => None,
        }
    })
}

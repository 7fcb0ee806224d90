use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::HumanDuration;
use tracing_subscriber::EnvFilter;

use std::cmp::Ordering;
use std::io::{stdin, stdout};
use std::time::Duration;

use tictactoe_ai::{
    analysis::analyse,
    board::GameOutcome,
    prompt::{ask_first, ask_strategy},
    session::{Session, Turn},
    solver::Solver,
    strategy::Strategy,
};

mod terminal;
use terminal::*;

/// Play Tic-tac-toe against the computer
#[derive(Parser)]
#[command(name = "tictactoe", version)]
struct Cli {
    /// Computer strategy: 'optimal' or 'easy'. Asked for when omitted
    #[arg(long, global = true)]
    mode: Option<Strategy>,

    /// Who moves first in the opening game: 'human' or 'computer'. Asked for when omitted
    #[arg(long)]
    first: Option<Turn>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play a strategy against every possible opponent and report the results
    Analyse,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(Command::Analyse) = cli.command {
        return run_analysis(cli.mode);
    }

    let stdin = stdin();
    let mut input = stdin.lock();
    let mut output = stdout();

    println!("Welcome to Tic-tac-toe\n");

    let strategy = match cli.mode {
        Some(strategy) => strategy,
        None => ask_strategy(&mut input, &mut output)?,
    };
    let first = match cli.first {
        Some(first) => first,
        None => ask_first(&mut input, &mut output)?,
    };
    drop(input);

    let mut session = Session::new(strategy, first);
    let mut terminal = Terminal::new()?;
    play(&mut terminal, &mut session)
}

// game loop, one iteration per game until the player declines a replay
fn play(terminal: &mut Terminal, session: &mut Session) -> Result<()> {
    loop {
        let mut game = session.new_game();
        let mut status = format!(
            "You are {}. {}",
            game.human(),
            if game.to_move() == Turn::Human {
                "You move first."
            } else {
                "The computer moves first."
            }
        );

        loop {
            match game.outcome() {
                GameOutcome::InProgress => {}
                GameOutcome::Win(player) if player == game.human() => {
                    status = "You win!".to_string();
                    break;
                }
                GameOutcome::Win(_) => {
                    status = "You lose!".to_string();
                    break;
                }
                GameOutcome::Draw => {
                    status = "It's a draw!".to_string();
                    break;
                }
            }

            match game.to_move() {
                Turn::Human => {
                    let lines = vec![String::new(), status.clone()];
                    match terminal.read_move(game.board(), &lines)? {
                        Some(position) => {
                            game.play_human(position)?;
                        }
                        // player quit
                        None => return Ok(()),
                    }
                }
                Turn::Computer => {
                    let lines = vec![String::new(), "Computer is thinking...".to_string()];
                    terminal.draw(game.board(), &lines)?;
                    std::thread::sleep(Duration::from_millis(500));

                    let before = *game.board();
                    let (position, score) = game.play_computer()?;
                    status = format!("Computer played {}.", position);

                    if let Some(score) = score {
                        let plies = Solver::new(before, game.computer()).plies_to_end(score);
                        let move_string = if plies == 1 { "move" } else { "moves" };
                        let forecast = match score.cmp(&0) {
                            Ordering::Greater => format!(
                                " It can force a win in at most {} {}.",
                                plies, move_string
                            ),
                            Ordering::Less => format!(
                                " You can force a win in at most {} {}.",
                                plies, move_string
                            ),
                            Ordering::Equal => format!(
                                " It can at best force a draw, {} {} remaining.",
                                plies, move_string
                            ),
                        };
                        status.push_str(&forecast);
                    }
                }
            }
        }

        session.record(&game)?;
        let lines = vec![
            String::new(),
            status,
            format!("{}", session.scoreboard()),
            String::new(),
            "Press 'R' to restart or any other key to exit.".to_string(),
        ];
        terminal.draw(game.board(), &lines)?;

        if !terminal.ask_replay()? {
            return Ok(());
        }
    }
}

fn run_analysis(mode: Option<Strategy>) -> Result<()> {
    let strategies = match mode {
        Some(strategy) => vec![strategy],
        None => vec![Strategy::Optimal, Strategy::FirstAvailable],
    };

    for strategy in strategies {
        for &computer_first in [true, false].iter() {
            println!(
                "{}, computer moving {}",
                strategy,
                if computer_first { "first" } else { "second" }
            );
            let report = analyse(strategy, computer_first, true)?;
            println!("{}", report);
            println!("Analysis completed in {}\n", HumanDuration(report.elapsed));
        }
    }
    Ok(())
}

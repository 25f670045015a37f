//! Simple line-mode master
//!
//! Text-based game without the TUI: type the secret word, then whole guesses.
//! Every accepted line is fed to the master as individual inputs, so followers
//! see exactly the same snapshots as with the full-screen UI.

use crate::game::{Input, Master, Phase};
use crate::output::print_snapshot;
use crate::sync::Publish;
use anyhow::Result;
use std::io::{BufRead, Write};

/// What a line typed during play asks for
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Quit,
    Reset,
    Restart,
    Guess(String),
}

fn parse_command(line: &str) -> Command {
    match line.trim().to_lowercase().as_str() {
        "quit" | "q" | "exit" => Command::Quit,
        "reset" => Command::Reset,
        "restart" | "new" | "n" => Command::Restart,
        _ => Command::Guess(line.trim().to_string()),
    }
}

/// Inputs for a whole typed guess, or `None` if it is not five letters
fn guess_inputs(guess: &str) -> Option<Vec<Input>> {
    if guess.chars().count() != 5 || !guess.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let mut inputs: Vec<Input> = guess.chars().map(Input::Letter).collect();
    inputs.push(Input::Submit);
    Some(inputs)
}

/// Run the simple line-mode master until `quit` or end of input
///
/// # Errors
///
/// Returns an error if reading input or writing the prompt fails.
pub fn run_simple<P: Publish, R: BufRead>(master: &mut Master<P>, mut input: R) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Wordle Mirror - Master Mode                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Commands: 'reset' clears the board, 'restart' picks a new word, 'quit' exits\n");

    loop {
        match master.session().phase() {
            Phase::Idle => {
                let Some(line) = read_line(&mut input, "Secret word")? else {
                    return Ok(());
                };
                match parse_command(&line) {
                    Command::Quit => return Ok(()),
                    Command::Reset | Command::Restart => {
                        println!("Nothing to reset yet, pick a secret word first\n");
                        continue;
                    }
                    Command::Guess(_) => {}
                }
                if master.apply(Input::Start(line)) {
                    println!("\n🔒 Secret word set. Start guessing!\n");
                    print_snapshot(&master.snapshot());
                } else {
                    println!("❌ The secret word must be exactly 5 letters\n");
                }
            }
            Phase::Active => {
                let Some(line) = read_line(&mut input, "Guess")? else {
                    return Ok(());
                };
                match parse_command(&line) {
                    Command::Quit => return Ok(()),
                    Command::Reset => {
                        master.apply(Input::Reset);
                        println!("\n🔄 Board reset, same word\n");
                        print_snapshot(&master.snapshot());
                    }
                    Command::Restart => {
                        master.apply(Input::Restart);
                        println!("\n🔄 New game\n");
                    }
                    Command::Guess(guess) => match guess_inputs(&guess) {
                        Some(inputs) => {
                            for step in inputs {
                                master.apply(step);
                            }
                            print_snapshot(&master.snapshot());
                        }
                        None => println!("❌ Guesses are 5 letters\n"),
                    },
                }
            }
            Phase::Over { .. } => {
                let Some(line) = read_line(&mut input, "Play again? (yes/reset/no)")? else {
                    return Ok(());
                };
                match line.to_lowercase().as_str() {
                    "yes" | "y" => {
                        master.apply(Input::Restart);
                        println!("\n🔄 New game\n");
                    }
                    "reset" => {
                        master.apply(Input::Reset);
                        println!("\n🔄 Same word, fresh board\n");
                        print_snapshot(&master.snapshot());
                    }
                    _ => {
                        println!("\n👋 Thanks for playing!\n");
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Prompt and read one trimmed line; `None` at end of input
fn read_line<R: BufRead>(input: &mut R, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

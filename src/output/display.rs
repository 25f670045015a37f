//! Display functions for command results

use super::formatters::{board_rows, keyboard_rows, tile, verdict_char};
use crate::commands::EvaluateResult;
use crate::game::ROWS;
use crate::sync::Snapshot;
use colored::Colorize;

/// Print the board, keyboard and game status
pub fn print_snapshot(view: &Snapshot) {
    println!("{}", "─".repeat(40).cyan());
    for row in board_rows(view) {
        println!("  {row}");
    }
    println!();
    for row in keyboard_rows(view) {
        println!("  {row}");
    }
    println!("{}", "─".repeat(40).cyan());

    match view.outcome_text() {
        Some(text) if view.win => println!("{}", format!("🎉 {text}").green().bold()),
        Some(text) => println!("{}", text.red().bold()),
        None if view.started => println!("Row {} of {ROWS}", view.row_number()),
        None => println!("{}", "Waiting for a secret word".bright_black()),
    }
}

/// Print the result of scoring one guess
pub fn print_evaluation(result: &EvaluateResult) {
    println!("\n{}", "═".repeat(40).cyan());
    println!(
        " {} {} vs {}",
        "EVALUATE:".bright_cyan().bold(),
        result.guess.text().bright_yellow().bold(),
        result.answer.text().bright_white().bold()
    );
    println!("{}", "═".repeat(40).cyan());

    let tiles: Vec<String> = result
        .guess
        .chars()
        .iter()
        .zip(result.evaluation.verdicts())
        .map(|(&ch, &verdict)| tile(Some(char::from(ch)), verdict).to_string())
        .collect();
    println!("\n  {}", tiles.join(" "));

    let code: String = result
        .evaluation
        .verdicts()
        .iter()
        .map(|&v| verdict_char(v))
        .collect();
    println!("  {}  {}", result.evaluation.to_emoji(), code.bright_black());

    println!("\n  Keys:");
    for (letter, verdict) in result.keys.iter() {
        println!("    {} {}", tile(Some(letter), verdict), verdict.as_str());
    }

    println!();
    if result.evaluation.is_win() {
        println!("{}", "✅ Exact match".green().bold());
    } else {
        println!(
            "{} correct, {} present",
            result.evaluation.count_correct().to_string().green(),
            result.evaluation.count_present().to_string().yellow()
        );
    }
}

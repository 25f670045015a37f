//! Formatting utilities for terminal output

use crate::core::Verdict;
use crate::core::keyboard::LAYOUT;
use crate::sync::Snapshot;
use colored::{ColoredString, Colorize};

/// A single letter tile, coloured by verdict
#[must_use]
pub fn tile(letter: Option<char>, verdict: Verdict) -> ColoredString {
    let text = format!(" {} ", letter.unwrap_or('·'));
    match verdict {
        Verdict::Correct => text.black().on_green().bold(),
        Verdict::Present => text.black().on_yellow().bold(),
        Verdict::Absent => text.white().on_bright_black(),
        Verdict::Unset => text.bright_white(),
    }
}

/// The board as one string per row
#[must_use]
pub fn board_rows(view: &Snapshot) -> Vec<String> {
    view.board
        .iter()
        .zip(&view.tile_states)
        .map(|(letters, verdicts)| {
            letters
                .iter()
                .zip(verdicts)
                .map(|(slot, verdict)| tile(slot.get(), *verdict).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// The keyboard as one string per row, letters coloured by key state
#[must_use]
pub fn keyboard_rows(view: &Snapshot) -> Vec<String> {
    LAYOUT
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let keys = row
                .chars()
                .map(|ch| tile(Some(ch), view.key(ch)).to_string())
                .collect::<String>();
            " ".repeat(i * 2) + &keys
        })
        .collect()
}

/// Verdict letters used in plain output: `G`, `Y`, `-`, or `.` when unset
#[must_use]
pub const fn verdict_char(verdict: Verdict) -> char {
    match verdict {
        Verdict::Correct => 'G',
        Verdict::Present => 'Y',
        Verdict::Absent => '-',
        Verdict::Unset => '.',
    }
}

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    let filled = if max > 0.0 {
        ((value / max) * width as f64) as usize
    } else {
        0
    };
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

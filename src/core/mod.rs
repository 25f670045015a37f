//! Core domain types for Wordle
//!
//! This module contains the fundamental domain types: words, verdicts, guess
//! evaluation and keyboard coloring. Everything here is pure and synchronous.

mod evaluation;
pub mod keyboard;
mod verdict;
mod word;

pub use evaluation::{Evaluation, evaluate};
pub use keyboard::KeyStates;
pub use verdict::Verdict;
pub use word::{WORD_LEN, Word, WordError};

//! Terminal output formatting
//!
//! Coloured board, keyboard and result printing for the line-mode commands.

pub mod display;
pub mod formatters;

pub use display::{print_evaluation, print_snapshot};

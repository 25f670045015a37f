//! Full-screen terminal UI for both roles

pub mod app;
pub mod confetti;
pub mod rendering;

pub use app::{App, Seat, run_tui};

//! Wordle Mirror
//!
//! A Wordle game where one master terminal holds the secret word and every
//! follower terminal mirrors the master's board through a pub/sub channel.
//!
//! # Quick Start
//!
//! ```rust
//! use wordle_mirror::core::{Verdict, Word, evaluate};
//!
//! let guess = Word::new("speed").unwrap();
//! let answer = Word::new("abide").unwrap();
//!
//! // Only one E is marked: the answer has a single E to give out
//! let verdicts = evaluate(guess.chars(), answer.chars());
//! assert_eq!(verdicts[2], Verdict::Present);
//! assert_eq!(verdicts[3], Verdict::Absent);
//! ```
//!
//! Replicating a game in-process:
//!
//! ```rust
//! use wordle_mirror::game::{Input, Master};
//! use wordle_mirror::sync::{ConfettiCue, memory::MemoryChannel};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let channel = MemoryChannel::new("room", 50);
//! let mut master = Master::new(channel.clone(), ConfettiCue::default());
//! master.apply(Input::Start("crane".into()));
//!
//! let (follower, _live) = wordle_mirror::game::join(&channel, 5).await.unwrap();
//! assert!(follower.view().started);
//! # });
//! ```

// Core domain types
pub mod core;

// Session state machine and the master/follower roles
pub mod game;

// Replication channel and transports
pub mod sync;

// Runtime settings
pub mod config;

// Tracing setup
pub mod logging;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

// Interactive TUI interface
pub mod interactive;

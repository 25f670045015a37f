//! Session state and its idle → active → over state machine
//!
//! A `Session` is the single writable copy of a game. It is owned by the master's
//! controller and mutated only through the methods below, each of which reports
//! whether anything changed so the controller knows when to publish.

use super::board::{Board, ROWS, Slot};
use crate::core::{Evaluation, KeyStates, WORD_LEN, Word};
use crate::sync::{ConfettiCue, Snapshot};
use tracing::debug;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No answer set
    Idle,
    /// Accepting input
    Active,
    /// Finished; `win` is false when the row limit was exhausted
    Over { win: bool },
}

/// Master-side game state
#[derive(Debug, Clone)]
pub struct Session {
    answer: Option<Word>,
    board: Board,
    keys: KeyStates,
    row: usize,
    col: usize,
    phase: Phase,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self {
            answer: None,
            board: Board::new(),
            keys: KeyStates::new(),
            row: 0,
            col: 0,
            phase: Phase::Idle,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn keys(&self) -> &KeyStates {
        &self.keys
    }

    /// Current (row, col) cursor
    #[must_use]
    pub const fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    #[must_use]
    pub const fn answer(&self) -> Option<&Word> {
        self.answer.as_ref()
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Over { .. })
    }

    /// Set the answer and begin a game
    ///
    /// Only valid while idle. Input that is not exactly five letters is rejected
    /// silently: nothing changes and `false` is returned.
    pub fn start(&mut self, input: &str) -> bool {
        if self.phase != Phase::Idle {
            debug!(phase = ?self.phase, "start ignored outside idle");
            return false;
        }
        let Ok(answer) = Word::new(input) else {
            debug!("ignoring malformed answer input");
            return false;
        };
        self.clear_board();
        self.answer = Some(answer);
        self.phase = Phase::Active;
        true
    }

    /// Type a letter into the next free slot of the current row
    pub fn type_letter(&mut self, letter: char) -> bool {
        if self.phase != Phase::Active || self.col >= WORD_LEN {
            return false;
        }
        let Some(slot) = Slot::letter(letter) else {
            return false;
        };
        self.board.set(self.row, self.col, slot);
        self.col += 1;
        true
    }

    /// Remove the last typed letter of the current row
    pub fn delete(&mut self) -> bool {
        if self.phase != Phase::Active || self.col == 0 {
            return false;
        }
        self.col -= 1;
        self.board.set(self.row, self.col, Slot::EMPTY);
        true
    }

    /// Submit the current row once it is full
    ///
    /// Returns the evaluation when a row was scored, `None` if the input was ignored.
    pub fn submit(&mut self) -> Option<Evaluation> {
        if self.phase != Phase::Active || self.col != WORD_LEN {
            return None;
        }
        let answer = self.answer?;
        let guess = self.board.row_word(self.row)?;

        let evaluation = Evaluation::calculate(&guess, &answer);
        self.board.mark(self.row, evaluation.into());
        self.keys.record(&guess, evaluation.verdicts());

        if evaluation.is_win() {
            self.phase = Phase::Over { win: true };
        } else {
            self.row += 1;
            self.col = 0;
            if self.row >= ROWS {
                self.phase = Phase::Over { win: false };
            }
        }
        debug!(row = self.row, evaluation = %evaluation, "row submitted");
        Some(evaluation)
    }

    /// Clear the board and keyboard, keeping the answer
    ///
    /// Re-enters `Active` when an answer is set, otherwise stays `Idle`.
    pub fn reset(&mut self) -> bool {
        self.clear_board();
        self.phase = if self.answer.is_some() {
            Phase::Active
        } else {
            Phase::Idle
        };
        true
    }

    /// Clear everything including the answer and return to `Idle`
    pub fn restart(&mut self) -> bool {
        self.clear_board();
        self.answer = None;
        self.phase = Phase::Idle;
        true
    }

    fn clear_board(&mut self) {
        self.board.clear();
        self.keys.clear();
        self.row = 0;
        self.col = 0;
    }

    /// Build the snapshot to publish
    ///
    /// The solution is only included once the game is over, and `cue` only on a win.
    #[must_use]
    pub fn snapshot(&self, cue: ConfettiCue) -> Snapshot {
        let (over, win) = match self.phase {
            Phase::Over { win } => (true, win),
            Phase::Idle | Phase::Active => (false, false),
        };
        Snapshot {
            board: *self.board.letters(),
            tile_states: *self.board.tiles(),
            key_states: self.keys.clone(),
            current_row: self.row,
            current_col: self.col,
            started: self.phase != Phase::Idle,
            over,
            win,
            solution: if over { self.answer.map(|w| w.text()) } else { None },
            confetti_cue: win.then_some(cue),
        }
    }
}

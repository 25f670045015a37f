//! Keyboard coloring
//!
//! Tracks the best verdict seen for every letter across all submitted rows.

use super::Verdict;
use super::word::{WORD_LEN, Word};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keyboard rows as laid out on screen
pub const LAYOUT: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

/// Letter → best verdict seen this session
///
/// Serializes as a JSON object keyed by single uppercase letters. Letters never
/// guessed are absent from the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyStates(BTreeMap<char, Verdict>);

impl KeyStates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one submitted row into the map
    ///
    /// `Correct` always wins, `Present` never downgrades `Correct`, and `Absent`
    /// only fills letters with no verdict yet.
    pub fn record(&mut self, guess: &Word, verdicts: &[Verdict; WORD_LEN]) {
        for (&letter, &verdict) in guess.chars().iter().zip(verdicts) {
            self.record_letter(char::from(letter), verdict);
        }
    }

    fn record_letter(&mut self, letter: char, verdict: Verdict) {
        let current = self.get(letter);
        let next = match verdict {
            Verdict::Correct => Verdict::Correct,
            Verdict::Present if current != Verdict::Correct => Verdict::Present,
            Verdict::Absent if !current.is_set() => Verdict::Absent,
            _ => return,
        };
        self.0.insert(letter, next);
    }

    /// Verdict for a letter, `Unset` if never guessed
    #[must_use]
    pub fn get(&self, letter: char) -> Verdict {
        self.0
            .get(&letter.to_ascii_uppercase())
            .copied()
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, Verdict)> + '_ {
        self.0.iter().map(|(&letter, &verdict)| (letter, verdict))
    }
}

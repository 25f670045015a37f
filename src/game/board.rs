//! The 6×5 letter grid and its tile verdicts

use crate::core::{Verdict, WORD_LEN, Word};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Number of guesses per game
pub const ROWS: usize = 6;

/// A ROWS × WORD_LEN grid
pub type Grid<T> = [[T; WORD_LEN]; ROWS];

/// One letter cell on the board
///
/// Serialized as `""` when empty or a one-letter uppercase string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Slot(Option<u8>);

impl Slot {
    pub const EMPTY: Self = Self(None);

    /// A filled slot; `None` unless `letter` is an ASCII letter
    #[must_use]
    pub fn letter(letter: char) -> Option<Self> {
        letter
            .is_ascii_alphabetic()
            .then(|| Self(Some(letter.to_ascii_uppercase() as u8)))
    }

    #[must_use]
    pub fn get(self) -> Option<char> {
        self.0.map(char::from)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0.is_none()
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(byte) => serializer.serialize_str(char::from(byte).encode_utf8(&mut [0; 4])),
            None => serializer.serialize_str(""),
        }
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SlotVisitor;

        impl Visitor<'_> for SlotVisitor {
            type Value = Slot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an empty string or a single ASCII letter")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Slot, E> {
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    (None, _) => Ok(Slot::EMPTY),
                    (Some(ch), None) => {
                        Slot::letter(ch).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
                    }
                    _ => Err(E::invalid_length(v.chars().count(), &self)),
                }
            }
        }

        deserializer.deserialize_str(SlotVisitor)
    }
}

/// Letters typed so far and the verdicts of submitted rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    letters: Grid<Slot>,
    tiles: Grid<Verdict>,
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn letters(&self) -> &Grid<Slot> {
        &self.letters
    }

    #[must_use]
    pub const fn tiles(&self) -> &Grid<Verdict> {
        &self.tiles
    }

    /// Slot at `row`/`col`, `None` when out of range
    #[must_use]
    pub fn slot(&self, row: usize, col: usize) -> Option<Slot> {
        self.letters.get(row)?.get(col).copied()
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, slot: Slot) {
        if let Some(cell) = self.letters.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = slot;
        }
    }

    /// The full word on `row`, `None` while any slot is still empty
    #[must_use]
    pub fn row_word(&self, row: usize) -> Option<Word> {
        let slots = self.letters.get(row)?;
        let mut letters = [0u8; WORD_LEN];
        for (dst, slot) in letters.iter_mut().zip(slots) {
            *dst = slot.0?;
        }
        Word::from_letters(letters)
    }

    pub(crate) fn mark(&mut self, row: usize, verdicts: [Verdict; WORD_LEN]) {
        if let Some(tiles) = self.tiles.get_mut(row) {
            *tiles = verdicts;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

//! Guess evaluation
//!
//! Scores a guess against the answer with Wordle's duplicate-letter rules.
//! Exact matches are taken out of the answer pool first, and only the
//! letters left over can turn a misplaced guess letter yellow.

use super::word::{WORD_LEN, Word};
use super::Verdict;
use std::fmt;

/// Verdicts for one guess, in guess order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Evaluation([Verdict; WORD_LEN]);

/// Score `guess` against `answer`
///
/// # Algorithm
/// 1. First pass: mark exact position matches `Correct` and consume that answer letter
/// 2. Second pass: for every other position, consume the first unconsumed occurrence of
///    the guess letter and mark it `Present`, otherwise mark it `Absent`
///
/// Total over any pair of 5-byte inputs.
///
/// # Examples
/// ```
/// use wordle_mirror::core::{Verdict, evaluate};
///
/// let verdicts = evaluate(b"ROBOT", b"FLOOR");
/// assert_eq!(
///     verdicts,
///     [Verdict::Present, Verdict::Present, Verdict::Absent, Verdict::Correct, Verdict::Absent]
/// );
/// ```
#[must_use]
pub fn evaluate(guess: &[u8; WORD_LEN], answer: &[u8; WORD_LEN]) -> [Verdict; WORD_LEN] {
    let mut result = [Verdict::Absent; WORD_LEN];
    let mut pool: [Option<u8>; WORD_LEN] = answer.map(Some);

    // Allow: Index needed to compare guess[i] with answer[i] and set result[i]
    #[allow(clippy::needless_range_loop)]
    for i in 0..WORD_LEN {
        if guess[i] == answer[i] {
            result[i] = Verdict::Correct;
            pool[i] = None;
        }
    }

    for (i, &letter) in guess.iter().enumerate() {
        if result[i] == Verdict::Correct {
            continue;
        }
        if let Some(slot) = pool.iter_mut().find(|slot| **slot == Some(letter)) {
            *slot = None;
            result[i] = Verdict::Present;
        }
    }

    result
}

impl Evaluation {
    /// All greens
    pub const PERFECT: Self = Self([Verdict::Correct; WORD_LEN]);

    /// Evaluate `guess` when `answer` is the secret word
    ///
    /// # Examples
    /// ```
    /// use wordle_mirror::core::{Evaluation, Word};
    ///
    /// let guess = Word::new("crane").unwrap();
    /// let answer = Word::new("slate").unwrap();
    /// let evaluation = Evaluation::calculate(&guess, &answer);
    ///
    /// // C(gray) R(gray) A(green) N(gray) E(green)
    /// assert_eq!(evaluation.to_emoji(), "⬜⬜🟩⬜🟩");
    /// ```
    #[must_use]
    pub fn calculate(guess: &Word, answer: &Word) -> Self {
        Self(evaluate(guess.chars(), answer.chars()))
    }

    #[inline]
    #[must_use]
    pub const fn verdicts(&self) -> &[Verdict; WORD_LEN] {
        &self.0
    }

    /// Check if this is a perfect match (all greens)
    #[must_use]
    pub fn is_win(&self) -> bool {
        *self == Self::PERFECT
    }

    #[must_use]
    pub fn count_correct(&self) -> usize {
        self.0.iter().filter(|&&v| v == Verdict::Correct).count()
    }

    #[must_use]
    pub fn count_present(&self) -> usize {
        self.0.iter().filter(|&&v| v == Verdict::Present).count()
    }

    /// Number of correct/present verdicts that landed on `letter` in `guess`
    #[must_use]
    pub fn count_marked(&self, guess: &Word, letter: u8) -> usize {
        guess
            .chars()
            .iter()
            .zip(self.0)
            .filter(|&(&ch, verdict)| ch == letter && verdict.is_hit())
            .count()
    }

    /// Parse an evaluation from a string like "GY-GY" or "🟩🟨⬜🟩🟨"
    ///
    /// # Examples
    /// ```
    /// use wordle_mirror::core::Evaluation;
    ///
    /// let e1 = Evaluation::from_str("GY-GY").unwrap();
    /// let e2 = Evaluation::from_str("🟩🟨⬜🟩🟨").unwrap();
    /// assert_eq!(e1, e2);
    /// ```
    #[must_use]
    #[allow(clippy::should_implement_trait)] // Provides ergonomic Option API; FromStr trait also implemented below
    pub fn from_str(s: &str) -> Option<Self> {
        let verdicts: Vec<Verdict> = s.chars().map(Verdict::from_char).collect::<Option<_>>()?;
        verdicts.try_into().ok().map(Self)
    }

    /// Convert to emoji string, e.g. "🟩🟨⬜🟩🟨"
    #[must_use]
    pub fn to_emoji(&self) -> String {
        self.0.iter().map(|v| v.to_emoji()).collect()
    }
}

impl From<Evaluation> for [Verdict; WORD_LEN] {
    fn from(evaluation: Evaluation) -> Self {
        evaluation.0
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_emoji())
    }
}

impl std::str::FromStr for Evaluation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| format!("Invalid evaluation string: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Verdict::{Absent, Correct, Present};

    fn eval(guess: &str, answer: &str) -> Evaluation {
        Evaluation::calculate(&Word::new(guess).unwrap(), &Word::new(answer).unwrap())
    }

    #[test]
    fn evaluation_all_absent() {
        let e = eval("abcde", "fghij");
        assert_eq!(e.verdicts(), &[Absent; WORD_LEN]);
        assert_eq!(e.count_correct(), 0);
        assert_eq!(e.count_present(), 0);
    }

    #[test]
    fn evaluation_all_correct() {
        let e = eval("crane", "crane");
        assert_eq!(e, Evaluation::PERFECT);
        assert!(e.is_win());
    }

    #[test]
    fn speed_against_abide_marks_only_one_e() {
        // Two E's guessed, one E in the answer: the first E takes it, the second is absent.
        // D sits at index 3 of ABIDE, so the guess's D is misplaced.
        let e = eval("speed", "abide");
        assert_eq!(e.verdicts(), &[Absent, Absent, Present, Absent, Present]);

        let guess = Word::new("speed").unwrap();
        assert_eq!(e.count_marked(&guess, b'E'), 1);
    }

    #[test]
    fn green_takes_priority_over_earlier_yellow() {
        // The exact match on the last E is reserved before the first E is considered.
        let e = eval("eerie", "shine");
        assert_eq!(e.verdicts(), &[Absent, Absent, Absent, Present, Correct]);
    }

    #[test]
    fn duplicate_letters_both_present() {
        // SPEED vs ERASE: ERASE has two E's, both misplaced
        let e = eval("speed", "erase");
        assert_eq!(e.verdicts(), &[Present, Absent, Present, Present, Absent]);
    }

    #[test]
    fn duplicate_letters_complex() {
        // ROBOT vs FLOOR: first O misplaced, second O exact
        let e = eval("robot", "floor");
        assert_eq!(e.verdicts(), &[Present, Present, Absent, Correct, Absent]);
    }

    #[test]
    fn repeated_answer_letter_single_guess_letter() {
        let e = eval("lobby", "bobby");
        assert_eq!(e.verdicts(), &[Absent, Correct, Correct, Correct, Correct]);
    }

    #[test]
    fn conservation_never_exceeds_answer_counts() {
        let pairs = [
            ("speed", "abide"),
            ("eeeee", "geese"),
            ("aaaaa", "banal"),
            ("llama", "hello"),
            ("sassy", "assay"),
            ("error", "roger"),
        ];
        for (guess, answer) in pairs {
            let g = Word::new(guess).unwrap();
            let a = Word::new(answer).unwrap();
            let e = Evaluation::calculate(&g, &a);
            let counts = a.letter_counts();
            for &letter in g.chars() {
                let allowed = usize::from(counts.get(&letter).copied().unwrap_or(0));
                assert!(
                    e.count_marked(&g, letter) <= allowed,
                    "{guess} vs {answer}: letter {} over-counted",
                    char::from(letter)
                );
            }
        }
    }

    #[test]
    fn evaluation_from_str_valid() {
        let e1 = Evaluation::from_str("GYG--").unwrap();
        let e2 = Evaluation::from_str("🟩🟨🟩⬜⬜").unwrap();
        let e3 = Evaluation::from_str("gyg__").unwrap();

        assert_eq!(e1, e2);
        assert_eq!(e1, e3);
        assert_eq!(e1.verdicts(), &[Correct, Present, Correct, Absent, Absent]);
    }

    #[test]
    fn evaluation_from_str_invalid() {
        assert!(Evaluation::from_str("GYGGYX").is_none());
        assert!(Evaluation::from_str("GYG").is_none());
        assert!(Evaluation::from_str("GXGGY").is_none());
        assert!(Evaluation::from_str("").is_none());
    }

    #[test]
    fn evaluation_emoji_roundtrip() {
        let e = eval("robot", "floor");
        assert_eq!(e.to_emoji(), "🟨🟨⬜🟩⬜");
        assert_eq!(Evaluation::from_str(&e.to_emoji()), Some(e));
    }
}

//! One-shot evaluation command
//!
//! Scores a single guess against an answer without starting a session.

use crate::core::{Evaluation, KeyStates, Word, WordError};

/// Result of scoring one guess
#[derive(Debug, Clone)]
pub struct EvaluateResult {
    pub guess: Word,
    pub answer: Word,
    pub evaluation: Evaluation,
    /// Key states after this single guess
    pub keys: KeyStates,
}

/// Score `guess` against `answer`
///
/// # Errors
///
/// Returns an error if either word is not exactly five ASCII letters.
pub fn evaluate_pair(guess: &str, answer: &str) -> Result<EvaluateResult, WordError> {
    let guess = Word::new(guess)?;
    let answer = Word::new(answer)?;
    let evaluation = Evaluation::calculate(&guess, &answer);

    let mut keys = KeyStates::new();
    keys.record(&guess, evaluation.verdicts());

    Ok(EvaluateResult {
        guess,
        answer,
        evaluation,
        keys,
    })
}

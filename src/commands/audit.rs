//! Evaluator audit - conservation check over random guess/answer pairs
//!
//! For every pair, the number of correct/present verdicts landing on a letter
//! must never exceed that letter's count in the answer, and a letter is correct
//! exactly where guess and answer agree.

use crate::core::{Evaluation, Verdict, WORD_LEN, Word};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Letters drawn for random words; vowels and common consonants repeat so
/// duplicate letters show up often
const LETTER_POOL: &[u8] = b"AAABCDEEEEEGHILLMNOOOPRRSSTTUY";

/// Statistics from an audit run
#[derive(Debug)]
pub struct AuditStatistics {
    pub pairs: usize,
    pub violations: Vec<(Word, Word)>,
    pub wins: usize,
    /// Pairs where the guess repeats a letter
    pub duplicate_guesses: usize,
    pub correct: usize,
    pub present: usize,
    pub absent: usize,
    pub total_time: Duration,
    pub seed: u64,
}

/// Draw a random word from [`LETTER_POOL`]
pub fn random_word<R: Rng + ?Sized>(rng: &mut R) -> Word {
    loop {
        let letters: [u8; WORD_LEN] =
            std::array::from_fn(|_| LETTER_POOL[rng.random_range(0..LETTER_POOL.len())]);
        if let Some(word) = Word::from_letters(letters) {
            return word;
        }
    }
}

/// Check one pair; returns `false` on any violation
#[must_use]
pub fn check_pair(guess: &Word, answer: &Word) -> bool {
    let evaluation = Evaluation::calculate(guess, answer);
    let counts = answer.letter_counts();

    let conserved = guess.chars().iter().all(|&letter| {
        let available = counts.get(&letter).copied().unwrap_or(0);
        evaluation.count_marked(guess, letter) <= usize::from(available)
    });

    let exact = guess
        .chars()
        .iter()
        .zip(answer.chars())
        .zip(evaluation.verdicts())
        .all(|((g, a), v)| (g == a) == (*v == Verdict::Correct));

    conserved && exact && evaluation.verdicts().iter().all(|v| v.is_set())
}

/// Run the audit over `pairs` random pairs
///
/// The same seed always produces the same pairs.
pub fn run_audit(pairs: usize, seed: Option<u64>) -> AuditStatistics {
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);
    let sample: Vec<(Word, Word)> = (0..pairs)
        .map(|_| (random_word(&mut rng), random_word(&mut rng)))
        .collect();

    println!("🔎 Auditing {pairs} pairs (seed {seed})...");

    let pb = ProgressBar::new(pairs as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░"),
    );

    let start = Instant::now();
    let results: Vec<(bool, Evaluation)> = sample
        .par_iter()
        .map(|(guess, answer)| {
            let ok = check_pair(guess, answer);
            pb.inc(1);
            (ok, Evaluation::calculate(guess, answer))
        })
        .collect();
    pb.finish_with_message("Complete!");
    let total_time = start.elapsed();

    let mut stats = AuditStatistics {
        pairs,
        violations: Vec::new(),
        wins: 0,
        duplicate_guesses: 0,
        correct: 0,
        present: 0,
        absent: 0,
        total_time,
        seed,
    };

    for ((guess, answer), (ok, evaluation)) in sample.iter().zip(&results) {
        if !ok {
            stats.violations.push((*guess, *answer));
        }
        if evaluation.is_win() {
            stats.wins += 1;
        }
        if guess.letter_counts().values().any(|&n| n > 1) {
            stats.duplicate_guesses += 1;
        }
        stats.correct += evaluation.count_correct();
        stats.present += evaluation.count_present();
        stats.absent += WORD_LEN - evaluation.count_correct() - evaluation.count_present();
    }

    stats
}

/// Print audit statistics
pub fn print_audit_statistics(stats: &AuditStatistics) {
    use crate::output::formatters::create_progress_bar;

    println!("\n{}", "═".repeat(70));
    println!(" Audit Results ");
    println!("{}", "═".repeat(70));

    println!("\n📊 {}", "Overall".bright_cyan().bold());
    println!("  Pairs checked:       {}", stats.pairs);
    println!("  Seed:                {}", stats.seed);
    println!(
        "  Guesses with dupes:  {} {}",
        stats.duplicate_guesses,
        format!(
            "({:.1}%)",
            stats.duplicate_guesses as f64 / stats.pairs.max(1) as f64 * 100.0
        )
        .bright_black()
    );
    println!("  Exact matches:       {}", stats.wins);
    println!(
        "  Total time:          {:.2}s",
        stats.total_time.as_secs_f64()
    );

    println!("\n📈 {}", "Verdict Mix".bright_cyan().bold());
    let total = (stats.correct + stats.present + stats.absent) as f64;
    for (label, count) in [
        ("correct", stats.correct),
        ("present", stats.present),
        ("absent ", stats.absent),
    ] {
        let bar = create_progress_bar(count as f64, total, 40);
        let percentage = if total > 0.0 {
            count as f64 / total * 100.0
        } else {
            0.0
        };
        println!("  {label}: {bar} {count:7} ({percentage:5.1}%)");
    }

    println!();
    if stats.violations.is_empty() {
        println!("{}", "✅ Conservation holds for every pair".green().bold());
    } else {
        println!(
            "{}",
            format!("❌ {} violating pairs", stats.violations.len())
                .red()
                .bold()
        );
        for (guess, answer) in stats.violations.iter().take(10) {
            println!("  {guess} vs {answer}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> Word {
        Word::new(text).unwrap()
    }

    #[test]
    fn known_duplicate_pairs_hold() {
        for (guess, answer) in [
            ("speed", "abide"),
            ("eerie", "shine"),
            ("lobby", "bobby"),
            ("robot", "floor"),
            ("aaaaa", "abcde"),
        ] {
            assert!(check_pair(&word(guess), &word(answer)), "{guess}/{answer}");
        }
    }

    #[test]
    fn random_words_come_from_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let w = random_word(&mut rng);
            assert!(w.chars().iter().all(|c| LETTER_POOL.contains(c)));
        }
    }

    #[test]
    fn audit_is_reproducible_and_clean() {
        let a = run_audit(500, Some(42));
        let b = run_audit(500, Some(42));
        assert!(a.violations.is_empty());
        assert_eq!(a.pairs, 500);
        assert_eq!(a.correct, b.correct);
        assert_eq!(a.present, b.present);
        assert_eq!(a.correct + a.present + a.absent, 500 * WORD_LEN);
        assert!(a.duplicate_guesses > 0);
    }
}

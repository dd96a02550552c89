use itertools::{EitherOrBoth, Itertools};
use std::time::Duration;

/// Characters that make up one "word" for WPM purposes
pub const CHARS_PER_WORD: f64 = 5.0;

/// Character-level comparison of typed text against the reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub errors: usize,
    pub total: usize,
}

/// Compare `typed` to `reference` position by position.
///
/// A typed character counts as correct only when it matches the reference
/// character at the same index. Mismatches and anything typed past the end of
/// the reference are errors, so `correct + errors == total` always holds.
pub fn score(reference: &str, typed: &str) -> Score {
    let correct = reference
        .chars()
        .zip(typed.chars())
        .filter(|(expected, actual)| expected == actual)
        .count();
    let total = typed.chars().count();

    Score {
        correct,
        errors: total - correct,
        total,
    }
}

/// Speed and accuracy derived from a score and the time spent typing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub wpm: u32,
    pub cpm: u32,
    pub accuracy: u32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            wpm: 0,
            cpm: 0,
            accuracy: 100,
        }
    }
}

pub fn metrics(score: &Score, elapsed: Duration) -> Metrics {
    let elapsed_minutes = elapsed.as_secs_f64() / 60.0;

    let (wpm, cpm) = if elapsed_minutes > 0.0 {
        let correct = score.correct as f64;
        (
            ((correct / CHARS_PER_WORD) / elapsed_minutes).round() as u32,
            (correct / elapsed_minutes).round() as u32,
        )
    } else {
        (0, 0)
    };

    Metrics {
        wpm,
        cpm,
        accuracy: accuracy(score),
    }
}

/// Percentage of typed characters that were correct; 100 before anything is typed
pub fn accuracy(score: &Score) -> u32 {
    if score.total == 0 {
        return 100;
    }
    ((score.correct as f64 / score.total as f64) * 100.0).round() as u32
}

/// How far through the reference the user has typed, capped at 100
pub fn progress_percent(reference: &str, score: &Score) -> f64 {
    let len = reference.chars().count();
    if len == 0 {
        return 0.0;
    }
    ((score.total as f64 / len as f64) * 100.0).min(100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyBand {
    Good,
    Fair,
    Poor,
}

impl AccuracyBand {
    pub fn of(accuracy: u32) -> Self {
        if accuracy >= 95 {
            AccuracyBand::Good
        } else if accuracy >= 80 {
            AccuracyBand::Fair
        } else {
            AccuracyBand::Poor
        }
    }
}

/// Highlighting class of a single reference character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Correct,
    Incorrect,
    Cursor,
    Untyped,
}

/// Classify every reference character against what has been typed so far.
/// Characters typed past the end of the reference have no slot to mark.
pub fn classify(reference: &str, typed: &str) -> Vec<(char, CharClass)> {
    let mut cursor_placed = false;

    reference
        .chars()
        .zip_longest(typed.chars())
        .filter_map(|pair| match pair {
            EitherOrBoth::Both(expected, actual) if expected == actual => {
                Some((expected, CharClass::Correct))
            }
            EitherOrBoth::Both(expected, _) => Some((expected, CharClass::Incorrect)),
            EitherOrBoth::Left(expected) if !cursor_placed => {
                cursor_placed = true;
                Some((expected, CharClass::Cursor))
            }
            EitherOrBoth::Left(expected) => Some((expected, CharClass::Untyped)),
            EitherOrBoth::Right(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[(&str, &str)] = &[
        ("abc", ""),
        ("abc", "a"),
        ("abc", "axc"),
        ("abc", "abcde"),
        ("hello world", "hxllo"),
        ("", "typed"),
        ("naïve café", "naive cafe"),
    ];

    #[test]
    fn test_correct_plus_errors_is_total() {
        for (reference, typed) in SAMPLES {
            let s = score(reference, typed);
            assert_eq!(s.correct + s.errors, typed.chars().count());
            assert_eq!(s.total, typed.chars().count());
        }
    }

    #[test]
    fn test_prefix_has_no_errors() {
        let reference = "The cat sat on the mat.";
        for end in 0..=reference.len() {
            let s = score(reference, &reference[..end]);
            assert_eq!(s.errors, 0);
            assert_eq!(s.correct, end);
        }
    }

    #[test]
    fn test_single_mismatch() {
        let s = score("abc", "axc");
        assert_eq!(
            s,
            Score {
                correct: 2,
                errors: 1,
                total: 3
            }
        );
    }

    #[test]
    fn test_overflow_counts_as_errors() {
        let s = score("abc", "abcde");
        assert_eq!(s.correct, 3);
        assert_eq!(s.errors, 2);
        assert_eq!(s.total, 5);
    }

    #[test]
    fn test_multibyte_chars_compare_by_position() {
        let s = score("naïve", "naïve");
        assert_eq!(s.correct, 5);
        assert_eq!(s.total, 5);

        let s = score("naïve", "naive");
        assert_eq!(s.correct, 4);
        assert_eq!(s.errors, 1);
    }

    #[test]
    fn test_accuracy_is_100_without_input() {
        assert_eq!(accuracy(&Score::default()), 100);
        assert_eq!(metrics(&Score::default(), Duration::from_secs(5)).accuracy, 100);
    }

    #[test]
    fn test_accuracy_rounds() {
        // 2 of 3 correct
        assert_eq!(accuracy(&score("abc", "axc")), 67);
        assert_eq!(accuracy(&score("test", "txst")), 75);
    }

    #[test]
    fn test_wpm_and_cpm_zero_without_elapsed_time() {
        let s = score("abc", "abc");
        let m = metrics(&s, Duration::ZERO);
        assert_eq!(m.wpm, 0);
        assert_eq!(m.cpm, 0);
        assert_eq!(m.accuracy, 100);
    }

    #[test]
    fn test_wpm_example_three_seconds() {
        let s = score("abc", "axc");
        let m = metrics(&s, Duration::from_secs(3));
        assert_eq!(m.wpm, 8);
        assert_eq!(m.cpm, 40);
    }

    #[test]
    fn test_full_minute_metrics() {
        // 300 correct characters in one minute is 60 words
        let reference = "a".repeat(300);
        let s = score(&reference, &reference);
        let m = metrics(&s, Duration::from_secs(60));
        assert_eq!(m.wpm, 60);
        assert_eq!(m.cpm, 300);
    }

    #[test]
    fn test_progress_caps_at_100() {
        assert_eq!(progress_percent("abcd", &score("abcd", "ab")), 50.0);
        assert_eq!(progress_percent("abcd", &score("abcd", "abcdef")), 100.0);
        assert_eq!(progress_percent("", &score("", "x")), 0.0);
    }

    #[test]
    fn test_accuracy_band() {
        assert_eq!(AccuracyBand::of(100), AccuracyBand::Good);
        assert_eq!(AccuracyBand::of(95), AccuracyBand::Good);
        assert_eq!(AccuracyBand::of(94), AccuracyBand::Fair);
        assert_eq!(AccuracyBand::of(80), AccuracyBand::Fair);
        assert_eq!(AccuracyBand::of(79), AccuracyBand::Poor);
    }

    #[test]
    fn test_classify_marks_cursor_once() {
        let classes: Vec<CharClass> = classify("abcd", "ax").into_iter().map(|(_, c)| c).collect();
        assert_eq!(
            classes,
            vec![
                CharClass::Correct,
                CharClass::Incorrect,
                CharClass::Cursor,
                CharClass::Untyped
            ]
        );
    }

    #[test]
    fn test_classify_ignores_overflow() {
        let classes = classify("ab", "abzz");
        assert_eq!(classes.len(), 2);
        assert!(classes.iter().all(|(_, c)| *c == CharClass::Correct));
    }

    #[test]
    fn test_classify_keeps_reference_chars() {
        let chars: String = classify("hey", "x").into_iter().map(|(c, _)| c).collect();
        assert_eq!(chars, "hey");
    }
}

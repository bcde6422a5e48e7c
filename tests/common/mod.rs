//! Utility helpers shared across integration tests.

/// Join lines into a single document separated by `\n`.
///
/// Keeps multi-line Markdown fixtures readable without embedding escape
/// sequences in every literal.
macro_rules! doc {
    ($($line:expr),* $(,)?) => {
        [$($line),*].join("\n")
    };
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

//! Imperative-sentence fallback.
//!
//! Used when no individual line qualifies as an action item. Sentences are
//! split after `.`, `!` or `?` followed by whitespace; the punctuation stays
//! with its sentence.

use once_cell::sync::Lazy;
use regex::Regex;

static FIRST_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z']+").expect("valid first-word regex"));

const IMPERATIVE_STARTERS: &[&str] = &[
    "add",
    "create",
    "implement",
    "fix",
    "update",
    "write",
    "check",
    "verify",
    "refactor",
    "document",
    "design",
    "investigate",
];

/// Splits trimmed text into sentences.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let Some(&(boundary, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }

        sentences.push(&text[start..boundary]);
        while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
            chars.next();
        }
        start = chars.peek().map_or(text.len(), |&(idx, _)| idx);
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Returns whether the first word of `sentence` is a known imperative verb.
pub fn looks_imperative(sentence: &str) -> bool {
    FIRST_WORD_RE.find(sentence).is_some_and(|word| {
        let word = word.as_str().to_ascii_lowercase();
        IMPERATIVE_STARTERS.contains(&word.as_str())
    })
}

/// Returns trimmed sentences starting with an imperative verb, in order.
pub fn extract_imperative_sentences(text: &str) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty() && looks_imperative(sentence))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{extract_imperative_sentences, looks_imperative, split_sentences};

    #[test]
    fn split_keeps_terminal_punctuation() {
        assert_eq!(
            split_sentences("One. Two!  Three? Four"),
            vec!["One.", "Two!", "Three?", "Four"]
        );
    }

    #[test]
    fn split_ignores_punctuation_without_whitespace() {
        assert_eq!(
            split_sentences("Version 1.2 shipped. Next"),
            vec!["Version 1.2 shipped.", "Next"]
        );
    }

    #[test]
    fn split_of_blank_text_is_empty() {
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn imperative_detection_is_case_insensitive() {
        assert!(looks_imperative("FIX the flaky test"));
        assert!(looks_imperative("  investigate latency"));
        assert!(!looks_imperative("We should fix it"));
        assert!(!looks_imperative("123"));
    }

    #[test]
    fn extracts_only_imperative_sentences() {
        let text = "We discussed plans. Implement the new login flow. Everyone agreed.";
        assert_eq!(
            extract_imperative_sentences(text),
            vec!["Implement the new login flow."]
        );
    }
}

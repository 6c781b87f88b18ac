//! Hashtag extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[\w-]+").expect("valid hashtag regex"));

/// Returns lowercase hashtags in first-occurrence order, without the `#`.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    HASHTAG_RE
        .find_iter(text)
        .filter(|found| !follows_word_char(text, found.start()))
        .map(|found| found.as_str()[1..].to_lowercase())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

// `regex` has no look-behind, so `(?<!\w)` is checked by hand.
fn follows_word_char(text: &str, index: usize) -> bool {
    text[..index]
        .chars()
        .next_back()
        .is_some_and(|ch| ch.is_alphanumeric() || ch == '_')
}

#[cfg(test)]
mod tests {
    use super::extract_hashtags;

    #[test]
    fn tags_are_lowercased_and_deduplicated() {
        assert_eq!(
            extract_hashtags("Random #Tag1 and #tag2 and #tag1 again"),
            vec!["tag1", "tag2"]
        );
    }

    #[test]
    fn tags_inside_words_are_ignored() {
        assert_eq!(extract_hashtags("issue#42 and C# but #real"), vec!["real"]);
    }

    #[test]
    fn adjacent_and_line_start_tags_match() {
        assert_eq!(
            extract_hashtags("#alpha #beta\n#gamma-ray,#delta_x"),
            vec!["alpha", "beta", "gamma-ray", "delta_x"]
        );
    }

    #[test]
    fn bare_hash_is_not_a_tag() {
        assert!(extract_hashtags("# heading and ##").is_empty());
        assert!(extract_hashtags("").is_empty());
    }

    #[test]
    fn tag_after_trailing_hyphen_still_matches() {
        assert_eq!(extract_hashtags("#wip-#urgent"), vec!["wip-", "urgent"]);
    }
}

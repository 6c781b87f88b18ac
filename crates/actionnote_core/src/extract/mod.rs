//! Free-text extraction of action items and hashtags.
//!
//! # Responsibility
//! - Classify note lines into actionable items using pattern rules.
//! - Fall back to imperative-sentence detection when no line qualifies.
//! - Extract lowercase hashtags in first-occurrence order.
//! - Delegate to a chat model with silent degrade to the heuristic.
//!
//! # Invariants
//! - Heuristic entry points are pure and total over any `&str`.
//! - Output never holds two items equal under case-insensitive comparison.
//! - Output order follows first occurrence in the source text.

pub mod dedup;
pub mod hashtag;
pub mod line;
pub mod llm;
pub mod ollama;
pub mod sentence;

pub use dedup::dedupe_case_insensitive;
pub use hashtag::extract_hashtags;
pub use line::{classify_line, clean_line, LineMatch, LineRule, Priority};
pub use llm::{
    build_prompt, extract_action_items_llm, parse_items, try_extract_action_items_llm, ChatClient,
    LlmError, LlmOutcome,
};
pub use ollama::OllamaClient;
pub use sentence::{extract_imperative_sentences, looks_imperative, split_sentences};

use std::collections::HashSet;

/// Extracts action items from free-form text.
///
/// Lines are classified one by one. When no line qualifies, the text is
/// split into sentences and imperative ones are kept instead.
pub fn extract_action_items(text: &str) -> Vec<String> {
    let from_lines: Vec<String> = extract_line_matches(text)
        .into_iter()
        .map(|found| found.text)
        .collect();
    if !from_lines.is_empty() {
        return from_lines;
    }

    dedupe_case_insensitive(extract_imperative_sentences(text))
}

/// Classifies every line and returns deduplicated matches with rule metadata.
///
/// Unlike [`extract_action_items`], this never runs the sentence fallback.
pub fn extract_line_matches(text: &str) -> Vec<LineMatch> {
    let mut seen = HashSet::new();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(classify_line)
        .filter(|found| seen.insert(found.text.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{extract_action_items, extract_line_matches, LineRule};

    #[test]
    fn bullets_numbering_and_checkboxes_are_cleaned() {
        let text = "- [ ] Set up database\n* implement API endpoint\n1. Write tests\nSome narrative sentence.";
        assert_eq!(
            extract_action_items(text),
            vec!["Set up database", "implement API endpoint", "Write tests"]
        );
    }

    #[test]
    fn bare_checkbox_lines_are_kept_verbatim() {
        let text = "[ ] Uncompleted task\n[x] Completed task\n[X] Also completed\nRegular text";
        assert_eq!(
            extract_action_items(text),
            vec!["[ ] Uncompleted task", "[x] Completed task", "[X] Also completed"]
        );
    }

    #[test]
    fn sentence_fallback_runs_only_without_line_matches() {
        let text = "We discussed plans. Implement the new login flow. Everyone agreed.";
        assert_eq!(
            extract_action_items(text),
            vec!["Implement the new login flow."]
        );

        let mixed = "TODO: ship it\nImplement the new login flow.";
        assert_eq!(extract_action_items(mixed), vec!["ship it"]);
    }

    #[test]
    fn duplicates_keep_first_casing() {
        let text = "- Write tests\n* write TESTS\nTODO: Write tests\n- deploy";
        assert_eq!(extract_action_items(text), vec!["Write tests", "deploy"]);
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(extract_action_items("").is_empty());
        assert!(extract_action_items("   \n\t\n  ").is_empty());
    }

    #[test]
    fn line_matches_report_first_matching_rule() {
        let matches = extract_line_matches("- ship it!\nP1: triage\nping @sam");
        let rules: Vec<LineRule> = matches.iter().map(|found| found.rule).collect();
        assert_eq!(
            rules,
            vec![LineRule::Bullet, LineRule::Keyword, LineRule::Mention]
        );
    }

    #[test]
    fn output_is_stable_under_recleaning() {
        let text = "- [ ] Set up database\n[x] Completed task\n2. HIGH: Critical bug fix\nReview this @john\nComplete by 2024-01-15";
        for item in extract_action_items(text) {
            assert_eq!(super::clean_line(&item), item);
        }
    }

    #[test]
    fn stacked_marker_output_is_stable_under_recleaning() {
        let items = extract_action_items("- - nested item\n1. 2. numbered\n* [ ] * deep");
        assert_eq!(items, vec!["nested item", "numbered", "deep"]);
        for item in &items {
            assert_eq!(&super::clean_line(item), item);
        }
    }
}

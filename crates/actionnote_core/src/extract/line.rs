//! Rule-based line classifier.
//!
//! # Responsibility
//! - Decide whether one trimmed line denotes an action item.
//! - Strip bullet, numbering, checkbox and keyword prefixes from accepted lines.
//!
//! # Invariants
//! - A line is accepted when ANY rule matches; cleaning runs regardless of
//!   which rule matched.
//! - A checkbox token is stripped only when it followed a bullet marker. A
//!   line that itself starts with a checkbox is emitted verbatim.
//! - `@mention` and due-date rules are intentionally loose: embedded email
//!   addresses and any digit after `by` both match.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static BULLET_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*•]|\d+\.)\s+").expect("valid bullet regex"));
static CHECKBOX_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\[(?: |x|todo)\]\s*").expect("valid checkbox regex"));
static KEYWORD_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(todo|action|next|high|medium|low|p[0-3]):[\s:.\-]*")
        .expect("valid keyword regex")
});
static MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\w").expect("valid mention regex"));
static DUE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:by|due|deadline)\s+\d").expect("valid due-date regex"));

/// Rule that accepted a line, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRule {
    /// `-`, `*`, `•` or `<digits>.` followed by whitespace.
    Bullet,
    /// `[ ]`, `[x]`, `[X]` or `[todo]`.
    Checkbox,
    /// `todo:`, `action:`, `next:` or a priority marker.
    Keyword,
    /// Cleaned text ends with `!`.
    Emphasis,
    /// `@` directly followed by a word character.
    Mention,
    /// `by`/`due`/`deadline` followed by a number.
    DueDate,
}

/// Priority marker carried by a keyword prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
    P0,
    P1,
    P2,
    P3,
}

impl Priority {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            "p0" => Some(Self::P0),
            "p1" => Some(Self::P1),
            "p2" => Some(Self::P2),
            "p3" => Some(Self::P3),
            _ => None,
        }
    }
}

/// One accepted line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineMatch {
    /// Cleaned line text.
    pub text: String,
    /// First rule that accepted the line.
    pub rule: LineRule,
    /// Priority marker, when the keyword prefix was one.
    pub priority: Option<Priority>,
}

/// Prefix-stripping result shared by classification and plain cleaning.
struct Cleaned<'a> {
    text: &'a str,
    had_bullet: bool,
    had_checkbox: bool,
    keyword: Option<&'a str>,
}

fn strip_prefixes(line: &str) -> Cleaned<'_> {
    let mut rest = line.trim();
    let mut had_bullet = false;
    let mut had_checkbox = false;
    let mut keyword = None;

    // Markers may be stacked (`- - item`, `1. TODO: P1: x`); strip until
    // nothing changes.
    loop {
        let before = rest;

        while let Some(marker) = BULLET_PREFIX_RE.find(rest) {
            rest = rest[marker.end()..].trim_start();
            had_bullet = true;
        }

        if let Some(token) = CHECKBOX_PREFIX_RE.find(rest) {
            had_checkbox = true;
            if had_bullet {
                rest = &rest[token.end()..];
            }
        }

        if let Some(caps) = KEYWORD_PREFIX_RE.captures(rest) {
            // A priority marker wins over an earlier plain keyword.
            if keyword.map_or(true, |kw| Priority::from_keyword(kw).is_none()) {
                keyword = caps.get(1).map(|m| m.as_str());
            }
            let end = caps.get(0).map_or(0, |m| m.end());
            rest = &rest[end..];
        }

        rest = rest.trim_start();
        if rest.len() == before.len() {
            break;
        }
    }

    Cleaned {
        text: rest.trim(),
        had_bullet,
        had_checkbox,
        keyword,
    }
}

/// Strips leading markers from a line without deciding acceptance.
pub fn clean_line(line: &str) -> String {
    strip_prefixes(line).text.to_string()
}

/// Classifies one trimmed, non-empty line.
///
/// Returns `None` when no rule matches or when nothing is left after
/// stripping markers (e.g. a bare `- [ ]`).
pub fn classify_line(line: &str) -> Option<LineMatch> {
    let cleaned = strip_prefixes(line);
    if cleaned.text.is_empty() {
        return None;
    }

    let rule = if cleaned.had_bullet {
        LineRule::Bullet
    } else if cleaned.had_checkbox {
        LineRule::Checkbox
    } else if cleaned.keyword.is_some() {
        LineRule::Keyword
    } else if cleaned.text.ends_with('!') {
        LineRule::Emphasis
    } else if MENTION_RE.is_match(cleaned.text) {
        LineRule::Mention
    } else if DUE_DATE_RE.is_match(cleaned.text) {
        LineRule::DueDate
    } else {
        return None;
    };

    Some(LineMatch {
        text: cleaned.text.to_string(),
        rule,
        priority: cleaned.keyword.and_then(Priority::from_keyword),
    })
}

#[cfg(test)]
mod tests {
    use super::{classify_line, clean_line, LineRule, Priority};

    fn text_of(line: &str) -> Option<String> {
        classify_line(line).map(|found| found.text)
    }

    #[test]
    fn bullet_and_number_markers_are_stripped() {
        assert_eq!(text_of("- ship it").as_deref(), Some("ship it"));
        assert_eq!(text_of("* ship it").as_deref(), Some("ship it"));
        assert_eq!(text_of("• ship it").as_deref(), Some("ship it"));
        assert_eq!(text_of("12. ship it").as_deref(), Some("ship it"));
    }

    #[test]
    fn marker_without_whitespace_is_not_a_bullet() {
        assert_eq!(text_of("-dash prefixed"), None);
        assert_eq!(text_of("3.14 is pi"), None);
    }

    #[test]
    fn checkbox_after_bullet_is_stripped() {
        assert_eq!(text_of("- [ ] task1").as_deref(), Some("task1"));
        assert_eq!(text_of("* [x] done thing").as_deref(), Some("done thing"));
        assert_eq!(text_of("- [TODO] later").as_deref(), Some("later"));
    }

    #[test]
    fn bare_checkbox_is_verbatim() {
        let found = classify_line("[todo] call back").expect("checkbox should match");
        assert_eq!(found.text, "[todo] call back");
        assert_eq!(found.rule, LineRule::Checkbox);
    }

    #[test]
    fn keyword_prefixes_are_stripped_case_insensitively() {
        assert_eq!(text_of("TODO: write tests").as_deref(), Some("write tests"));
        assert_eq!(text_of("Action: review PR").as_deref(), Some("review PR"));
        assert_eq!(
            text_of("- next: plan sprint").as_deref(),
            Some("plan sprint")
        );
    }

    #[test]
    fn priority_markers_are_recorded() {
        let found = classify_line("HIGH: Critical bug fix").expect("priority should match");
        assert_eq!(found.text, "Critical bug fix");
        assert_eq!(found.priority, Some(Priority::High));

        let found = classify_line("p0: Security patch").expect("priority should match");
        assert_eq!(found.priority, Some(Priority::P0));

        assert_eq!(text_of("P4: not a priority"), None);
    }

    #[test]
    fn trailing_exclamation_is_accepted() {
        let found = classify_line("Ship it!").expect("emphasis should match");
        assert_eq!(found.text, "Ship it!");
        assert_eq!(found.rule, LineRule::Emphasis);
    }

    #[test]
    fn mentions_match_including_email_addresses() {
        assert!(classify_line("Review this @john").is_some());
        assert!(classify_line("@alice can you test this").is_some());
        assert!(classify_line("Email: test@example.com should also match").is_some());
        assert!(classify_line("lonely @ sign").is_none());
    }

    #[test]
    fn due_date_phrases_need_a_digit() {
        assert!(classify_line("Complete by 2024-01-15").is_some());
        assert!(classify_line("Due 12/31/2023").is_some());
        assert!(classify_line("deadline 5pm tomorrow").is_some());
        assert!(classify_line("No date here").is_none());
        assert!(classify_line("stand by me").is_none());
        assert!(classify_line("nearby 5 shops").is_none());
    }

    #[test]
    fn empty_after_cleaning_is_rejected() {
        assert_eq!(classify_line("- [ ]"), None);
        assert_eq!(classify_line("TODO:"), None);
    }

    #[test]
    fn plain_narrative_is_rejected() {
        assert_eq!(classify_line("Some narrative sentence."), None);
    }

    #[test]
    fn clean_line_strips_without_judging() {
        assert_eq!(clean_line("  - [ ] TODO: x  "), "x");
        assert_eq!(clean_line("plain"), "plain");
    }

    #[test]
    fn stacked_markers_are_stripped_together() {
        assert_eq!(text_of("- - nested item").as_deref(), Some("nested item"));
        assert_eq!(text_of("1. 2. numbered").as_deref(), Some("numbered"));
        assert_eq!(text_of("- [ ] - [x] both").as_deref(), Some("both"));

        let found = classify_line("TODO: P1: triage").expect("keyword should match");
        assert_eq!(found.text, "triage");
        assert_eq!(found.priority, Some(Priority::P1));
    }

    #[test]
    fn line_match_serializes_rule_and_priority() {
        let found = classify_line("2. HIGH: Critical bug fix").expect("bullet should match");
        let value = serde_json::to_value(&found).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "text": "Critical bug fix",
                "rule": "bullet",
                "priority": "high",
            })
        );
    }
}

//! Tag record and name normalization.

use serde::{Deserialize, Serialize};

pub type TagId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    /// Lowercase, unique name.
    pub name: String,
    pub created_at: i64,
}

/// Normalizes one tag name: trimmed, optional leading `#` removed, lowercase.
///
/// Returns `None` for names that are blank after normalization.
pub fn normalize_tag(name: &str) -> Option<String> {
    let trimmed = name.trim();
    let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed).trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_tag;

    #[test]
    fn normalize_tag_lowercases_and_strips_hash() {
        assert_eq!(normalize_tag("  #Work ").as_deref(), Some("work"));
        assert_eq!(normalize_tag("IMPORTANT").as_deref(), Some("important"));
        assert_eq!(normalize_tag(" # "), None);
        assert_eq!(normalize_tag(""), None);
    }
}

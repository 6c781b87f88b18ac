//! Order-preserving, case-insensitive deduplication.

use std::collections::HashSet;

/// Keeps the first occurrence of every item under case-insensitive comparison.
///
/// The retained item keeps its original casing.
pub fn dedupe_case_insensitive<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::dedupe_case_insensitive;

    #[test]
    fn first_casing_wins() {
        let items = ["Write Tests", "deploy", "write tests", "DEPLOY", "review"]
            .map(String::from);
        assert_eq!(
            dedupe_case_insensitive(items),
            vec!["Write Tests", "deploy", "review"]
        );
    }
}

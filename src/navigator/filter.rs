//! Fuzzy filtering of table rows.
//!
//! Each row is flattened into a single space-joined string and scored with
//! the skim v2 algorithm. Filtering produces a new [`Dataset`]; the input is
//! never touched, so an abandoned search leaves no trace.

use std::cmp::Reverse;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::navigator::model::Dataset;

/// Case-insensitive fuzzy scorer.
pub struct Matcher {
    inner: SkimMatcherV2,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            inner: SkimMatcherV2::default(),
        }
    }

    /// Score `text` against `pattern`. Higher is better, `None` means no match.
    pub fn score(&self, text: &str, pattern: &str) -> Option<i64> {
        // skim is smart-case by default; lowering the pattern forces insensitive matching
        let pattern_lower = pattern.to_lowercase();
        self.inner.fuzzy_match(text, &pattern_lower)
    }
}

/// Filter `dataset` down to the rows matching `query`, best match first.
///
/// A blank query matches everything and returns the rows unchanged. Rows
/// with equal scores keep their relative order.
pub fn filter(query: &str, dataset: &Dataset) -> Dataset {
    let query = query.trim();
    if query.is_empty() {
        return dataset.clone();
    }

    let matcher = Matcher::new();
    let mut scored: Vec<_> = dataset
        .rows()
        .iter()
        .filter_map(|row| matcher.score(&row.haystack(), query).map(|score| (score, row)))
        .collect();
    scored.sort_by_key(|(score, _)| Reverse(*score));

    Dataset::new(
        dataset.columns(),
        scored.into_iter().map(|(_, row)| row.clone()).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::model::{Column, Row};

    const COLUMNS: &[Column] = &[Column::new("Name", 20)];

    fn dataset(names: &[&str]) -> Dataset {
        Dataset::new(
            COLUMNS,
            names.iter().map(|n| Row::new(vec![(*n).to_string()])).collect(),
        )
    }

    fn names(dataset: &Dataset) -> Vec<&str> {
        dataset.rows().iter().map(|r| r.cells()[0].as_str()).collect()
    }

    #[test]
    fn test_fuzzy_match() {
        let matcher = Matcher::new();
        assert!(matcher.score("api-key", "apk").is_some());
        assert!(matcher.score("database-password", "dbpw").is_some());
        assert!(matcher.score("API-KEY", "apk").is_some());
        assert!(matcher.score("api-key", "APK").is_some());
        assert!(matcher.score("hello", "xyz").is_none());
    }

    #[test]
    fn test_filter_ranks_and_drops() {
        let fruit = dataset(&["apple", "banana", "grape", "pineapple", "kiwi"]);
        let result = filter("ap", &fruit);
        let found = names(&result);

        assert_eq!(found.first(), Some(&"apple"));
        assert!(found.contains(&"pineapple"));
        assert!(!found.contains(&"banana"));
        assert!(!found.contains(&"kiwi"));
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let fruit = dataset(&["apple", "banana", "kiwi"]);
        let before = fruit.clone();
        let _ = filter("kw", &fruit);
        assert_eq!(fruit, before);
    }

    #[test]
    fn test_empty_query_is_noop() {
        let fruit = dataset(&["apple", "banana", "kiwi"]);
        assert_eq!(filter("", &fruit), fruit);
        assert_eq!(filter("   ", &fruit), fruit);
        assert_eq!(filter("", &filter("", &fruit)), fruit);
    }

    #[test]
    fn test_filter_matches_across_columns() {
        const TWO: &[Column] = &[Column::new("Vault", 20), Column::new("Name", 20)];
        let data = Dataset::new(
            TWO,
            vec![
                Row::new(vec!["kv-prod".into(), "db-password".into()]).with_key("a"),
                Row::new(vec!["kv-dev".into(), "api-key".into()]).with_key("b"),
            ],
        );
        let result = filter("prod db", &data);
        assert_eq!(result.len(), 1);
        assert_eq!(result.row(0).and_then(Row::key), Some("a"));
        assert_eq!(result.columns(), TWO);
    }

    #[test]
    fn test_filter_is_deterministic() {
        let data = dataset(&["alpha", "alpaca", "alps", "beta", "alpine"]);
        assert_eq!(filter("alp", &data), filter("alp", &data));
    }

    #[test]
    fn test_no_match_yields_empty_dataset() {
        let data = dataset(&["alpha", "beta"]);
        let result = filter("zzz", &data);
        assert!(result.is_empty());
        assert_eq!(result.columns(), COLUMNS);
    }
}

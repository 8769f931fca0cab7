// Listing helpers: search text sanitization, sort order, pagination
//
// List endpoints share one shape: filter, sort, count, then skip/limit.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: usize = 20;

/// Hard cap on page size.
pub const MAX_LIMIT: usize = 200;

/// Punctuation allowed in search text besides ASCII letters, digits and space.
const ALLOWED_SEARCH_PUNCTUATION: &str = "!@#$%^&*)(+=._";

/// Strip every character outside `[a-zA-Z0-9 !@#$%^&*)(+=._]`.
pub fn sanitize_search_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| {
            c.is_ascii_alphanumeric() || *c == ' ' || ALLOWED_SEARCH_PUNCTUATION.contains(*c)
        })
        .collect()
}

/// Case-insensitive literal matcher built from user search text.
#[derive(Debug, Clone)]
pub struct SearchPattern(Regex);

impl SearchPattern {
    /// Returns `None` when nothing searchable is left after sanitization.
    pub fn new(raw: &str) -> Option<Self> {
        let cleaned = sanitize_search_text(raw);
        if cleaned.trim().is_empty() {
            return None;
        }

        match RegexBuilder::new(&regex::escape(&cleaned))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Some(Self(re)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build search pattern, ignoring search text");
                None
            }
        }
    }

    pub fn matches(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }

    /// True if any of the fields match.
    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        fields.into_iter().any(|f| self.matches(f))
    }
}

/// Sort direction. Descending unless `ASC` is requested.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum SortOrder {
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[default]
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl SortOrder {
    /// Apply the direction to an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Page<T> {
    /// Number of matching records before skip/limit.
    pub count: usize,
    /// Records in this page.
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

/// Count, then skip and take. `limit` is clamped to `1..=MAX_LIMIT`.
pub fn paginate<T>(items: Vec<T>, skip: usize, limit: usize) -> Page<T> {
    let count = items.len();
    let limit = limit.clamp(1, MAX_LIMIT);
    Page {
        count,
        items: items.into_iter().skip(skip).take(limit).collect(),
    }
}

/// Compare two floats for sorting; NaN sorts as equal.
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_search_text() {
        assert_eq!(sanitize_search_text("john@example.com"), "john@example.com");
        assert_eq!(sanitize_search_text("jo<h>n;[]{}"), "john");
        assert_eq!(sanitize_search_text("a+b (c)"), "a+b (c)");
        assert_eq!(sanitize_search_text("ünïcode"), "ncode");
    }

    #[test]
    fn test_search_pattern_is_literal_and_case_insensitive() {
        let pattern = SearchPattern::new("JOHN.D").unwrap();
        assert!(pattern.matches("john.doe@example.com"));
        // '.' is literal, not a wildcard
        assert!(!pattern.matches("johnxdoe@example.com"));

        // Unbalanced parentheses stay literal
        let pattern = SearchPattern::new("(sale").unwrap();
        assert!(pattern.matches("Big (Sale) today"));
    }

    #[test]
    fn test_search_pattern_empty_after_sanitize() {
        assert!(SearchPattern::new("").is_none());
        assert!(SearchPattern::new("<>[]").is_none());
        assert!(SearchPattern::new("   ").is_none());
    }

    #[test]
    fn test_matches_any() {
        let pattern = SearchPattern::new("doe").unwrap();
        assert!(pattern.matches_any(["John", "Doe", "x@y.z"]));
        assert!(!pattern.matches_any(["Jane", "Roe"]));
    }

    #[test]
    fn test_sort_order() {
        assert_eq!(SortOrder::default(), SortOrder::Desc);
        assert_eq!(SortOrder::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
        let order: SortOrder = serde_json::from_str(r#""ASC""#).unwrap();
        assert_eq!(order, SortOrder::Asc);
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (0..45).collect();

        let page = paginate(items.clone(), 0, DEFAULT_LIMIT);
        assert_eq!(page.count, 45);
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.items[0], 0);

        let page = paginate(items.clone(), 40, DEFAULT_LIMIT);
        assert_eq!(page.items, vec![40, 41, 42, 43, 44]);

        let page = paginate(items.clone(), 100, 10);
        assert_eq!(page.count, 45);
        assert!(page.items.is_empty());

        // Zero limit is clamped up to one record
        let page = paginate(items, 0, 0);
        assert_eq!(page.items.len(), 1);
    }
}

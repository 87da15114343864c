//! Full-text search helpers.

/// Default number of search results per page.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Maximum number of search results per page.
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// `ts_headline` options used for title and body snippets.
pub const HEADLINE_OPTIONS: &str =
    "StartSel=<mark>, StopSel=</mark>, MaxWords=35, MinWords=10, MaxFragments=3";

/// Split user input into terms safe for tsquery construction.
///
/// Strips everything but alphanumerics and `_` from the edges of each term,
/// and drops terms that end up empty. Returns `None` when nothing is left.
fn sanitize_terms(query: &str) -> Option<Vec<&str>> {
    let terms: Vec<&str> = query
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '_'))
        .filter(|t| !t.is_empty() && t.chars().all(|c| c.is_alphanumeric() || c == '_'))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms)
    }
}

/// Convert user input into a PostgreSQL `tsquery` string (terms AND-ed).
///
/// ```
/// use pagewright_core::search::build_tsquery;
/// assert_eq!(build_tsquery("rust wiki"), Some("rust & wiki".to_string()));
/// assert_eq!(build_tsquery("  "), None);
/// ```
pub fn build_tsquery(query: &str) -> Option<String> {
    sanitize_terms(query).map(|terms| terms.join(" & "))
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsquery_strips_operators() {
        assert_eq!(build_tsquery("a|b & !c"), Some("c".to_string()));
        assert_eq!(build_tsquery("(hello)"), Some("hello".to_string()));
        assert_eq!(build_tsquery("!!! ???"), None);
    }

    #[test]
    fn limits_are_clamped() {
        assert_eq!(clamp_limit(None, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT), 20);
        assert_eq!(clamp_limit(Some(0), DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT), 1);
        assert_eq!(clamp_limit(Some(500), DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT), 100);
        assert_eq!(clamp_offset(Some(-4)), 0);
    }
}

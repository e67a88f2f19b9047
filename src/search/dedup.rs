use std::collections::HashSet;

use crate::data_models::SearchResult;

/// Normalizes a URL for duplicate comparison: lower-case, strip the scheme,
/// strip a leading `www.`, strip a trailing slash, drop the query string.
pub fn normalize_url(url: &str) -> String {
    let lower = url.to_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    rest.split('?').next().unwrap_or(rest).to_string()
}

/// Keeps the first occurrence of each normalized URL, in encounter order.
/// Later duplicates are dropped entirely; no metadata merging.
pub fn deduplicate(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|result| seen.insert(normalize_url(&result.url)))
        .collect()
}

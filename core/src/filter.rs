//! Local substring filtering of the cached page snapshot

use crate::page::Page;

/// Filter `pages` down to those whose title contains every whitespace-separated
/// token of `query`, case-insensitively. Input order is preserved.
///
/// An empty query yields no pages; the unfiltered snapshot is shown by the
/// coordinator instead.
pub fn filter_pages(query: &str, pages: &[Page]) -> Vec<Page> {
    if query.is_empty() {
        return Vec::new();
    }

    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();

    pages
        .iter()
        .filter(|page| {
            let title = page.title.to_lowercase();
            tokens.iter().all(|token| title.contains(token.as_str()))
        })
        .cloned()
        .collect()
}

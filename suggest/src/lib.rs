//! Pure suggestion ranking for the composer dropdown.
//!
//! Given a free-text query and a pre-sorted history/bookmark corpus, `filter`
//! returns the ranked rows the dropdown should display, synthesizing a
//! `navigate` row for URL-shaped queries and a `search` row for everything
//! else. The function is deterministic for identical input; all I/O (profile
//! storage, providers) lives with the caller.

use std::sync::LazyLock;

use regex_lite::Regex;
use tabchat_protocol::items::SuggestionItem;
use tabchat_protocol::items::SuggestionKind;

/// Hard cap on rows in the dropdown.
pub const MAX_SUGGESTIONS: usize = 8;

/// Rows shown for an empty query (top-of-corpus browse).
pub const EMPTY_QUERY_SUGGESTIONS: usize = 6;

/// Glyph rendered on synthesized search rows.
pub const SEARCH_ICON: &str = "🔍";

/// Permissive host shape: optional scheme, dotted host, optional path.
static HOST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"^(https?://)?[\w.-]+\.[a-z.]{2,6}(/.*)?$"));

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        // Panic is ok thanks to the `load_regex` test.
        Err(err) => panic!("invalid regex pattern `{pattern}`: {err}"),
    }
}

/// Rank `corpus` against `query` and cap the result at [`MAX_SUGGESTIONS`].
///
/// An empty query browses the top of the corpus unmodified (the provider
/// pre-sorts by visit count, then recency). A non-empty query keeps entries
/// whose title or url contains it case-insensitively, then adds exactly one
/// synthesized row: a `navigate` row up front when the query is URL-shaped,
/// otherwise a `search` row at the back. The final truncation can drop the
/// trailing search row when the corpus already fills the dropdown.
pub fn filter(query: &str, corpus: &[SuggestionItem]) -> Vec<SuggestionItem> {
    if query.is_empty() {
        return corpus
            .iter()
            .take(EMPTY_QUERY_SUGGESTIONS)
            .cloned()
            .collect();
    }

    let needle = query.to_lowercase();
    let mut suggestions: Vec<SuggestionItem> = corpus
        .iter()
        .filter(|item| matches_query(item, &needle))
        .cloned()
        .collect();

    if looks_like_url(query) {
        suggestions.insert(0, navigate_row(query));
    } else {
        suggestions.push(search_row(query));
    }
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// Whether typing `query` plausibly means "go to this address" rather than
/// "search for this text". Deliberately permissive; a bad guess still
/// produces a usable navigate row.
pub fn looks_like_url(query: &str) -> bool {
    HOST_REGEX.is_match(query) || query.contains('.')
}

fn matches_query(item: &SuggestionItem, needle: &str) -> bool {
    if item.title.to_lowercase().contains(needle) {
        return true;
    }
    item.url
        .as_ref()
        .is_some_and(|url| url.to_lowercase().contains(needle))
}

fn navigate_row(query: &str) -> SuggestionItem {
    let url = if query.starts_with("http") {
        query.to_string()
    } else {
        format!("https://{query}")
    };
    SuggestionItem::new(SuggestionKind::Navigate, query).with_url(url)
}

fn search_row(query: &str) -> SuggestionItem {
    SuggestionItem::new(SuggestionKind::Search, format!("Search for \"{query}\""))
        .with_icon(SEARCH_ICON)
}

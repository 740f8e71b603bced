//! Markdown pages on disk, their rendering, and search over them.

pub mod markdown;
pub mod search;
mod store;

use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::nav;
pub use markdown::Heading;
pub use search::SearchHit;
pub use store::{ContentError, ContentStore, format_last_updated, init_store, store};

/// Most results the search box asks for.
pub const SEARCH_LIMIT: usize = 10;
/// Shorter queries are not sent to the server.
pub const MIN_QUERY_CHARS: usize = 2;

/// A rendered page as the client receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub route: String,
    pub title: String,
    pub description: Option<String>,
    pub html: String,
    pub headings: Vec<Heading>,
    pub last_updated: Option<String>,
    /// Markdown file relative to the content root, e.g. `devops/docker.md`.
    pub source_path: String,
}

/// Markdown file backing `route`, relative to the content root.
///
/// `/` maps to `index.md`, `/a/` to `a/index.md` and `/a/b` to `a/b.md`.
/// Routes that could leave the content root or reach hidden files map to
/// nothing.
pub fn page_source(route: &str) -> Option<String> {
    let route = nav::normalize_route(route);
    let route = match route.strip_suffix(".md") {
        Some(stem) => nav::normalize_route(stem),
        None => route,
    };

    let directory = route.ends_with('/');
    let mut segments: Vec<&str> = route[1..].split('/').collect();
    if directory {
        segments.pop();
    }
    let unsafe_segment = |s: &&str| s.is_empty() || s.starts_with('.') || s.contains(['\\', ':']);
    if segments.iter().any(unsafe_segment) {
        return None;
    }

    let path = segments.join("/");
    Some(match (directory, path.is_empty()) {
        (true, true) => "index.md".to_string(),
        (true, false) => format!("{path}/index.md"),
        (false, _) => format!("{path}.md"),
    })
}

/// Title for a page that has neither front matter nor a `# heading`.
pub fn title_from_source(source_path: &str) -> String {
    let mut parts = source_path.trim_end_matches(".md").rsplit('/');
    let mut stem = parts.next().unwrap_or_default();
    if stem == "index" {
        stem = parts.next().unwrap_or_default();
    }
    if stem.is_empty() {
        return "Home".to_string();
    }

    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Server function returning the page at `path`, or `None` when there is no
/// such page.
#[server(FetchPage)]
pub async fn fetch_page(path: String) -> Result<Option<PageView>, ServerFnError> {
    let store = store().ok_or_else(|| ServerFnError::new("content store not initialized"))?;
    store.page(&path).map_err(|err| {
        tracing::error!(path = %path, error = %err, "failed to load page");
        ServerFnError::new(err.to_string())
    })
}

/// Server function running a search query against the content index.
#[server(SearchPages)]
pub async fn search_pages(query: String) -> Result<Vec<SearchHit>, ServerFnError> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Ok(Vec::new());
    }
    let store = store().ok_or_else(|| ServerFnError::new("content store not initialized"))?;
    Ok(store.search(query, SEARCH_LIMIT))
}

//! Content root on disk plus the search index built at start-up.

use chrono::{DateTime, Local, TimeZone};
use std::collections::HashSet;
use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::markdown::{Section, render_markdown};
use super::search::{SearchHit, SearchIndex};
use super::{PageView, page_source, title_from_source};
use crate::config::SiteConfig;
use crate::nav;

static STORE: OnceLock<ContentStore> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content directory {0} does not exist")]
    MissingRoot(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("content store already initialized")]
    AlreadyInitialized,
}

/// Install the store used by the server functions. Call once at start-up.
pub fn init_store(store: ContentStore) -> Result<(), ContentError> {
    STORE.set(store).map_err(|_| ContentError::AlreadyInitialized)
}

pub fn store() -> Option<&'static ContentStore> {
    STORE.get()
}

/// Short local timestamp shown under a page, e.g. `3/7/24, 2:05 PM`.
pub fn format_last_updated<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%-m/%-d/%y, %-I:%M %p").to_string()
}

#[derive(Debug)]
pub struct ContentStore {
    root: PathBuf,
    index: SearchIndex,
    missing: Vec<String>,
}

impl ContentStore {
    /// Index every internal page the nav bar and sidebar link to. Links to
    /// pages that do not exist are recorded, not fatal.
    pub fn open(root: impl Into<PathBuf>, config: &SiteConfig) -> Result<Self, ContentError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ContentError::MissingRoot(root));
        }

        let mut store = Self {
            root,
            index: SearchIndex::new(),
            missing: Vec::new(),
        };

        let mut seen = HashSet::new();
        let links = config
            .nav
            .iter()
            .chain(config.sidebar.pages())
            .filter(|link| !link.is_external())
            .map(|link| nav::normalize_route(&link.link));
        let routes = std::iter::once("/".to_string()).chain(links);

        for route in routes {
            if !seen.insert(route.clone()) {
                continue;
            }
            match store.load(&route)? {
                Some((page, sections)) => store.index.add_page(&page.route, &page.title, &sections),
                None => store.missing.push(route),
            }
        }

        tracing::info!(
            root = %store.root.display(),
            sections = store.index.len(),
            missing = store.missing.len(),
            "content indexed"
        );
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Linked routes that have no markdown file behind them.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Render the page at `route`. `Ok(None)` when the route names no page.
    ///
    /// `/a` falls back to `a/index.md` when `a.md` does not exist.
    pub fn page(&self, route: &str) -> Result<Option<PageView>, ContentError> {
        Ok(self.load(route)?.map(|(page, _)| page))
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.index.query(query, limit)
    }

    fn load(&self, route: &str) -> Result<Option<(PageView, Vec<Section>)>, ContentError> {
        let normalized = nav::normalize_route(route);
        let mut candidates = vec![page_source(&normalized)];
        if !normalized.ends_with('/') {
            candidates.push(page_source(&format!("{normalized}/")));
        }

        for source_path in candidates.into_iter().flatten() {
            let path = self.root.join(&source_path);
            let Some(markdown) = read_page(&path)? else {
                continue;
            };

            let rendered = render_markdown(&markdown);
            let last_updated = std::fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .ok()
                .map(|modified| format_last_updated(&DateTime::<Local>::from(modified)));

            let page = PageView {
                route: normalized,
                title: rendered.title.unwrap_or_else(|| title_from_source(&source_path)),
                description: rendered.description,
                html: rendered.html,
                headings: rendered.headings,
                last_updated,
                source_path,
            };
            return Ok(Some((page, rendered.sections)));
        }

        Ok(None)
    }
}

fn read_page(path: &Path) -> Result<Option<String>, ContentError> {
    match std::fs::read_to_string(path) {
        Ok(markdown) => Ok(Some(markdown)),
        Err(err) if matches!(err.kind(), io::ErrorKind::NotFound | io::ErrorKind::IsADirectory) => Ok(None),
        Err(source) => Err(ContentError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

//! In-memory full-text search over page sections.

use serde::{Deserialize, Serialize};

use super::markdown::Section;

const EXCERPT_LEAD: usize = 40;
const EXCERPT_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub heading: Option<String>,
    pub link: String,
    pub excerpt: String,
    pub score: u32,
}

/// Lowercased text plus, per character, where it came from in the original.
#[derive(Debug, Default)]
struct Folded {
    lower: String,
    origins: Vec<(usize, usize)>,
}

impl Folded {
    fn new(text: &str) -> Self {
        let mut folded = Folded::default();
        for (offset, c) in text.char_indices() {
            folded.origins.push((folded.lower.len(), offset));
            folded.lower.extend(c.to_lowercase());
        }
        folded
    }

    /// Byte offset in the original text for a byte offset into `lower`.
    fn original_offset(&self, lower_offset: usize) -> usize {
        let index = self.origins.partition_point(|(lower, _)| *lower <= lower_offset);
        index.checked_sub(1).map_or(0, |i| self.origins[i].1)
    }
}

#[derive(Debug)]
struct Entry {
    title: String,
    heading: Option<String>,
    link: String,
    text: String,
    title_lower: String,
    heading_lower: String,
    body: Folded,
}

#[derive(Debug, Default)]
pub struct SearchIndex {
    entries: Vec<Entry>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the sections of a rendered page reachable at `route`.
    pub fn add_page(&mut self, route: &str, title: &str, sections: &[Section]) {
        for section in sections {
            let (heading, link) = match &section.heading {
                Some(heading) => (Some(heading.text.clone()), format!("{route}#{}", heading.anchor)),
                None => (None, route.to_string()),
            };
            self.entries.push(Entry {
                title: title.to_string(),
                title_lower: title.to_lowercase(),
                heading_lower: heading.as_deref().unwrap_or_default().to_lowercase(),
                heading,
                link,
                body: Folded::new(&section.text),
                text: section.text.clone(),
            });
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sections containing every term of `query`, best first.
    ///
    /// A term in the page title or section heading scores 3, in the body 1.
    pub fn query(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .filter_map(|entry| score(entry, &terms).map(|score| (entry, score)))
            .map(|(entry, score)| SearchHit {
                title: entry.title.clone(),
                heading: entry.heading.clone(),
                link: entry.link.clone(),
                excerpt: excerpt(entry, &terms),
                score,
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.link.cmp(&b.link))
        });
        hits.truncate(limit);
        hits
    }
}

fn score(entry: &Entry, terms: &[String]) -> Option<u32> {
    let mut total = 0;
    for term in terms {
        let in_heading = entry.title_lower.contains(term.as_str()) || entry.heading_lower.contains(term.as_str());
        let in_body = entry.body.lower.contains(term.as_str());
        if !in_heading && !in_body {
            return None;
        }
        total += 3 * u32::from(in_heading) + u32::from(in_body);
    }
    Some(total)
}

/// Up to `EXCERPT_CHARS` characters of the body around the first term found.
fn excerpt(entry: &Entry, terms: &[String]) -> String {
    let text = entry.text.as_str();
    let found = terms
        .iter()
        .filter_map(|term| entry.body.lower.find(term.as_str()))
        .min()
        .map(|lower| entry.body.original_offset(lower))
        .unwrap_or(0);

    let start = text[..found]
        .char_indices()
        .rev()
        .nth(EXCERPT_LEAD - 1)
        .map_or(0, |(offset, _)| offset);
    let end = text[start..]
        .char_indices()
        .nth(EXCERPT_CHARS)
        .map_or(text.len(), |(offset, _)| start + offset);

    let mut out = String::new();
    if start > 0 {
        out.push('\u{2026}');
    }
    out.push_str(text[start..end].trim());
    if end < text.len() {
        out.push('\u{2026}');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::markdown::render_markdown;

    fn index() -> SearchIndex {
        let mut index = SearchIndex::new();
        let docker = render_markdown(
            "# Docker\n\nContainer basics.\n\n## Volumes\n\nMount a volume with `docker run -v data:/data`.\n\n## Networks\n\nCreate a bridge network.\n",
        );
        index.add_page("/devops/docker", "Docker", &docker.sections);
        let k8s = render_markdown(
            "# Kubernetes\n\n## Pods\n\nList pods with kubectl. Pods can mount a volume from a claim.\n",
        );
        index.add_page("/devops/kubernetes", "Kubernetes (kubectl)", &k8s.sections);
        index
    }

    #[test]
    fn test_sections_become_entries() {
        let index = index();
        assert_eq!(index.len(), 4);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_blank_query_finds_nothing() {
        assert!(index().query("   ", 10).is_empty());
    }

    #[test]
    fn test_every_term_must_match() {
        let hits = index().query("volume bridge", 10);
        assert!(hits.is_empty());

        let hits = index().query("DOCKER volume", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].link, "/devops/docker#volumes");
        assert_eq!(hits[0].heading.as_deref(), Some("Volumes"));
    }

    #[test]
    fn test_heading_matches_rank_first() {
        let hits = index().query("volume", 10);
        let links: Vec<&str> = hits.iter().map(|h| h.link.as_str()).collect();
        // Heading hit (3 + 1) beats body-only hit (1).
        assert_eq!(links, vec!["/devops/docker#volumes", "/devops/kubernetes#pods"]);
        assert_eq!(hits[0].score, 4);
        assert_eq!(hits[1].score, 1);
    }

    #[test]
    fn test_limit() {
        assert_eq!(index().query("docker", 1).len(), 1);
    }

    #[test]
    fn test_excerpt_is_cut_on_char_boundaries() {
        let mut index = SearchIndex::new();
        let filler = "é".repeat(100);
        let page = render_markdown(&format!("## Héllo\n\n{filler} needle {filler}\n"));
        index.add_page("/x", "X", &page.sections);

        let hits = index.query("NEEDLE", 5);
        assert_eq!(hits.len(), 1);
        let excerpt = &hits[0].excerpt;
        assert!(excerpt.starts_with('\u{2026}'));
        assert!(excerpt.ends_with('\u{2026}'));
        assert!(excerpt.contains("needle"));
        assert!(excerpt.chars().count() <= EXCERPT_CHARS + 2);
    }

    #[test]
    fn test_folded_offsets_survive_case_changes() {
        let folded = Folded::new("İstanbul kubectl");
        let lower = folded.lower.find("kubectl").unwrap();
        assert_eq!(folded.original_offset(lower), "İstanbul ".len());
    }
}

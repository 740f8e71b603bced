//! Navigation tree: top nav links and the sidebar.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub text: String,
    pub link: String,
}

impl NavLink {
    pub fn is_external(&self) -> bool {
        is_external(&self.link)
    }
}

/// A titled block of sidebar entries. Groups with `collapsed` set can be
/// folded; `Some(true)` starts folded unless it holds the current page.
#[derive(Debug, Clone, Deserialize)]
pub struct SidebarGroup {
    pub text: String,
    #[serde(default)]
    pub collapsed: Option<bool>,
    pub items: Vec<SidebarItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SidebarItem {
    Group(SidebarGroup),
    Link(NavLink),
}

impl SidebarGroup {
    pub fn is_collapsible(&self) -> bool {
        self.collapsed.is_some()
    }

    /// Whether the group should render folded while `path` is open.
    pub fn starts_collapsed(&self, path: &str) -> bool {
        self.collapsed == Some(true) && !self.contains(path)
    }

    /// Whether `path` is one of this group's pages, at any depth.
    pub fn contains(&self, path: &str) -> bool {
        let mut links = Vec::new();
        self.collect_links(&mut links);
        links.iter().any(|link| is_active(&link.link, path))
    }

    fn collect_links<'a>(&'a self, out: &mut Vec<&'a NavLink>) {
        for item in &self.items {
            match item {
                SidebarItem::Link(link) => out.push(link),
                SidebarItem::Group(group) => group.collect_links(out),
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Sidebar(Vec<SidebarGroup>);

/// Pages before and after the current one in sidebar order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors<'a> {
    pub prev: Option<&'a NavLink>,
    pub next: Option<&'a NavLink>,
}

impl Sidebar {
    pub fn new(groups: Vec<SidebarGroup>) -> Self {
        Self(groups)
    }

    pub fn groups(&self) -> &[SidebarGroup] {
        &self.0
    }

    /// Every link in reading order, depth first.
    pub fn pages(&self) -> Vec<&NavLink> {
        let mut links = Vec::new();
        for group in &self.0 {
            group.collect_links(&mut links);
        }
        links
    }

    pub fn find(&self, path: &str) -> Option<&NavLink> {
        self.pages().into_iter().find(|link| is_active(&link.link, path))
    }

    /// Previous and next internal pages around `path`. Both are `None` when the
    /// page is not in the sidebar.
    pub fn neighbors(&self, path: &str) -> Neighbors<'_> {
        let pages: Vec<&NavLink> = self.pages().into_iter().filter(|link| !link.is_external()).collect();
        let Some(index) = pages.iter().position(|link| is_active(&link.link, path)) else {
            return Neighbors::default();
        };
        Neighbors {
            prev: index.checked_sub(1).map(|i| pages[i]),
            next: pages.get(index + 1).copied(),
        }
    }
}

/// Canonical form of a route: leading `/`, no query or fragment, no `.html`
/// suffix, and `/dir/index` written as `/dir/`.
pub fn normalize_route(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.strip_suffix(".html").unwrap_or(path);
    let path = if path == "index" {
        ""
    } else {
        path.strip_suffix("/index").map_or(path, |dir| &path[..dir.len() + 1])
    };

    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

pub fn is_external(link: &str) -> bool {
    ["http://", "https://", "mailto:"]
        .iter()
        .any(|scheme| link.starts_with(scheme))
}

/// Whether `link` points at the page currently open at `path`.
pub fn is_active(link: &str, path: &str) -> bool {
    !is_external(link) && normalize_route(link) == normalize_route(path)
}

/// Whether the nav bar entry `link` covers `path`: the page itself, or any
/// page under it for directory links such as `/leetcode/`.
pub fn is_within(link: &str, path: &str) -> bool {
    if is_external(link) {
        return false;
    }
    let link = normalize_route(link);
    let path = normalize_route(path);
    if link == "/" || !link.ends_with('/') {
        return link == path;
    }
    path.starts_with(&link) || path == link.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(text: &str, link: &str) -> SidebarItem {
        SidebarItem::Link(NavLink {
            text: text.to_string(),
            link: link.to_string(),
        })
    }

    fn group(text: &str, collapsed: Option<bool>, items: Vec<SidebarItem>) -> SidebarGroup {
        SidebarGroup {
            text: text.to_string(),
            collapsed,
            items,
        }
    }

    fn sample() -> Sidebar {
        Sidebar::new(vec![
            group(
                "LeetCode",
                None,
                vec![
                    link("Overview", "/leetcode/"),
                    SidebarItem::Group(group(
                        "Data Structures",
                        Some(true),
                        vec![link("Array", "/leetcode/data-structures/array"), link("Stack", "/leetcode/data-structures/stack")],
                    )),
                ],
            ),
            group(
                "Other",
                None,
                vec![link("Upstream", "https://example.com/cheats"), link("Git", "/other/git")],
            ),
        ])
    }

    #[test]
    fn test_normalize_route() {
        assert_eq!(normalize_route(""), "/");
        assert_eq!(normalize_route("/"), "/");
        assert_eq!(normalize_route("index"), "/");
        assert_eq!(normalize_route("/index.html"), "/");
        assert_eq!(normalize_route("/leetcode/index"), "/leetcode/");
        assert_eq!(normalize_route("/leetcode/index.html"), "/leetcode/");
        assert_eq!(normalize_route("devops/docker"), "/devops/docker");
        assert_eq!(normalize_route("/devops/docker.html#run"), "/devops/docker");
        assert_eq!(normalize_route("/devops/docker?tab=2"), "/devops/docker");
        // A trailing slash is a directory index, not the same page.
        assert_ne!(normalize_route("/leetcode"), normalize_route("/leetcode/"));
    }

    #[test]
    fn test_external_links() {
        assert!(is_external("https://github.com/afasari/cheatsheets"));
        assert!(is_external("mailto:someone@example.com"));
        assert!(!is_external("/devops/docker"));
        assert!(!is_active("https://example.com/", "/"));
    }

    #[test]
    fn test_pages_in_reading_order() {
        let sidebar = sample();
        let links: Vec<&str> = sidebar.pages().iter().map(|l| l.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "/leetcode/",
                "/leetcode/data-structures/array",
                "/leetcode/data-structures/stack",
                "https://example.com/cheats",
                "/other/git",
            ]
        );
    }

    #[test]
    fn test_neighbors_skip_external_links() {
        let sidebar = sample();

        let first = sidebar.neighbors("/leetcode/");
        assert_eq!(first.prev, None);
        assert_eq!(first.next.map(|l| l.text.as_str()), Some("Array"));

        let crossing = sidebar.neighbors("/leetcode/data-structures/stack");
        assert_eq!(crossing.prev.map(|l| l.text.as_str()), Some("Array"));
        assert_eq!(crossing.next.map(|l| l.text.as_str()), Some("Git"));

        let last = sidebar.neighbors("/other/git.html");
        assert_eq!(last.prev.map(|l| l.text.as_str()), Some("Stack"));
        assert_eq!(last.next, None);

        assert_eq!(sidebar.neighbors("/nowhere"), Neighbors::default());
    }

    #[test]
    fn test_collapsed_group_opens_for_active_page() {
        let sidebar = sample();
        let SidebarItem::Group(structures) = &sidebar.groups()[0].items[1] else {
            panic!("expected nested group");
        };

        assert!(structures.is_collapsible());
        assert!(structures.starts_collapsed("/leetcode/"));
        assert!(!structures.starts_collapsed("/leetcode/data-structures/stack"));
        assert!(sidebar.groups()[0].contains("/leetcode/data-structures/array"));
        assert!(!sidebar.groups()[1].is_collapsible());
    }

    #[test]
    fn test_nav_sections() {
        assert!(is_within("/leetcode/", "/leetcode/algorithms/two-pointers"));
        assert!(is_within("/leetcode/", "/leetcode"));
        assert!(!is_within("/leetcode/", "/guides/how-to-use"));
        assert!(is_within("/", "/index.html"));
        assert!(!is_within("/", "/devops/docker"));
        assert!(is_within("/guides/how-to-use", "/guides/how-to-use.html"));
        assert!(!is_within("https://github.com/afasari/cheatsheets", "/"));
    }

    #[test]
    fn test_find() {
        let sidebar = sample();
        assert_eq!(sidebar.find("/other/git").map(|l| l.text.as_str()), Some("Git"));
        assert!(sidebar.find("/other/linux").is_none());
    }
}

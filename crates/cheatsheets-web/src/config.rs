//! Site configuration: metadata, navigation, search labels, edit link, footer.
//!
//! `site.toml` is compiled into both the server and the hydrated client so the
//! navigation renders the same on either side.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use crate::enhancer::{BlockSelector, DEFAULT_REVERT_AFTER, EnhancerSettings};
use crate::nav::{self, NavLink, Sidebar, SidebarGroup, SidebarItem};

const BUNDLED_CONFIG: &str = include_str!("../site.toml");

/// The bundled site configuration.
pub static CONFIG: LazyLock<SiteConfig> =
    LazyLock::new(|| SiteConfig::bundled().expect("bundled site.toml must parse"));

// ── TOML shape ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub appearance: Appearance,
    /// Public path the site is mounted under. The server only serves at `/`;
    /// any other value is reported by `validate`.
    #[serde(default)]
    pub base: Option<String>,
    /// Text next to the logo. An empty string shows the logo alone; absent
    /// falls back to `title`.
    #[serde(default)]
    pub site_title: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub head: Vec<HeadLink>,
    #[serde(default)]
    pub nav: Vec<NavLink>,
    #[serde(default)]
    pub sidebar: Sidebar,
    #[serde(default)]
    pub search: SearchLabels,
    #[serde(default)]
    pub edit_link: Option<EditLink>,
    #[serde(default)]
    pub last_updated: Option<LastUpdated>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub footer: Option<Footer>,
    #[serde(default)]
    pub copy_button: CopyButtonConfig,
}

fn default_lang() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    #[default]
    Dark,
    Light,
}

impl Appearance {
    /// Class put on `<html>`.
    pub fn html_class(self) -> &'static str {
        match self {
            Appearance::Dark => "dark",
            Appearance::Light => "",
        }
    }
}

/// Extra `<link>` tags in the document head (favicons and the like).
#[derive(Debug, Clone, Deserialize)]
pub struct HeadLink {
    pub rel: String,
    pub href: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Labels for the search widget.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchLabels {
    pub button_text: String,
    pub button_aria_label: String,
    pub no_results_text: String,
    pub reset_button_title: String,
    pub select_text: String,
    pub navigate_text: String,
    pub close_text: String,
}

impl Default for SearchLabels {
    fn default() -> Self {
        Self {
            button_text: "Search".to_string(),
            button_aria_label: "Search".to_string(),
            no_results_text: "No results".to_string(),
            reset_button_title: "Clear search query".to_string(),
            select_text: "to select".to_string(),
            navigate_text: "to navigate".to_string(),
            close_text: "to close".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditLink {
    /// URL with a `:path` placeholder for the page's markdown path.
    pub pattern: String,
    pub text: String,
}

impl EditLink {
    /// Edit URL for a page whose source is `source_path` (relative to the
    /// content root, e.g. `devops/docker.md`).
    pub fn url_for(&self, source_path: &str) -> String {
        self.pattern.replace(":path", source_path.trim_start_matches('/'))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastUpdated {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocialLink {
    pub icon: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Footer {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
}

/// Which code blocks get copy buttons and how long "copied" shows.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CopyButtonConfig {
    /// Substring of the code block's class attribute.
    pub block_class: String,
    /// Only enhance blocks under elements matching this selector.
    pub within: Option<String>,
    pub revert_after_ms: u64,
}

impl Default for CopyButtonConfig {
    fn default() -> Self {
        Self {
            block_class: "language-".to_string(),
            within: None,
            revert_after_ms: DEFAULT_REVERT_AFTER.as_millis() as u64,
        }
    }
}

impl CopyButtonConfig {
    pub fn settings(&self) -> EnhancerSettings {
        let mut selector = BlockSelector::new(self.block_class.clone());
        selector.within = self.within.clone();
        EnhancerSettings {
            selector,
            revert_after: Duration::from_millis(self.revert_after_ms),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl SiteConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context(
            "Failed to parse site config. Check for:\n\
             - Missing required fields (title, description)\n\
             - Sidebar entries that have neither `link` nor `items`\n\
             - Invalid TOML syntax (missing quotes, brackets, etc.)",
        )
    }

    /// Load a site config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read site config: {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid site config: {}", path.display()))
    }

    /// The configuration compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_toml(BUNDLED_CONFIG)
    }

    /// Text shown next to the logo, if any.
    pub fn nav_title(&self) -> Option<&str> {
        match self.site_title.as_deref() {
            Some("") => None,
            Some(title) => Some(title),
            None => Some(&self.title),
        }
    }

    /// Problems that do not stop the site from serving but are worth a warning.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        if let Some(base) = self.base.as_deref().filter(|base| base.trim_matches('/') != "") {
            issues.push(ConfigIssue::UnsupportedBase(base.to_string()));
        }
        for link in &self.nav {
            check_link(link, &mut issues);
        }
        for group in self.sidebar.groups() {
            check_group(group, &mut seen, &mut issues);
        }
        issues
    }
}

fn check_group(group: &SidebarGroup, seen: &mut HashSet<String>, issues: &mut Vec<ConfigIssue>) {
    if group.items.is_empty() {
        issues.push(ConfigIssue::EmptyGroup(group.text.clone()));
    }
    for item in &group.items {
        match item {
            SidebarItem::Group(inner) => check_group(inner, seen, issues),
            SidebarItem::Link(link) => {
                check_link(link, issues);
                if !link.is_external() && !seen.insert(nav::normalize_route(&link.link)) {
                    issues.push(ConfigIssue::DuplicateLink(link.link.clone()));
                }
            }
        }
    }
}

fn check_link(link: &NavLink, issues: &mut Vec<ConfigIssue>) {
    if link.text.trim().is_empty() {
        issues.push(ConfigIssue::EmptyText(link.link.clone()));
    }
    if !link.is_external() && !link.link.starts_with('/') {
        issues.push(ConfigIssue::RelativeLink {
            text: link.text.clone(),
            link: link.link.clone(),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    DuplicateLink(String),
    RelativeLink { text: String, link: String },
    EmptyGroup(String),
    EmptyText(String),
    UnsupportedBase(String),
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::DuplicateLink(link) => write!(f, "sidebar links to {link} more than once"),
            ConfigIssue::RelativeLink { text, link } => {
                write!(f, "link \"{text}\" ({link}) must start with '/' or be an absolute URL")
            }
            ConfigIssue::EmptyGroup(text) => write!(f, "sidebar group \"{text}\" has no items"),
            ConfigIssue::EmptyText(link) => write!(f, "link to {link} has no text"),
            ConfigIssue::UnsupportedBase(base) => {
                write!(f, "base {base} is not supported; the site is served at /")
            }
        }
    }
}

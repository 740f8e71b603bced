//! Markdown to HTML for cheat sheet pages.
//!
//! Fenced code is emitted as
//! `<div class="language-{lang}"><span class="lang">…</span><pre><code>…</code></pre></div>`,
//! the markup the copy-button enhancer scans for.

use pulldown_cmark_escape::escape_html;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A heading that gets an anchor and a sidebar outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub anchor: String,
}

/// Plain text of the page between two outline headings, for search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub heading: Option<Heading>,
    pub text: String,
}

impl Section {
    fn push_text(&mut self, fragment: &str) {
        for word in fragment.split_whitespace() {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.text.push_str(word);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Front matter `title`, else the first `# heading`.
    pub title: Option<String>,
    pub description: Option<String>,
    pub html: String,
    pub headings: Vec<Heading>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Split a leading `---` YAML block from the markdown body.
fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let Some(rest) = source.strip_prefix("---\n").or_else(|| source.strip_prefix("---\r\n")) else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, source)
}

fn parse_front_matter(yaml: &str) -> FrontMatter {
    if yaml.trim().is_empty() {
        return FrontMatter::default();
    }
    serde_yaml::from_str(yaml).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring malformed front matter");
        FrontMatter::default()
    })
}

pub fn render_markdown(source: &str) -> Rendered {
    let (front, body) = split_front_matter(source);
    let front = front.map(parse_front_matter).unwrap_or_default();

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let mut events = Parser::new_ext(body, options);
    let mut out: Vec<Event> = Vec::new();
    let mut anchors = Anchors::default();
    let mut first_h1 = None;
    let mut headings = Vec::new();
    let mut sections = vec![Section::default()];

    while let Some(event) = events.next() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match &kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                let mut code = String::new();
                for inner in events.by_ref() {
                    match inner {
                        Event::End(TagEnd::CodeBlock) => break,
                        Event::Text(text) => code.push_str(&text),
                        _ => {}
                    }
                }
                current(&mut sections).push_text(&code);
                out.push(Event::Html(code_block_html(lang.as_deref(), &code).into()));
            }
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let mut inner = Vec::new();
                let mut text = String::new();
                for event in events.by_ref() {
                    match event {
                        Event::End(TagEnd::Heading(_)) => break,
                        Event::Text(ref t) | Event::Code(ref t) => {
                            text.push_str(t);
                            inner.push(event);
                        }
                        other => inner.push(other),
                    }
                }
                let text = text.trim().to_string();

                let anchor = match id {
                    Some(id) => anchors.claim(id.to_string()),
                    None => anchors.claim(slugify(&text)),
                };

                if level == HeadingLevel::H1 {
                    if first_h1.is_none() {
                        first_h1 = Some(text.clone());
                    }
                } else if matches!(level, HeadingLevel::H2 | HeadingLevel::H3) {
                    let heading = Heading {
                        level: level as u8,
                        text: text.clone(),
                        anchor: anchor.clone(),
                    };
                    headings.push(heading.clone());
                    sections.push(Section {
                        heading: Some(heading),
                        text: String::new(),
                    });
                } else {
                    current(&mut sections).push_text(&text);
                }

                out.push(Event::Start(Tag::Heading {
                    level,
                    id: Some(CowStr::from(anchor)),
                    classes,
                    attrs,
                }));
                out.extend(inner);
                out.push(Event::End(TagEnd::Heading(level)));
            }
            Event::Text(text) => {
                current(&mut sections).push_text(&text);
                out.push(Event::Text(text));
            }
            Event::Code(code) => {
                current(&mut sections).push_text(&code);
                out.push(Event::Code(code));
            }
            other => out.push(other),
        }
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, out.into_iter());

    sections.retain(|section| section.heading.is_some() || !section.text.is_empty());

    Rendered {
        title: front.title.or(first_h1),
        description: front.description,
        html: html_output,
        headings,
        sections,
    }
}

fn current(sections: &mut Vec<Section>) -> &mut Section {
    if sections.is_empty() {
        sections.push(Section::default());
    }
    let last = sections.len() - 1;
    &mut sections[last]
}

fn code_block_html(lang: Option<&str>, code: &str) -> String {
    let lang: String = lang
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
        .collect();
    let lang = if lang.is_empty() { "txt".to_string() } else { lang };

    let mut html = format!("<div class=\"language-{lang}\"><span class=\"lang\">{lang}</span><pre><code>");
    if let Err(err) = escape_html(&mut html, code) {
        tracing::warn!(error = ?err, "failed to escape code block");
    }
    html.push_str("</code></pre></div>\n");
    html
}

/// Anchor id for a heading: lowercase words joined by `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Hands out unique anchors within one page.
#[derive(Default)]
struct Anchors(HashMap<String, usize>);

impl Anchors {
    fn claim(&mut self, base: String) -> String {
        let base = if base.is_empty() { "section".to_string() } else { base };
        let count = self.0.entry(base.clone()).or_insert(0);
        let anchor = if *count == 0 { base } else { format!("{base}-{count}") };
        *count += 1;
        anchor
    }
}

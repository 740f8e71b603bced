use leptos::prelude::*;

use super::ExternalLink;
use crate::config::CONFIG;
use crate::content::PageView;
use crate::nav::NavLink;

/// Edit link, last-updated time and previous/next page links.
#[component]
pub fn DocFooter(page: PageView) -> impl IntoView {
    let neighbors = CONFIG.sidebar.neighbors(&page.route);

    let edit = CONFIG
        .edit_link
        .as_ref()
        .map(|edit| view! { <ExternalLink href=edit.url_for(&page.source_path) label=edit.text.as_str() /> });

    let updated = CONFIG.last_updated.as_ref().zip(page.last_updated).map(|(label, at)| {
        view! {
            <p class="last-updated">
                {label.text.as_str()} ": " <time>{at}</time>
            </p>
        }
    });

    view! {
        <footer class="doc-footer">
            <div class="edit-info">
                <div class="edit-link">{edit}</div>
                {updated}
            </div>
            <nav class="pager" aria-label="Pager">
                {neighbors.prev.map(|link| view! { <PagerLink link=link direction="prev" label="Previous page" /> })}
                {neighbors.next.map(|link| view! { <PagerLink link=link direction="next" label="Next page" /> })}
            </nav>
        </footer>
    }
}

#[component]
fn PagerLink(link: &'static NavLink, direction: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <a class=format!("pager-link {direction}") href=link.link.as_str()>
            <span class="desc">{label}</span>
            <span class="title">{link.text.as_str()}</span>
        </a>
    }
}

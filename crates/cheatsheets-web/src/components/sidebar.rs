use leptos::prelude::*;
use leptos_router::hooks::use_location;

use super::ExternalLink;
use crate::config::CONFIG;
use crate::nav::{self, NavLink, SidebarGroup, SidebarItem};

#[component]
pub fn Sidebar() -> impl IntoView {
    view! {
        <aside class="sidebar">
            <nav aria-label="Sidebar">
                {CONFIG
                    .sidebar
                    .groups()
                    .iter()
                    .map(|group| view! { <SidebarSection group=group depth=0 /> })
                    .collect_view()}
            </nav>
        </aside>
    }
}

/// One group and, recursively, its nested groups.
#[component]
fn SidebarSection(group: &'static SidebarGroup, depth: usize) -> impl IntoView {
    let pathname = use_location().pathname;
    let collapsible = group.is_collapsible();
    let collapsed = RwSignal::new(group.starts_collapsed(&pathname.get_untracked()));

    // Navigating into a folded group opens it.
    Effect::new(move |_| {
        if group.contains(&pathname.get()) {
            collapsed.set(false);
        }
    });

    let title = if collapsible {
        view! {
            <button
                type="button"
                class="sidebar-group-title"
                aria-expanded=move || (!collapsed.get()).to_string()
                on:click=move |_| collapsed.update(|folded| *folded = !*folded)
            >
                {group.text.as_str()}
                <span class="caret" aria-hidden="true"></span>
            </button>
        }
        .into_any()
    } else {
        view! { <p class="sidebar-group-title">{group.text.as_str()}</p> }.into_any()
    };

    let items = group
        .items
        .iter()
        .map(|item| match item {
            SidebarItem::Link(link) => view! { <SidebarLink link=link /> }.into_any(),
            SidebarItem::Group(inner) => view! { <SidebarSection group=inner depth={depth + 1} /> }.into_any(),
        })
        .collect_view();

    view! {
        <section
            class=format!("sidebar-group level-{depth}")
            class:collapsible=collapsible
            class:collapsed=move || collapsed.get()
        >
            {title}
            <div class="sidebar-items">{items}</div>
        </section>
    }
}

#[component]
fn SidebarLink(link: &'static NavLink) -> impl IntoView {
    if link.is_external() {
        return view! { <ExternalLink href=link.link.as_str() label=link.text.as_str() class="sidebar-link" /> }
            .into_any();
    }

    let pathname = use_location().pathname;
    let active = move || nav::is_active(&link.link, &pathname.get());
    view! {
        <a
            class="sidebar-link"
            class:active=active
            aria-current=move || active().then_some("page")
            href=link.link.as_str()
        >
            {link.text.as_str()}
        </a>
    }
    .into_any()
}

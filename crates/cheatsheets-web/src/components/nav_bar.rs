use leptos::prelude::*;
use leptos_router::hooks::use_location;

use super::{ExternalLink, SearchBox};
use crate::config::{CONFIG, SocialLink};
use crate::nav::{self, NavLink};

/// Top bar: logo and title, search, nav links and social icons.
#[component]
pub fn NavBar() -> impl IntoView {
    let logo = CONFIG.logo.as_deref();

    view! {
        <header class="nav-bar">
            <a class="nav-brand" href="/">
                {logo.map(|src| view! { <img class="nav-logo" src=src alt="" /> })}
                {CONFIG.nav_title().map(|title| view! { <span class="nav-title">{title}</span> })}
            </a>
            <SearchBox />
            <nav class="nav-links" aria-label="Main">
                {CONFIG.nav.iter().map(|link| view! { <NavBarLink link=link /> }).collect_view()}
            </nav>
            <div class="social-links">
                {CONFIG.social_links.iter().map(|social| view! { <Social social=social /> }).collect_view()}
            </div>
        </header>
    }
}

#[component]
fn NavBarLink(link: &'static NavLink) -> impl IntoView {
    if link.is_external() {
        return view! { <ExternalLink href=link.link.as_str() label=link.text.as_str() class="nav-link" /> }
            .into_any();
    }

    let pathname = use_location().pathname;
    view! {
        <a
            class="nav-link"
            class:active=move || nav::is_within(&link.link, &pathname.get())
            href=link.link.as_str()
        >
            {link.text.as_str()}
        </a>
    }
    .into_any()
}

#[component]
fn Social(social: &'static SocialLink) -> impl IntoView {
    view! {
        <a
            class=format!("social-link social-{}", social.icon)
            href=social.link.as_str()
            target="_blank"
            rel="noopener noreferrer"
            aria-label=social.icon.as_str()
        >
            {social_icon(&social.icon)}
        </a>
    }
}

fn social_icon(icon: &str) -> AnyView {
    match icon {
        "github" => view! {
            <svg viewBox="0 0 24 24" width="20" height="20" aria-hidden="true">
                <path
                    fill="currentColor"
                    d="M12 .3a12 12 0 0 0-3.8 23.4c.6.1.8-.3.8-.6v-2c-3.3.7-4-1.6-4-1.6-.6-1.4-1.4-1.8-1.4-1.8-1-.7.1-.7.1-.7 1.2 0 1.9 1.2 1.9 1.2 1 1.8 2.8 1.3 3.5 1 0-.8.4-1.3.7-1.6-2.7-.3-5.5-1.3-5.5-6 0-1.2.5-2.3 1.3-3.1-.2-.4-.6-1.6 0-3.2 0 0 1-.3 3.4 1.2a11.5 11.5 0 0 1 6 0c2.3-1.5 3.3-1.2 3.3-1.2.6 1.6.2 2.8 0 3.2.9.8 1.3 1.9 1.3 3.2 0 4.6-2.8 5.6-5.5 5.9.5.4.9 1 .9 2.2v3.3c0 .3.1.7.8.6A12 12 0 0 0 12 .3"
                ></path>
            </svg>
        }
        .into_any(),
        other => view! { <span class="social-text">{other.to_string()}</span> }.into_any(),
    }
}

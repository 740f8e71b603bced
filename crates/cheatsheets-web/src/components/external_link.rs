use leptos::prelude::*;

/// Link that opens in a new tab, marked with an arrow.
#[component]
pub fn ExternalLink(
    #[prop(into)] href: String,
    #[prop(into)] label: String,
    #[prop(optional, into)] class: Option<String>,
) -> impl IntoView {
    view! {
        <a href=href target="_blank" rel="noopener noreferrer" class=class.unwrap_or_default()>
            {label}
            <span class="external-mark" aria-hidden="true">" \u{2197}"</span>
        </a>
    }
}

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::config::CONFIG;
use crate::content::{MIN_QUERY_CHARS, SearchHit, search_pages};

fn searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

/// Search field in the nav bar with a dropdown of ranked results.
///
/// Arrow keys move the selection, Enter opens it, Escape clears the query.
#[component]
pub fn SearchBox() -> impl IntoView {
    let labels = &CONFIG.search;
    let query = RwSignal::new(String::new());
    let selected = RwSignal::new(0usize);

    let results = LocalResource::new(move || {
        let query = query.get();
        async move {
            if !searchable(&query) {
                return Vec::new();
            }
            search_pages(query).await.unwrap_or_else(|err| {
                tracing::warn!(error = %err, "search request failed");
                Vec::new()
            })
        }
    });

    let clear = move || {
        query.set(String::new());
        selected.set(0);
    };

    let navigate = use_navigate();
    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        let hits = results.get().unwrap_or_default();
        match ev.key().as_str() {
            "ArrowDown" if !hits.is_empty() => {
                ev.prevent_default();
                selected.update(|i| *i = (*i + 1) % hits.len());
            }
            "ArrowUp" if !hits.is_empty() => {
                ev.prevent_default();
                selected.update(|i| *i = i.checked_sub(1).unwrap_or(hits.len() - 1));
            }
            "Enter" => {
                if let Some(hit) = hits.get(selected.get_untracked()) {
                    ev.prevent_default();
                    navigate(&hit.link, Default::default());
                    clear();
                }
            }
            "Escape" => clear(),
            _ => {}
        }
    };

    let dropdown = move || {
        if !query.with(|q| searchable(q)) {
            return None;
        }
        let hits = results.get()?;
        let body = if hits.is_empty() {
            view! {
                <p class="search-empty">
                    {labels.no_results_text.as_str()} " \u{201C}" {query.get_untracked()} "\u{201D}"
                </p>
            }
            .into_any()
        } else {
            view! {
                <ul class="search-results" role="listbox">
                    {hits
                        .into_iter()
                        .enumerate()
                        .map(|(index, hit)| {
                            view! {
                                <SearchResult
                                    hit=hit
                                    active=Signal::derive(move || selected.get() == index)
                                    on_pick=clear
                                />
                            }
                        })
                        .collect_view()}
                </ul>
            }
            .into_any()
        };
        Some(view! {
            <div class="search-dropdown">
                {body}
                <div class="search-hints">
                    <span><kbd>"\u{21B5}"</kbd> " " {labels.select_text.as_str()}</span>
                    <span><kbd>"\u{2191}"</kbd> <kbd>"\u{2193}"</kbd> " " {labels.navigate_text.as_str()}</span>
                    <span><kbd>"esc"</kbd> " " {labels.close_text.as_str()}</span>
                </div>
            </div>
        })
    };

    view! {
        <div class="search-box" role="search">
            <input
                type="search"
                class="search-input"
                placeholder=labels.button_text.as_str()
                aria-label=labels.button_aria_label.as_str()
                prop:value=move || query.get()
                on:input=move |ev| {
                    query.set(event_target_value(&ev));
                    selected.set(0);
                }
                on:keydown=on_keydown
            />
            <Show when=move || query.with(|q| !q.is_empty())>
                <button
                    type="button"
                    class="search-reset"
                    title=labels.reset_button_title.as_str()
                    aria-label=labels.reset_button_title.as_str()
                    on:click=move |_| clear()
                >
                    "\u{00D7}"
                </button>
            </Show>
            {dropdown}
        </div>
    }
}

#[component]
fn SearchResult(hit: SearchHit, active: Signal<bool>, on_pick: impl Fn() + Copy + 'static) -> impl IntoView {
    let label = match &hit.heading {
        Some(heading) => format!("{} \u{203A} {heading}", hit.title),
        None => hit.title.clone(),
    };

    view! {
        <li class="search-result" class:selected=move || active.get() role="option">
            <a href=hit.link on:click=move |_| on_pick()>
                <span class="search-result-title">{label}</span>
                <span class="search-result-excerpt">{hit.excerpt}</span>
            </a>
        </li>
    }
}

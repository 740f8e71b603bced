use leptos::prelude::*;

use crate::content::Heading;

/// "On this page" list of the page's h2/h3 anchors.
#[component]
pub fn Outline(headings: Vec<Heading>) -> impl IntoView {
    if headings.is_empty() {
        return None;
    }

    Some(view! {
        <nav class="outline" aria-label="On this page">
            <p class="outline-title">"On this page"</p>
            <ul>
                {headings
                    .into_iter()
                    .map(|heading| {
                        view! {
                            <li class=format!("outline-item level-{}", heading.level)>
                                <a href=format!("#{}", heading.anchor)>{heading.text}</a>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </nav>
    })
}

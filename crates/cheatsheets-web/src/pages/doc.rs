use leptos::prelude::*;
use leptos_meta::{Meta, Title};
use leptos_router::hooks::use_location;

use super::NotFound;
use crate::components::{ContentReady, DocFooter, Outline};
use crate::content::{PageView, fetch_page};

/// Markdown page for the current route.
#[component]
pub fn DocPage() -> impl IntoView {
    let pathname = use_location().pathname;
    let page = Resource::new(move || pathname.get(), |path| fetch_page(path));

    if let Some(ready) = use_context::<ContentReady>() {
        Effect::new(move |_| {
            if page.with(|page| matches!(page, Some(Ok(Some(_))))) {
                ready.publish();
            }
        });
    }

    view! {
        <Suspense fallback=move || view! { <p class="doc-loading">"Loading\u{2026}"</p> }>
            {move || {
                page.get()
                    .map(|result| match result {
                        Ok(Some(page)) => view! { <DocContent page=page /> }.into_any(),
                        Ok(None) => view! { <NotFound /> }.into_any(),
                        Err(err) => {
                            tracing::error!(error = %err, "failed to fetch page");
                            view! {
                                <div class="doc-error">
                                    <h1>"Something went wrong"</h1>
                                    <p>"This page could not be loaded. Try again in a moment."</p>
                                </div>
                            }
                                .into_any()
                        }
                    })
            }}
        </Suspense>
    }
}

#[component]
fn DocContent(page: PageView) -> impl IntoView {
    let description = page.description.clone();

    view! {
        <Title text=page.title.clone() />
        {description.map(|content| view! { <Meta name="description" content=content /> })}
        <div class="doc-layout">
            <article class="vp-doc" inner_html=page.html.clone()></article>
            <Outline headings=page.headings.clone() />
        </div>
        <DocFooter page=page />
    }
}

use leptos::prelude::*;
use leptos_meta::{MetaTags, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::components::{ContentReady, NavBar, Sidebar, SiteFooter, use_copy_buttons};
use crate::config::CONFIG;
use crate::pages::{DocPage, NotFound};

/// Full HTML document rendered by the server around [`App`].
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang=CONFIG.lang.as_str() class=CONFIG.appearance.html_class()>
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <meta name="description" content=CONFIG.description.as_str() />
                {CONFIG
                    .head
                    .iter()
                    .map(|link| view! { <link rel=link.rel.as_str() href=link.href.as_str() type=link.kind.as_deref() /> })
                    .collect_view()}
                <link rel="stylesheet" href="/pkg/cheatsheets-web.css" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    let ready = ContentReady::provide();
    use_copy_buttons(ready);

    let site_title = CONFIG.title.as_str();

    view! {
        <Title formatter=move |page: String| {
            if page.is_empty() || page == site_title { site_title.to_string() } else { format!("{page} | {site_title}") }
        } />
        <Router>
            <NavBar />
            <div class="layout">
                <Sidebar />
                <main class="content">
                    <Routes fallback=|| view! { <NotFound /> }>
                        <Route path=path!("/") view=DocPage />
                        <Route path=path!("/*any") view=DocPage />
                    </Routes>
                </main>
            </div>
            <SiteFooter />
        </Router>
    }
}

use leptos::prelude::*;
use leptos_meta::Title;

#[component]
pub fn NotFound() -> impl IntoView {
    #[cfg(feature = "ssr")]
    if let Some(response) = use_context::<leptos_axum::ResponseOptions>() {
        response.set_status(axum::http::StatusCode::NOT_FOUND);
    }

    view! {
        <Title text="404" />
        <div class="not-found">
            <p class="code">"404"</p>
            <h1>"Page not found"</h1>
            <p>"But if you don't change your direction, and if you keep looking, you may end up where you are heading."</p>
            <a class="home-link" href="/">"Take me home"</a>
        </div>
    }
}

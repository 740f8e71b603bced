use leptos::prelude::*;

use crate::config::CONFIG;

#[component]
pub fn SiteFooter() -> impl IntoView {
    CONFIG.footer.as_ref().map(|footer| {
        // Footer text comes from the site config and may carry inline HTML.
        view! {
            <footer class="site-footer">
                {footer.message.as_deref().map(|message| view! { <p class="message" inner_html=message></p> })}
                {footer.copyright.as_deref().map(|copyright| view! { <p class="copyright" inner_html=copyright></p> })}
            </footer>
        }
    })
}

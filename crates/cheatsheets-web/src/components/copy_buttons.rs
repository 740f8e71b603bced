use leptos::prelude::*;

/// Bumped each time a page's content has been rendered into the document.
///
/// Provided once at the app root; pages publish, the copy-button pass
/// subscribes.
#[derive(Debug, Clone, Copy)]
pub struct ContentReady(RwSignal<u64>);

impl ContentReady {
    pub fn provide() -> Self {
        let ready = Self(RwSignal::new(0));
        provide_context(ready);
        ready
    }

    pub fn publish(self) {
        self.0.update(|generation| *generation += 1);
    }

    /// Tracked read of the current generation.
    pub fn generation(self) -> u64 {
        self.0.get()
    }
}

/// Attach copy buttons to code blocks whenever new content is published.
///
/// Effects only run in the browser, so the server render stays untouched.
pub fn use_copy_buttons(ready: ContentReady) {
    Effect::new(move |_| {
        let generation = ready.generation();
        tracing::trace!(generation, "content ready, scheduling copy buttons");
        #[cfg(feature = "hydrate")]
        crate::enhancer::web::enhance_next_frame();
    });
}

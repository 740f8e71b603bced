//! Browser side of the copy-button enhancer (hydrate only).

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Event, HtmlElement, Node};

use super::{
    BUTTON_CLASS, BUTTON_LABEL, BlockSelector, COPIED_CLASS, Clipboard, ClipboardError, CodeBlockHost, ControlId,
    ControlState, CopyEnhancer, HostError, RevertScheduler, TracingDiagnostics, WRAPPER_CLASS,
};
use crate::config::CONFIG;

const COPY_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><rect x="9" y="9" width="13" height="13" rx="2" ry="2"></rect><path d="M5 15H4a2 2 0 0 1-2-2V4a2 2 0 0 1 2-2h9a2 2 0 0 1 2 2v1"></path></svg>"#;
const COPIED_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><polyline points="20 6 9 17 4 12"></polyline></svg>"#;

type WebEnhancer = CopyEnhancer<WebHost, WebClipboard, WebScheduler, TracingDiagnostics>;

thread_local! {
    static ENHANCER: Rc<RefCell<WebEnhancer>> = Rc::new_cyclic(|weak| {
        RefCell::new(CopyEnhancer::new(
            WebHost::new(weak.clone()),
            WebClipboard,
            WebScheduler { enhancer: weak.clone() },
            TracingDiagnostics,
            CONFIG.copy_button.settings(),
        ))
    });
}

/// Run an enhancement pass over the live document now.
pub fn enhance_page() -> usize {
    ENHANCER.with(|enhancer| enhancer.borrow_mut().enhance())
}

/// Run an enhancement pass on the next animation frame, once freshly mounted
/// page content has been laid out.
pub fn enhance_next_frame() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(|| {
        let attached = enhance_page();
        tracing::trace!(attached, "copy button pass finished");
    });
    if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
        tracing::warn!(error = %describe(&err), "could not schedule copy button pass");
    }
}

fn describe(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

fn dom_error(value: JsValue) -> HostError {
    HostError::Dom(describe(&value))
}

struct WebControl {
    button: Element,
    on_click: Closure<dyn FnMut(Event)>,
}

pub struct WebHost {
    enhancer: Weak<RefCell<WebEnhancer>>,
    controls: HashMap<ControlId, WebControl>,
}

impl WebHost {
    fn new(enhancer: Weak<RefCell<WebEnhancer>>) -> Self {
        Self {
            enhancer,
            controls: HashMap::new(),
        }
    }

    fn click_handler(&self, id: ControlId) -> Closure<dyn FnMut(Event)> {
        let enhancer = self.enhancer.clone();
        Closure::new(move |_event: Event| {
            let enhancer = enhancer.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Some(enhancer) = enhancer.upgrade() {
                    WebEnhancer::activate(&enhancer, id).await;
                }
            });
        })
    }
}

impl CodeBlockHost for WebHost {
    type Block = Element;

    fn find_blocks(&self, selector: &BlockSelector) -> Vec<Element> {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return Vec::new();
        };
        let Ok(list) = document.query_selector_all(&selector.css()) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn is_enhanced(&self, block: &Element) -> bool {
        block.parent_element().is_some_and(|parent| {
            parent.class_list().contains(WRAPPER_CLASS)
                && parent
                    .query_selector(&format!(":scope > .{BUTTON_CLASS}"))
                    .ok()
                    .flatten()
                    .is_some()
        })
    }

    fn is_attached(&self, block: &Element) -> bool {
        block.is_connected()
    }

    fn block_text(&self, block: &Element) -> Option<String> {
        let code = block.query_selector("code").ok().flatten()?;
        code.dyn_into::<HtmlElement>().ok().map(|code| code.inner_text())
    }

    fn attach_control(&mut self, block: &Element, id: ControlId) -> Result<(), HostError> {
        let parent = block.parent_node().ok_or(HostError::Detached)?;
        let document = block.owner_document().ok_or(HostError::Detached)?;

        // Build and wire the control off-tree; the document changes last.
        let button = document.create_element("button").map_err(dom_error)?;
        button.set_class_name(BUTTON_CLASS);
        button.set_attribute("type", "button").map_err(dom_error)?;
        button.set_attribute("aria-label", BUTTON_LABEL).map_err(dom_error)?;
        button.set_inner_html(COPY_ICON);

        let on_click = self.click_handler(id);
        button
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .map_err(dom_error)?;

        let wrapper = document.create_element("div").map_err(dom_error)?;
        wrapper.set_class_name(WRAPPER_CLASS);
        wrapper.append_child(&button).map_err(dom_error)?;

        let block_node: &Node = block;
        parent.insert_before(&wrapper, Some(block_node)).map_err(dom_error)?;
        let button_node: &Node = &button;
        if let Err(err) = wrapper.insert_before(block_node, Some(button_node)) {
            wrapper.remove();
            return Err(dom_error(err));
        }

        self.controls.insert(id, WebControl { button, on_click });
        Ok(())
    }

    fn show_state(&mut self, id: ControlId, state: ControlState) {
        let Some(control) = self.controls.get(&id) else {
            return;
        };
        let copied = state == ControlState::Copied;
        if let Err(err) = control.button.class_list().toggle_with_force(COPIED_CLASS, copied) {
            tracing::debug!(control = %id, error = %describe(&err), "could not toggle copied class");
        }
        control.button.set_inner_html(if copied { COPIED_ICON } else { COPY_ICON });
    }

    fn release(&mut self, id: ControlId) {
        if let Some(control) = self.controls.remove(&id) {
            if let Err(err) = control
                .button
                .remove_event_listener_with_callback("click", control.on_click.as_ref().unchecked_ref())
            {
                tracing::debug!(control = %id, error = %describe(&err), "could not remove click listener");
            }
        }
    }
}

/// `navigator.clipboard`, when the browsing context exposes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebClipboard;

fn system_clipboard() -> Option<web_sys::Clipboard> {
    let navigator = web_sys::window()?.navigator();
    // Missing outside secure contexts, where calling into it would throw.
    let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard")).ok()?;
    clipboard.dyn_into::<web_sys::Clipboard>().ok()
}

impl Clipboard for WebClipboard {
    fn write_text(&self, text: &str) -> impl Future<Output = Result<(), ClipboardError>> {
        let pending = system_clipboard().map(|clipboard| JsFuture::from(clipboard.write_text(text)));
        async move {
            let pending = pending.ok_or(ClipboardError::Unavailable)?;
            pending
                .await
                .map(|_| ())
                .map_err(|err| ClipboardError::Rejected(describe(&err)))
        }
    }
}

pub struct WebScheduler {
    enhancer: Weak<RefCell<WebEnhancer>>,
}

impl RevertScheduler for WebScheduler {
    type Handle = Timeout;

    fn schedule(&self, id: ControlId, after: Duration) -> Timeout {
        let enhancer = self.enhancer.clone();
        let millis = u32::try_from(after.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            // Reverting drops this timer's own handle; do it outside the callback.
            wasm_bindgen_futures::spawn_local(async move {
                if let Some(enhancer) = enhancer.upgrade() {
                    enhancer.borrow_mut().revert(id);
                }
            });
        })
    }
}

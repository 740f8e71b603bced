//! Copy-to-clipboard buttons for rendered code blocks.
//!
//! The enhancer never touches the browser directly: [`CodeBlockHost`] is the
//! document, [`Clipboard`] the system clipboard and [`RevertScheduler`] the
//! one-shot timer that returns a button to its resting look. The hydrated client
//! wires these to `web-sys` (see `web`), tests drive them with simulated
//! stand-ins.
//!
//! Each attached button gets a record in an arena keyed by [`ControlId`]. The
//! record owns the pending revert timer, so replacing it on a second successful
//! copy cancels the first one.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

#[cfg(test)]
mod sim;
#[cfg(feature = "hydrate")]
pub mod web;

/// Class on the container inserted around each enhanced code block.
pub const WRAPPER_CLASS: &str = "code-block-wrapper";
/// Class on the copy button itself.
pub const BUTTON_CLASS: &str = "copy-button";
/// Extra class carried by the button while it shows the "copied" check mark.
pub const COPIED_CLASS: &str = "copied";
pub const BUTTON_LABEL: &str = "Copy to clipboard";

/// Default time a button stays in the copied state.
pub const DEFAULT_REVERT_AFTER: Duration = Duration::from_millis(2000);

/// Identity of one attached copy button. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ControlId(u64);

impl ControlId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Visual state of a copy button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Default,
    Copied,
}

/// Which elements count as fenced code blocks.
///
/// Matches `div` elements whose class attribute contains `class_contains`,
/// optionally only below an element matching `within`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSelector {
    pub class_contains: String,
    pub within: Option<String>,
}

impl BlockSelector {
    pub fn new(class_contains: impl Into<String>) -> Self {
        Self {
            class_contains: class_contains.into(),
            within: None,
        }
    }

    pub fn within(mut self, ancestor: impl Into<String>) -> Self {
        self.within = Some(ancestor.into());
        self
    }

    /// CSS selector for `querySelectorAll`.
    pub fn css(&self) -> String {
        let blocks = format!("div[class*=\"{}\"]", self.class_contains);
        match &self.within {
            Some(ancestor) => format!("{ancestor} {blocks}"),
            None => blocks,
        }
    }
}

impl Default for BlockSelector {
    fn default() -> Self {
        Self::new("language-")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancerSettings {
    pub selector: BlockSelector,
    pub revert_after: Duration,
}

impl Default for EnhancerSettings {
    fn default() -> Self {
        Self {
            selector: BlockSelector::default(),
            revert_after: DEFAULT_REVERT_AFTER,
        }
    }
}

/// A clipboard write that did not go through. Always recoverable: the user can
/// click again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard in this browsing context (insecure origin, no window).
    #[error("clipboard is not available in this browsing context")]
    Unavailable,

    /// The browser refused the write, usually a permission denial.
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
}

/// Failure to wrap a code block with its button.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("code block is not attached to a parent element")]
    Detached,

    #[error("failed to build copy control: {0}")]
    Dom(String),
}

/// The rendered document, as far as the enhancer needs to see it.
pub trait CodeBlockHost {
    type Block: Clone;

    /// All elements currently matching `selector`, in document order.
    fn find_blocks(&self, selector: &BlockSelector) -> Vec<Self::Block>;

    /// Whether `block` already sits inside a wrapper holding a copy button.
    fn is_enhanced(&self, block: &Self::Block) -> bool;

    /// Whether `block` is still part of the live document.
    fn is_attached(&self, block: &Self::Block) -> bool;

    /// Rendered text of the block's code, `None` when it cannot be read.
    fn block_text(&self, block: &Self::Block) -> Option<String>;

    /// Insert a wrapper in place of `block`, holding `block` and a new button.
    fn attach_control(&mut self, block: &Self::Block, id: ControlId) -> Result<(), HostError>;

    fn show_state(&mut self, id: ControlId, state: ControlState);

    /// Forget the button for `id` and drop its listeners.
    fn release(&mut self, id: ControlId);
}

pub trait Clipboard {
    fn write_text(&self, text: &str) -> impl Future<Output = Result<(), ClipboardError>>;
}

/// One-shot timers that hand the control back to [`CopyEnhancer::revert`].
///
/// Dropping a handle must cancel its timer.
pub trait RevertScheduler {
    type Handle;

    fn schedule(&self, id: ControlId, after: Duration) -> Self::Handle;
}

/// Where soft failures are reported.
pub trait Diagnostics {
    fn copy_failed(&self, id: ControlId, error: &ClipboardError);
    fn attach_failed(&self, error: &HostError);
}

/// Reports through `tracing`, which ends up on the browser console.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn copy_failed(&self, id: ControlId, error: &ClipboardError) {
        tracing::error!(control = %id, %error, "failed to copy code block");
    }

    fn attach_failed(&self, error: &HostError) {
        tracing::warn!(%error, "skipping code block");
    }
}

struct ControlRecord<B, T> {
    block: B,
    state: ControlState,
    revert: Option<T>,
}

pub struct CopyEnhancer<H, C, S, D>
where
    H: CodeBlockHost,
    S: RevertScheduler,
{
    host: H,
    clipboard: C,
    scheduler: S,
    diagnostics: D,
    settings: EnhancerSettings,
    controls: BTreeMap<ControlId, ControlRecord<H::Block, S::Handle>>,
    next_id: u64,
}

impl<H, C, S, D> CopyEnhancer<H, C, S, D>
where
    H: CodeBlockHost,
    C: Clipboard + Clone,
    S: RevertScheduler,
    D: Diagnostics,
{
    pub fn new(host: H, clipboard: C, scheduler: S, diagnostics: D, settings: EnhancerSettings) -> Self {
        Self {
            host,
            clipboard,
            scheduler,
            diagnostics,
            settings,
            controls: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// One enhancement pass over the current document.
    ///
    /// Drops records for blocks that left the document, then attaches a button
    /// to every matching block that does not have one yet. Returns how many
    /// buttons this pass attached; zero when the content has not rendered.
    pub fn enhance(&mut self) -> usize {
        self.prune_detached();

        let mut attached = 0;
        for block in self.host.find_blocks(&self.settings.selector) {
            if self.host.is_enhanced(&block) {
                continue;
            }

            let id = ControlId(self.next_id);
            self.next_id += 1;

            match self.host.attach_control(&block, id) {
                Ok(()) => {
                    self.controls.insert(
                        id,
                        ControlRecord {
                            block,
                            state: ControlState::Default,
                            revert: None,
                        },
                    );
                    attached += 1;
                }
                Err(error) => self.diagnostics.attach_failed(&error),
            }
        }

        if attached > 0 {
            tracing::debug!(attached, live = self.controls.len(), "attached copy buttons");
        }
        attached
    }

    fn prune_detached(&mut self) {
        let host = &self.host;
        let detached: Vec<ControlId> = self
            .controls
            .iter()
            .filter(|(_, record)| !host.is_attached(&record.block))
            .map(|(id, _)| *id)
            .collect();

        for id in detached {
            self.controls.remove(&id);
            self.host.release(id);
        }
    }

    /// Text a click on `id` would copy. Unreadable blocks copy an empty string.
    pub fn copy_text(&self, id: ControlId) -> Option<String> {
        let record = self.controls.get(&id)?;
        Some(self.host.block_text(&record.block).unwrap_or_default())
    }

    /// Apply the outcome of a clipboard write for `id`.
    ///
    /// Success shows the copied state and (re)arms the revert timer. Failure is
    /// reported and leaves the button as it was. Returns the resulting state, or
    /// `None` when the control no longer exists.
    pub fn finish_copy(&mut self, id: ControlId, result: Result<(), ClipboardError>) -> Option<ControlState> {
        if let Err(error) = &result {
            self.diagnostics.copy_failed(id, error);
            return self.state(id);
        }

        let record = self.controls.get_mut(&id)?;
        record.state = ControlState::Copied;
        // Replacing the handle drops the previous one, cancelling its timer.
        record.revert = Some(self.scheduler.schedule(id, self.settings.revert_after));
        self.host.show_state(id, ControlState::Copied);
        Some(record.state)
    }

    /// Timer expiry: back to the default look.
    pub fn revert(&mut self, id: ControlId) {
        let Some(record) = self.controls.get_mut(&id) else {
            return;
        };
        record.revert = None;
        if record.state != ControlState::Default {
            record.state = ControlState::Default;
            self.host.show_state(id, ControlState::Default);
        }
    }

    pub fn state(&self, id: ControlId) -> Option<ControlState> {
        self.controls.get(&id).map(|record| record.state)
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    pub fn control_ids(&self) -> impl Iterator<Item = ControlId> + '_ {
        self.controls.keys().copied()
    }

    pub fn settings(&self) -> &EnhancerSettings {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Handle a click on `id`: copy the block's text and update the button.
    ///
    /// No borrow of `this` is held while the clipboard write is pending, so
    /// other buttons and enhancement passes keep working in the meantime.
    pub async fn activate(this: &RefCell<Self>, id: ControlId) -> Option<ControlState> {
        let (text, clipboard) = {
            let enhancer = this.borrow();
            (enhancer.copy_text(id)?, enhancer.clipboard.clone())
        };

        let result = clipboard.write_text(&text).await;
        this.borrow_mut().finish_copy(id, result)
    }
}


#[cfg(test)]
impl<H, C, S, D> CopyEnhancer<H, C, S, D>
where
    H: CodeBlockHost,
    S: RevertScheduler,
{
    fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

//! In-memory document, clipboard and clock for exercising the enhancer.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use super::{
    BUTTON_CLASS, BlockSelector, COPIED_CLASS, Clipboard, ClipboardError, CodeBlockHost, ControlId, ControlState,
    Diagnostics, HostError, RevertScheduler, WRAPPER_CLASS,
};

pub type NodeId = usize;

struct Node {
    tag: &'static str,
    classes: Vec<String>,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// A tiny element tree with just enough structure for wrapping code blocks.
pub struct SimDom {
    nodes: Vec<Node>,
    buttons: HashMap<ControlId, NodeId>,
    released: HashSet<ControlId>,
    failing: HashSet<NodeId>,
}

impl SimDom {
    pub fn new() -> Self {
        let body = Node {
            tag: "body",
            classes: Vec::new(),
            text: None,
            children: Vec::new(),
            parent: None,
        };
        Self {
            nodes: vec![body],
            buttons: HashMap::new(),
            released: HashSet::new(),
            failing: HashSet::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    fn push(&mut self, parent: NodeId, tag: &'static str, classes: &[&str], text: Option<&str>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            tag,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            text: text.map(str::to_string),
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn element(&mut self, parent: NodeId, tag: &'static str, classes: &[&str]) -> NodeId {
        self.push(parent, tag, classes, None)
    }

    pub fn paragraph(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(parent, "p", &[], Some(text))
    }

    /// `<div class="language-{lang}"><pre><code>{code}</code></pre></div>`;
    /// without `code` the `<pre>` stays empty.
    pub fn code_block(&mut self, parent: NodeId, lang: &str, code: Option<&str>) -> NodeId {
        let class = format!("language-{lang}");
        let block = self.push(parent, "div", &[class.as_str()], None);
        let pre = self.push(block, "pre", &[], None);
        if let Some(code) = code {
            self.push(pre, "code", &[], Some(code));
        }
        block
    }

    pub fn set_code_text(&mut self, block: NodeId, text: &str) {
        if let Some(code) = self.find_tag(block, "code") {
            self.nodes[code].text = Some(text.to_string());
        }
    }

    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|child| *child != node);
        }
    }

    pub fn fail_attach(&mut self, block: NodeId) {
        self.failing.insert(block);
    }

    pub fn allow_attach(&mut self, block: NodeId) {
        self.failing.remove(&block);
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node].children
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node].classes.iter().any(|c| c == class)
    }

    /// Elements carrying `class` that are still reachable from the root.
    pub fn count_class(&self, class: &str) -> usize {
        self.descendants(self.root()).into_iter().filter(|n| self.has_class(*n, class)).count()
    }

    pub fn button_copied(&self, id: ControlId) -> bool {
        self.buttons.get(&id).is_some_and(|button| self.has_class(*button, COPIED_CLASS))
    }

    pub fn released(&self, id: ControlId) -> bool {
        self.released.contains(&id)
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next].children.iter().rev().copied());
        }
        out
    }

    fn find_tag(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(node).into_iter().find(|n| self.nodes[*n].tag == tag)
    }

    fn has_ancestor_with_class(&self, node: NodeId, class: &str) -> bool {
        let mut current = self.nodes[node].parent;
        while let Some(parent) = current {
            if self.has_class(parent, class) {
                return true;
            }
            current = self.nodes[parent].parent;
        }
        false
    }
}

impl CodeBlockHost for SimDom {
    type Block = NodeId;

    fn find_blocks(&self, selector: &BlockSelector) -> Vec<NodeId> {
        let within = selector.within.as_deref().map(|w| w.trim_start_matches('.'));
        self.descendants(self.root())
            .into_iter()
            .filter(|n| {
                let node = &self.nodes[*n];
                node.tag == "div" && node.classes.iter().any(|c| c.contains(&selector.class_contains))
            })
            .filter(|n| within.is_none_or(|class| self.has_ancestor_with_class(*n, class)))
            .collect()
    }

    fn is_enhanced(&self, block: &NodeId) -> bool {
        let Some(parent) = self.nodes[*block].parent else {
            return false;
        };
        self.has_class(parent, WRAPPER_CLASS)
            && self.nodes[parent].children.iter().any(|child| self.has_class(*child, BUTTON_CLASS))
    }

    fn is_attached(&self, block: &NodeId) -> bool {
        let mut current = *block;
        while let Some(parent) = self.nodes[current].parent {
            current = parent;
        }
        current == self.root()
    }

    fn block_text(&self, block: &NodeId) -> Option<String> {
        let code = self.find_tag(*block, "code")?;
        self.nodes[code].text.clone()
    }

    fn attach_control(&mut self, block: &NodeId, id: ControlId) -> Result<(), HostError> {
        let parent = self.nodes[*block].parent.ok_or(HostError::Detached)?;
        let position = self.nodes[parent]
            .children
            .iter()
            .position(|child| child == block)
            .ok_or(HostError::Detached)?;

        // Wrapper and button are built off-tree; a failure leaves them orphaned.
        let wrapper = self.nodes.len();
        self.nodes.push(Node {
            tag: "div",
            classes: vec![WRAPPER_CLASS.to_string()],
            text: None,
            children: Vec::new(),
            parent: None,
        });
        let button = self.push(wrapper, "button", &[BUTTON_CLASS], None);
        if self.failing.contains(block) {
            return Err(HostError::Dom("simulated failure".to_string()));
        }

        self.nodes[wrapper].children.insert(0, *block);
        self.nodes[wrapper].parent = Some(parent);
        self.nodes[parent].children[position] = wrapper;
        self.nodes[*block].parent = Some(wrapper);
        self.buttons.insert(id, button);
        Ok(())
    }

    fn show_state(&mut self, id: ControlId, state: ControlState) {
        let Some(&button) = self.buttons.get(&id) else {
            return;
        };
        let classes = &mut self.nodes[button].classes;
        classes.retain(|c| c != COPIED_CLASS);
        if state == ControlState::Copied {
            classes.push(COPIED_CLASS.to_string());
        }
    }

    fn release(&mut self, id: ControlId) {
        self.buttons.remove(&id);
        self.released.insert(id);
    }
}

#[derive(Default)]
struct ClipboardState {
    writes: Vec<String>,
    reject: Option<String>,
}

/// Records every write; succeeds until told to reject.
#[derive(Clone, Default)]
pub struct SimClipboard(Rc<RefCell<ClipboardState>>);

impl SimClipboard {
    pub fn reject_with(&self, message: &str) {
        self.0.borrow_mut().reject = Some(message.to_string());
    }

    pub fn writes(&self) -> Vec<String> {
        self.0.borrow().writes.clone()
    }
}

impl Clipboard for SimClipboard {
    fn write_text(&self, text: &str) -> impl Future<Output = Result<(), ClipboardError>> {
        let mut state = self.0.borrow_mut();
        state.writes.push(text.to_string());
        let result = match &state.reject {
            Some(message) => Err(ClipboardError::Rejected(message.clone())),
            None => Ok(()),
        };
        futures::future::ready(result)
    }
}

struct PendingRevert {
    id: ControlId,
    due: u64,
    cancelled: Rc<Cell<bool>>,
}

#[derive(Default)]
struct ClockState {
    now: u64,
    pending: Vec<PendingRevert>,
}

/// Manual clock in milliseconds.
#[derive(Clone, Default)]
pub struct SimClock(Rc<RefCell<ClockState>>);

/// Cancels its revert when dropped.
pub struct SimTimer(Rc<Cell<bool>>);

impl Drop for SimTimer {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

impl SimClock {
    /// Move time forward and return the controls whose timers came due, in
    /// deadline order.
    pub fn advance(&self, millis: u64) -> Vec<ControlId> {
        let mut state = self.0.borrow_mut();
        state.now += millis;
        let now = state.now;

        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut state.pending)
            .into_iter()
            .filter(|pending| !pending.cancelled.get())
            .partition(|pending| pending.due <= now);
        state.pending = rest;

        due.sort_by_key(|pending| pending.due);
        due.into_iter().map(|pending| pending.id).collect()
    }
}

impl RevertScheduler for SimClock {
    type Handle = SimTimer;

    fn schedule(&self, id: ControlId, after: Duration) -> SimTimer {
        let mut state = self.0.borrow_mut();
        let cancelled = Rc::new(Cell::new(false));
        let due = state.now + u64::try_from(after.as_millis()).unwrap_or(u64::MAX);
        state.pending.push(PendingRevert {
            id,
            due,
            cancelled: cancelled.clone(),
        });
        SimTimer(cancelled)
    }
}

#[derive(Clone, Default)]
pub struct RecordingDiagnostics(Rc<RefCell<Vec<String>>>);

impl RecordingDiagnostics {
    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn copy_failed(&self, id: ControlId, error: &ClipboardError) {
        self.0.borrow_mut().push(format!("copy {id} failed: {error}"));
    }

    fn attach_failed(&self, error: &HostError) {
        self.0.borrow_mut().push(format!("attach failed: {error}"));
    }
}

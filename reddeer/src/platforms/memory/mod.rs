//! In-process widget toolkit with its own UI thread.
//!
//! The display runs a single event-loop thread (`reddeer-ui`) draining a job
//! queue, and keeps a mutable widget tree that may only be touched from that
//! thread. It backs the test suite and headless runs; the rest of the crate
//! only sees it through [`DisplayEngine`] and [`WidgetImpl`](crate::WidgetImpl).

mod builder;
mod node;

pub use builder::{ClickListener, WidgetSpec};
pub use node::MemoryWidget;

use crate::errors::{RedDeerError, RedDeerResult};
use crate::platforms::{DisplayEngine, UiJob};
use crate::widget::{Widget, WidgetKind};
use node::{Node, NodeState};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub(crate) struct DisplayShared {
    pub(crate) ui_thread: ThreadId,
    sender: Mutex<Option<mpsc::UnboundedSender<UiJob>>>,
    disposed: AtomicBool,
    shells: Mutex<Vec<Arc<Node>>>,
    active_shell: Mutex<Weak<Node>>,
    focus: Mutex<Option<usize>>,
    next_id: AtomicUsize,
    event_loop: Mutex<Option<JoinHandle<()>>>,
}

impl DisplayShared {
    pub(crate) fn lock_focus(&self) -> MutexGuard<'_, Option<usize>> {
        self.focus.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_shells(&self) -> MutexGuard<'_, Vec<Arc<Node>>> {
        self.shells.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_active(&self) -> MutexGuard<'_, Weak<Node>> {
        self.active_shell
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to a running in-memory display. Cheap to clone; the event loop
/// stops when [`MemoryDisplay::dispose`] is called or the last handle drops.
#[derive(Clone)]
pub struct MemoryDisplay {
    shared: Arc<DisplayShared>,
}

impl MemoryDisplay {
    /// Spawns the UI thread and returns a handle to its display.
    pub fn start() -> RedDeerResult<Self> {
        let (tx, rx) = mpsc::unbounded_channel::<UiJob>();
        let handle = thread::Builder::new()
            .name("reddeer-ui".to_string())
            .spawn(move || run_event_loop(rx))?;
        let shared = Arc::new(DisplayShared {
            ui_thread: handle.thread().id(),
            sender: Mutex::new(Some(tx)),
            disposed: AtomicBool::new(false),
            shells: Mutex::new(Vec::new()),
            active_shell: Mutex::new(Weak::new()),
            focus: Mutex::new(None),
            next_id: AtomicUsize::new(1),
            event_loop: Mutex::new(Some(handle)),
        });
        info!("In-memory display started");
        Ok(Self { shared })
    }

    pub(crate) fn from_shared(shared: Arc<DisplayShared>) -> Self {
        Self { shared }
    }

    fn ensure_ui_thread(&self, operation: &str) -> RedDeerResult<()> {
        if self.is_disposed() {
            return Err(RedDeerError::DisplayUnavailable(
                "display is disposed".to_string(),
            ));
        }
        if !self.is_ui_thread() {
            return Err(RedDeerError::InvalidThreadAccess(format!(
                "{operation} must run on the UI thread"
            )));
        }
        Ok(())
    }

    fn build(&self, spec: WidgetSpec, parent: Weak<Node>) -> Arc<Node> {
        let id = self.shared.next_id.fetch_add(1, Ordering::SeqCst);
        let mut text = spec.text;
        if spec.kind == WidgetKind::Combo {
            if let Some(item) = spec.selection.first().and_then(|i| spec.items.get(*i)) {
                text = item.clone();
            }
        }
        let state = NodeState {
            text,
            items: spec.items,
            selection: spec.selection,
            tooltip: spec.tooltip,
            image: spec.image,
            enabled: spec.enabled,
            selected: spec.selected,
            on_click: spec.on_click,
            parent,
            children: Vec::new(),
        };
        let node = Arc::new(Node::new(
            id,
            spec.kind,
            spec.style,
            state,
            Arc::downgrade(&self.shared),
        ));
        let children = spec
            .children
            .into_iter()
            .map(|child| self.build(child, Arc::downgrade(&node)))
            .collect();
        node.lock().children = children;
        node
    }

    /// Creates a shell from `spec`, opens it and makes it the active shell.
    /// UI thread only.
    pub fn open_shell(&self, spec: WidgetSpec) -> RedDeerResult<Widget> {
        self.ensure_ui_thread("open_shell")?;
        if spec.kind != WidgetKind::Shell {
            return Err(RedDeerError::InvalidArgument(format!(
                "top-level widget must be a Shell, got {}",
                spec.kind
            )));
        }
        let node = self.build(spec, Weak::new());
        self.shared.lock_shells().push(node.clone());
        *self.shared.lock_active() = Arc::downgrade(&node);
        debug!(shell = node.id, "shell opened");
        Ok(Node::handle(&node))
    }

    /// Appends a new subtree under `parent`. UI thread only.
    pub fn add_child(&self, parent: &Widget, spec: WidgetSpec) -> RedDeerResult<Widget> {
        self.ensure_ui_thread("add_child")?;
        let parent_node = self.node_of(parent)?;
        let node = self.build(spec, Arc::downgrade(&parent_node));
        parent_node.lock().children.push(node.clone());
        Ok(Node::handle(&node))
    }

    /// Disposes `widget` and its subtree. Closing a shell goes through
    /// [`Widget::raw`]`.close()` instead. UI thread only.
    pub fn dispose_widget(&self, widget: &Widget) -> RedDeerResult<()> {
        self.ensure_ui_thread("dispose_widget")?;
        let node = self.node_of(widget)?;
        if node.kind == WidgetKind::Shell {
            self.close_shell(&node);
            return Ok(());
        }
        if let Some(parent) = node.lock().parent.upgrade() {
            parent.lock().children.retain(|child| child.id != node.id);
        }
        node.dispose();
        Ok(())
    }

    /// Makes `shell` the active shell. UI thread only.
    pub fn activate(&self, shell: &Widget) -> RedDeerResult<()> {
        self.ensure_ui_thread("activate")?;
        let node = self.node_of(shell)?;
        if node.kind != WidgetKind::Shell {
            return Err(RedDeerError::unsupported("activate", node.kind));
        }
        *self.shared.lock_active() = Arc::downgrade(&node);
        Ok(())
    }

    /// Runs `job` on the UI thread once `delay` has elapsed.
    pub fn timer_exec<F>(&self, delay: Duration, job: F)
    where
        F: FnOnce(&MemoryDisplay) + Send + 'static,
    {
        let display = self.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            let target = display.clone();
            if let Err(e) = display.schedule(Box::new(move || job(&target))) {
                warn!("Timer job dropped: {}", e);
            }
        });
    }

    /// Stops the event loop and disposes every widget. Jobs already queued
    /// still run, against the disposed tree; later submissions fail with
    /// `DisplayUnavailable`.
    pub fn dispose(&self) {
        if self.shared.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let sender = self
            .shared
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(sender);
        let shells = std::mem::take(&mut *self.shared.lock_shells());
        for shell in shells {
            shell.dispose();
        }
        let handle = self
            .shared
            .event_loop
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if !self.is_ui_thread() && handle.join().is_err() {
                error!("UI thread terminated abnormally");
            }
        }
        info!("In-memory display disposed");
    }

    pub(crate) fn close_shell(&self, node: &Arc<Node>) {
        let mut shells = self.shared.lock_shells();
        shells.retain(|shell| shell.id != node.id);
        node.dispose();
        let mut active = self.shared.lock_active();
        if active.upgrade().map_or(true, |a| a.id == node.id || a.is_disposed()) {
            *active = shells.last().map(Arc::downgrade).unwrap_or_default();
        }
        debug!(shell = node.id, "shell closed");
    }

    fn node_of(&self, widget: &Widget) -> RedDeerResult<Arc<Node>> {
        let memory = widget
            .raw()
            .as_any()
            .downcast_ref::<MemoryWidget>()
            .ok_or_else(|| {
                RedDeerError::InvalidArgument(format!(
                    "{} does not belong to the in-memory display",
                    widget.describe()
                ))
            })?;
        memory.live().map(|(node, _)| node)
    }
}

fn find_node(nodes: &[Arc<Node>], id: usize) -> Option<Arc<Node>> {
    for node in nodes {
        if node.id == id {
            return Some(node.clone());
        }
        let children = node.lock().children.clone();
        if let Some(found) = find_node(&children, id) {
            return Some(found);
        }
    }
    None
}

fn run_event_loop(mut rx: mpsc::UnboundedReceiver<UiJob>) {
    debug!("UI event loop running");
    while let Some(job) = rx.blocking_recv() {
        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!("UI job panicked; event loop continues");
        }
    }
    debug!("UI event loop stopped");
}

impl DisplayEngine for MemoryDisplay {
    fn schedule(&self, job: UiJob) -> RedDeerResult<()> {
        if self.is_disposed() {
            return Err(RedDeerError::DisplayUnavailable(
                "display is disposed".to_string(),
            ));
        }
        let sender = self
            .shared
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            Some(tx) => tx.send(job).map_err(|_| {
                RedDeerError::DisplayUnavailable("UI event loop is not running".to_string())
            }),
            None => Err(RedDeerError::DisplayUnavailable(
                "UI event loop is not running".to_string(),
            )),
        }
    }

    fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.shared.ui_thread
    }

    fn is_disposed(&self) -> bool {
        self.shared.disposed.load(Ordering::SeqCst)
    }

    fn shells(&self) -> RedDeerResult<Vec<Widget>> {
        self.ensure_ui_thread("shells")?;
        Ok(self
            .shared
            .lock_shells()
            .iter()
            .filter(|shell| !shell.is_disposed())
            .map(Node::handle)
            .collect())
    }

    fn active_shell(&self) -> RedDeerResult<Option<Widget>> {
        self.ensure_ui_thread("active_shell")?;
        let active = self.shared.lock_active().upgrade();
        Ok(active
            .filter(|shell| !shell.is_disposed())
            .map(|shell| Node::handle(&shell)))
    }

    fn focused_widget(&self) -> RedDeerResult<Option<Widget>> {
        self.ensure_ui_thread("focused_widget")?;
        let Some(id) = *self.shared.lock_focus() else {
            return Ok(None);
        };
        let shells = self.shared.lock_shells().clone();
        Ok(find_node(&shells, id)
            .filter(|node| !node.is_disposed())
            .map(|node| Node::handle(&node)))
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

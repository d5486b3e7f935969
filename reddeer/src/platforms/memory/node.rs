use super::builder::ClickListener;
use super::{DisplayShared, MemoryDisplay};
use crate::errors::{RedDeerError, RedDeerResult};
use crate::widget::{Style, Widget, WidgetImpl, WidgetKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::debug;

/// A widget living in the in-memory tree. Owned by its parent (or by the
/// display for shells); handles only hold weak references.
pub(crate) struct Node {
    pub(crate) id: usize,
    pub(crate) kind: WidgetKind,
    pub(crate) style: Style,
    disposed: AtomicBool,
    state: Mutex<NodeState>,
    display: Weak<DisplayShared>,
}

pub(crate) struct NodeState {
    pub(crate) text: String,
    pub(crate) items: Vec<String>,
    pub(crate) selection: Vec<usize>,
    pub(crate) tooltip: Option<String>,
    pub(crate) image: bool,
    pub(crate) enabled: bool,
    pub(crate) selected: bool,
    pub(crate) on_click: Option<ClickListener>,
    pub(crate) parent: Weak<Node>,
    pub(crate) children: Vec<Arc<Node>>,
}

impl Node {
    pub(crate) fn new(
        id: usize,
        kind: WidgetKind,
        style: Style,
        state: NodeState,
        display: Weak<DisplayShared>,
    ) -> Self {
        Self {
            id,
            kind,
            style,
            disposed: AtomicBool::new(false),
            state: Mutex::new(state),
            display,
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, NodeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Marks this node and its whole subtree as disposed.
    pub(crate) fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        let children = std::mem::take(&mut self.lock().children);
        for child in children {
            child.dispose();
        }
    }

    pub(crate) fn handle(node: &Arc<Node>) -> Widget {
        Widget::new(Box::new(MemoryWidget {
            id: node.id,
            kind: node.kind,
            style: node.style,
            node: Arc::downgrade(node),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct MemoryWidget {
    id: usize,
    kind: WidgetKind,
    style: Style,
    node: Weak<Node>,
}

impl MemoryWidget {
    /// Resolves the live node, enforcing disposal and UI-thread affinity.
    pub(crate) fn live(&self) -> RedDeerResult<(Arc<Node>, Arc<DisplayShared>)> {
        let node = self
            .node
            .upgrade()
            .filter(|node| !node.is_disposed())
            .ok_or_else(|| RedDeerError::WidgetDisposed(format!("{}#{}", self.kind, self.id)))?;
        let display = node.display.upgrade().ok_or_else(|| {
            RedDeerError::DisplayUnavailable("display owning the widget is gone".to_string())
        })?;
        if std::thread::current().id() != display.ui_thread {
            return Err(RedDeerError::InvalidThreadAccess(format!(
                "{}#{} accessed from thread {:?}",
                self.kind,
                self.id,
                std::thread::current().name().unwrap_or("<unnamed>")
            )));
        }
        Ok((node, display))
    }

    fn require(&self, supported: bool, operation: &'static str) -> RedDeerResult<()> {
        if supported {
            Ok(())
        } else {
            Err(RedDeerError::unsupported(operation, self.kind))
        }
    }
}

impl WidgetImpl for MemoryWidget {
    fn object_id(&self) -> usize {
        self.id
    }

    fn kind(&self) -> WidgetKind {
        self.kind
    }

    fn style(&self) -> Style {
        self.style
    }

    fn is_disposed(&self) -> bool {
        self.node.upgrade().map(|n| n.is_disposed()).unwrap_or(true)
    }

    fn children(&self) -> RedDeerResult<Vec<Widget>> {
        let (node, _) = self.live()?;
        let state = node.lock();
        Ok(state
            .children
            .iter()
            .filter(|child| !child.is_disposed())
            .map(Node::handle)
            .collect())
    }

    fn parent(&self) -> RedDeerResult<Option<Widget>> {
        let (node, _) = self.live()?;
        let parent = node.lock().parent.upgrade();
        Ok(parent.filter(|p| !p.is_disposed()).map(|p| Node::handle(&p)))
    }

    fn text(&self) -> RedDeerResult<String> {
        self.require(self.kind.has_text(), "text")?;
        let (node, _) = self.live()?;
        let text = node.lock().text.clone();
        Ok(text)
    }

    fn set_text(&self, text: &str) -> RedDeerResult<()> {
        self.require(
            matches!(
                self.kind,
                WidgetKind::Text | WidgetKind::StyledText | WidgetKind::Combo | WidgetKind::Shell
            ),
            "set_text",
        )?;
        let (node, _) = self.live()?;
        let mut state = node.lock();
        state.text = text.to_string();
        if self.kind == WidgetKind::Combo {
            state.selection = state
                .items
                .iter()
                .position(|item| item == text)
                .into_iter()
                .collect();
        }
        Ok(())
    }

    fn items(&self) -> RedDeerResult<Vec<String>> {
        self.require(self.kind.has_items(), "items")?;
        let (node, _) = self.live()?;
        let items = node.lock().items.clone();
        Ok(items)
    }

    fn selection_indices(&self) -> RedDeerResult<Vec<usize>> {
        self.require(self.kind.has_items(), "selection")?;
        let (node, _) = self.live()?;
        let selection = node.lock().selection.clone();
        Ok(selection)
    }

    fn select(&self, index: usize) -> RedDeerResult<()> {
        self.require(self.kind.has_items(), "select")?;
        let (node, _) = self.live()?;
        let mut state = node.lock();
        if index >= state.items.len() {
            return Err(RedDeerError::InvalidArgument(format!(
                "index {index} out of range for {} items",
                state.items.len()
            )));
        }
        if self.kind == WidgetKind::List && self.style.contains(Style::MULTI) {
            if !state.selection.contains(&index) {
                state.selection.push(index);
                state.selection.sort_unstable();
            }
        } else {
            state.selection = vec![index];
        }
        if self.kind == WidgetKind::Combo {
            state.text = state.items[index].clone();
        }
        Ok(())
    }

    fn deselect_all(&self) -> RedDeerResult<()> {
        self.require(self.kind.has_items(), "deselect_all")?;
        let (node, _) = self.live()?;
        node.lock().selection.clear();
        Ok(())
    }

    fn tooltip(&self) -> RedDeerResult<Option<String>> {
        self.require(self.kind.has_tooltip(), "tooltip")?;
        let (node, _) = self.live()?;
        let tooltip = node.lock().tooltip.clone();
        Ok(tooltip)
    }

    fn has_image(&self) -> RedDeerResult<bool> {
        let (node, _) = self.live()?;
        let image = node.lock().image;
        Ok(image)
    }

    fn set_focus(&self) -> RedDeerResult<bool> {
        let (node, display) = self.live()?;
        if !node.lock().enabled {
            return Ok(false);
        }
        *display.lock_focus() = Some(node.id);
        Ok(true)
    }

    fn is_focused(&self) -> RedDeerResult<bool> {
        let (node, display) = self.live()?;
        let focused = *display.lock_focus() == Some(node.id);
        Ok(focused)
    }

    fn is_enabled(&self) -> RedDeerResult<bool> {
        let (node, _) = self.live()?;
        let enabled = node.lock().enabled;
        Ok(enabled)
    }

    fn is_selected(&self) -> RedDeerResult<bool> {
        self.require(self.kind == WidgetKind::Button, "is_selected")?;
        let (node, _) = self.live()?;
        let selected = node.lock().selected;
        Ok(selected)
    }

    fn click(&self) -> RedDeerResult<()> {
        self.require(
            matches!(self.kind, WidgetKind::Button | WidgetKind::Hyperlink),
            "click",
        )?;
        let (node, display) = self.live()?;
        let listener = {
            let mut state = node.lock();
            if !state.enabled {
                return Err(RedDeerError::InvalidArgument(format!(
                    "{}#{} is disabled",
                    self.kind, self.id
                )));
            }
            if self.style.contains(Style::CHECK) {
                state.selected = !state.selected;
            } else if self.style.contains(Style::RADIO) {
                state.selected = true;
            }
            state.on_click.clone()
        };
        if self.style.contains(Style::RADIO) {
            uncheck_sibling_radios(&node);
        }
        debug!(widget = self.id, "clicked");
        if let Some(listener) = listener {
            let handle = Node::handle(&node);
            listener(&MemoryDisplay::from_shared(display), &handle);
        }
        Ok(())
    }

    fn close(&self) -> RedDeerResult<()> {
        self.require(self.kind == WidgetKind::Shell, "close")?;
        let (node, display) = self.live()?;
        MemoryDisplay::from_shared(display).close_shell(&node);
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn WidgetImpl> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

fn uncheck_sibling_radios(node: &Arc<Node>) {
    let Some(parent) = node.lock().parent.upgrade() else {
        return;
    };
    let siblings = parent.lock().children.clone();
    for sibling in siblings {
        if sibling.id != node.id && sibling.style.contains(Style::RADIO) {
            sibling.lock().selected = false;
        }
    }
}

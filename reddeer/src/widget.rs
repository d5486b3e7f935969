use crate::errors::{RedDeerError, RedDeerResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Debug;
use std::ops::BitOr;
use std::str::FromStr;

/// Concrete widget types the toolkit can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetKind {
    Shell,
    Text,
    StyledText,
    Label,
    Combo,
    List,
    Button,
    Group,
    Hyperlink,
    Section,
    Composite,
    /// Tab of a tab folder. An item, not a control.
    TabItem,
}

/// Capability family of a widget. Decided once when a [`Widget`] handle is
/// created; handlers route operations on this tag instead of re-inspecting
/// the concrete type on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetFamily {
    /// Editable text (Text, StyledText)
    TextInput,
    /// Item list with optional multi-selection (List)
    ListLike,
    /// Item list with a single selection and editable text (Combo)
    Selectable,
    /// Read-only display text (Label, Group, Hyperlink, Section, TabItem)
    LabelLike,
    /// Plain controls (Shell, Button, Composite)
    Control,
}

impl WidgetKind {
    pub fn family(self) -> WidgetFamily {
        match self {
            WidgetKind::Text | WidgetKind::StyledText => WidgetFamily::TextInput,
            WidgetKind::List => WidgetFamily::ListLike,
            WidgetKind::Combo => WidgetFamily::Selectable,
            WidgetKind::Label
            | WidgetKind::Group
            | WidgetKind::Hyperlink
            | WidgetKind::Section
            | WidgetKind::TabItem => WidgetFamily::LabelLike,
            WidgetKind::Shell | WidgetKind::Button | WidgetKind::Composite => {
                WidgetFamily::Control
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WidgetKind::Shell => "Shell",
            WidgetKind::Text => "Text",
            WidgetKind::StyledText => "StyledText",
            WidgetKind::Label => "Label",
            WidgetKind::Combo => "Combo",
            WidgetKind::List => "List",
            WidgetKind::Button => "Button",
            WidgetKind::Group => "Group",
            WidgetKind::Hyperlink => "Hyperlink",
            WidgetKind::Section => "Section",
            WidgetKind::Composite => "Composite",
            WidgetKind::TabItem => "TabItem",
        }
    }

    /// Whether the widget shows a text string (title, caption or content).
    pub fn has_text(self) -> bool {
        !matches!(self, WidgetKind::List | WidgetKind::Composite)
    }

    pub fn has_items(self) -> bool {
        matches!(self.family(), WidgetFamily::ListLike | WidgetFamily::Selectable)
    }

    pub fn has_selection(self) -> bool {
        self.has_items() || self == WidgetKind::Button
    }

    pub fn has_tooltip(self) -> bool {
        matches!(self.family(), WidgetFamily::TextInput | WidgetFamily::Selectable)
            || self == WidgetKind::Button
    }

    /// Items live inside a control and cannot take focus themselves.
    pub fn is_control(self) -> bool {
        self != WidgetKind::TabItem
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WidgetKind {
    type Err = RedDeerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shell" | "window" => Ok(WidgetKind::Shell),
            "text" | "textfield" | "input" => Ok(WidgetKind::Text),
            "styledtext" => Ok(WidgetKind::StyledText),
            "label" => Ok(WidgetKind::Label),
            "combo" => Ok(WidgetKind::Combo),
            "list" => Ok(WidgetKind::List),
            "button" | "checkbox" => Ok(WidgetKind::Button),
            "group" => Ok(WidgetKind::Group),
            "hyperlink" | "link" => Ok(WidgetKind::Hyperlink),
            "section" => Ok(WidgetKind::Section),
            "composite" => Ok(WidgetKind::Composite),
            "tabitem" | "tab" => Ok(WidgetKind::TabItem),
            other => Err(RedDeerError::InvalidArgument(format!(
                "Unknown widget kind: '{other}'"
            ))),
        }
    }
}

/// Style bits a widget was created with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Style(u32);

impl Style {
    pub const NONE: Style = Style(0);
    pub const PUSH: Style = Style(1 << 3);
    pub const RADIO: Style = Style(1 << 4);
    pub const CHECK: Style = Style(1 << 5);
    pub const SINGLE: Style = Style(1 << 2);
    pub const MULTI: Style = Style(1 << 1);
    pub const READ_ONLY: Style = Style(1 << 8);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Style) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Style {
    type Output = Style;

    fn bitor(self, rhs: Style) -> Style {
        Style(self.0 | rhs.0)
    }
}

/// Toolkit-side operations on a live widget.
///
/// Everything except `object_id`, `kind`, `style` and `is_disposed` touches
/// live widget state and must run on the UI thread; implementations report
/// [`RedDeerError::InvalidThreadAccess`] otherwise.
pub trait WidgetImpl: Send + Sync + Debug {
    fn object_id(&self) -> usize;
    fn kind(&self) -> WidgetKind;
    fn style(&self) -> Style;
    fn is_disposed(&self) -> bool;
    fn children(&self) -> RedDeerResult<Vec<Widget>>;
    fn parent(&self) -> RedDeerResult<Option<Widget>>;
    fn text(&self) -> RedDeerResult<String>;
    fn set_text(&self, text: &str) -> RedDeerResult<()>;
    fn items(&self) -> RedDeerResult<Vec<String>>;
    fn selection_indices(&self) -> RedDeerResult<Vec<usize>>;
    /// Replaces the selection for single-selection widgets, extends it for
    /// `Style::MULTI` lists.
    fn select(&self, index: usize) -> RedDeerResult<()>;
    fn deselect_all(&self) -> RedDeerResult<()>;
    fn tooltip(&self) -> RedDeerResult<Option<String>>;
    fn has_image(&self) -> RedDeerResult<bool>;
    fn set_focus(&self) -> RedDeerResult<bool>;
    fn is_focused(&self) -> RedDeerResult<bool>;
    fn is_enabled(&self) -> RedDeerResult<bool>;
    fn is_selected(&self) -> RedDeerResult<bool>;
    fn click(&self) -> RedDeerResult<()>;
    fn close(&self) -> RedDeerResult<()>;
    fn clone_box(&self) -> Box<dyn WidgetImpl>;
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Non-owning handle to a live toolkit widget.
///
/// The toolkit owns the widget; the handle may outlive it, in which case
/// every live accessor fails with [`RedDeerError::WidgetDisposed`].
#[derive(Debug)]
pub struct Widget {
    inner: Box<dyn WidgetImpl>,
    kind: WidgetKind,
}

impl Widget {
    /// Create a new handle from a toolkit-specific implementation
    pub fn new(impl_: Box<dyn WidgetImpl>) -> Self {
        let kind = impl_.kind();
        Self { inner: impl_, kind }
    }

    pub fn object_id(&self) -> usize {
        self.inner.object_id()
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn family(&self) -> WidgetFamily {
        self.kind.family()
    }

    pub fn style(&self) -> Style {
        self.inner.style()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    /// Raw toolkit access. Callers outside the UI thread go through
    /// [`crate::UiDispatcher`] instead.
    pub fn raw(&self) -> &dyn WidgetImpl {
        self.inner.as_ref()
    }

    /// Short human readable identification used in logs and error messages.
    pub fn describe(&self) -> String {
        format!("{}#{}", self.kind, self.object_id())
    }

    /// Snapshot of this widget and its descendants. UI thread only.
    pub fn to_serializable_tree(&self, max_depth: usize) -> RedDeerResult<SerializableWidget> {
        fn build(
            widget: &Widget,
            depth: usize,
            max_depth: usize,
        ) -> RedDeerResult<SerializableWidget> {
            let raw = widget.raw();
            let kind = widget.kind();
            let mut node = SerializableWidget::new(widget.object_id(), kind);
            if kind.has_text() {
                node.text = Some(raw.text()?).filter(|t| !t.is_empty());
            }
            if kind.has_items() {
                node.items = raw.items()?;
                node.selection = raw.selection_indices()?;
            }
            if kind.has_tooltip() {
                node.tooltip = raw.tooltip()?;
            }
            node.style = widget.style().bits();
            if depth < max_depth {
                let children = raw
                    .children()?
                    .iter()
                    .map(|child| build(child, depth + 1, max_depth))
                    .collect::<RedDeerResult<Vec<_>>>()?;
                if !children.is_empty() {
                    node.children = Some(children);
                }
            }
            Ok(node)
        }
        build(self, 0, max_depth)
    }
}

impl PartialEq for Widget {
    fn eq(&self, other: &Self) -> bool {
        self.inner.object_id() == other.inner.object_id()
    }
}

impl Eq for Widget {}

impl std::hash::Hash for Widget {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.object_id().hash(state);
    }
}

impl Clone for Widget {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
            kind: self.kind,
        }
    }
}

/// Serializable snapshot of a widget subtree, for diagnostics.
///
/// It carries no live reference and cannot be used to drive the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableWidget {
    pub id: usize,
    pub kind: WidgetKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub items: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub selection: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(skip_serializing_if = "is_zero", default)]
    pub style: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub children: Option<Vec<SerializableWidget>>,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl SerializableWidget {
    pub fn new(id: usize, kind: WidgetKind) -> Self {
        Self {
            id,
            kind,
            text: None,
            items: Vec::new(),
            selection: Vec::new(),
            tooltip: None,
            style: 0,
            children: None,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

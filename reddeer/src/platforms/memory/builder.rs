use super::MemoryDisplay;
use crate::widget::{Style, Widget, WidgetKind};
use std::sync::Arc;

/// Called on the UI thread after a button or hyperlink was clicked.
pub type ClickListener = Arc<dyn Fn(&MemoryDisplay, &Widget) + Send + Sync>;

/// Declarative description of a widget subtree to be created by
/// [`MemoryDisplay::open_shell`] or [`MemoryDisplay::add_child`].
#[derive(Clone)]
pub struct WidgetSpec {
    pub(crate) kind: WidgetKind,
    pub(crate) style: Style,
    pub(crate) text: String,
    pub(crate) items: Vec<String>,
    pub(crate) selection: Vec<usize>,
    pub(crate) tooltip: Option<String>,
    pub(crate) image: bool,
    pub(crate) enabled: bool,
    pub(crate) selected: bool,
    pub(crate) on_click: Option<ClickListener>,
    pub(crate) children: Vec<WidgetSpec>,
}

impl WidgetSpec {
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            style: Style::NONE,
            text: String::new(),
            items: Vec::new(),
            selection: Vec::new(),
            tooltip: None,
            image: false,
            enabled: true,
            selected: false,
            on_click: None,
            children: Vec::new(),
        }
    }

    pub fn shell(title: impl Into<String>) -> Self {
        Self::new(WidgetKind::Shell).with_text(title)
    }

    pub fn composite() -> Self {
        Self::new(WidgetKind::Composite)
    }

    pub fn group(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Group).with_text(text)
    }

    pub fn section(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Section).with_text(text)
    }

    pub fn tab_item(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::TabItem).with_text(text)
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Label).with_text(text)
    }

    pub fn hyperlink(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Hyperlink).with_text(text)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(WidgetKind::Text).with_text(content)
    }

    pub fn styled_text(content: impl Into<String>) -> Self {
        Self::new(WidgetKind::StyledText).with_text(content)
    }

    pub fn button(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Button)
            .with_text(text)
            .with_style(Style::PUSH)
    }

    pub fn check_box(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Button)
            .with_text(text)
            .with_style(Style::CHECK)
    }

    pub fn radio(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Button)
            .with_text(text)
            .with_style(Style::RADIO)
    }

    pub fn combo<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(WidgetKind::Combo).with_items(items)
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(WidgetKind::List).with_items(items)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = self.style | style;
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_image(mut self) -> Self {
        self.image = true;
        self
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selection = vec![index];
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.selected = checked;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn on_click<F>(mut self, listener: F) -> Self
    where
        F: Fn(&MemoryDisplay, &Widget) + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(listener));
        self
    }

    pub fn child(mut self, child: WidgetSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = WidgetSpec>,
    {
        self.children.extend(children);
        self
    }
}

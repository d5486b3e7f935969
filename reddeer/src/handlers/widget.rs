use crate::dispatcher::UiDispatcher;
use crate::errors::{RedDeerError, RedDeerResult};
use crate::lookup::label;
use crate::widget::{Style, Widget, WidgetFamily, WidgetKind};
use tracing::{debug, error, info, instrument};

/// Text, item, selection, label, tooltip and focus operations routed by
/// widget family. Every operation runs on the UI thread through the
/// dispatcher; families that lack the capability fail with
/// [`RedDeerError::UnsupportedWidgetType`] before anything is dispatched.
#[derive(Clone)]
pub struct WidgetHandler {
    dispatcher: UiDispatcher,
}

impl WidgetHandler {
    pub fn new(dispatcher: UiDispatcher) -> Self {
        Self { dispatcher }
    }

    fn on_ui<T, F>(&self, widget: &Widget, operation: F) -> RedDeerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Widget) -> RedDeerResult<T> + Send + 'static,
    {
        let widget = widget.clone();
        self.dispatcher.run_on_ui_thread(move || operation(&widget))
    }

    #[instrument(level = "debug", skip(self, widget), fields(widget = %widget.describe()))]
    pub fn text(&self, widget: &Widget) -> RedDeerResult<String> {
        match widget.family() {
            WidgetFamily::TextInput | WidgetFamily::LabelLike | WidgetFamily::Selectable => {}
            WidgetFamily::Control if widget.kind().has_text() => {}
            _ => return Err(RedDeerError::unsupported("text", widget.kind())),
        }
        self.on_ui(widget, |w| w.raw().text())
    }

    #[instrument(level = "debug", skip(self, widget), fields(widget = %widget.describe()))]
    pub fn set_text(&self, widget: &Widget, text: &str) -> RedDeerResult<()> {
        match widget.family() {
            WidgetFamily::TextInput | WidgetFamily::Selectable => {}
            _ => return Err(RedDeerError::unsupported("set_text", widget.kind())),
        }
        if widget.style().contains(Style::READ_ONLY) {
            return Err(RedDeerError::InvalidArgument(format!(
                "{} is read-only",
                widget.describe()
            )));
        }
        let text = text.to_string();
        self.on_ui(widget, move |w| w.raw().set_text(&text))
    }

    pub fn items(&self, widget: &Widget) -> RedDeerResult<Vec<String>> {
        require_items(widget, "items")?;
        self.on_ui(widget, |w| w.raw().items())
    }

    /// Selects the item equal to `item` (case-sensitive). When no such item
    /// exists the error lists every current item.
    #[instrument(level = "debug", skip(self, widget), fields(widget = %widget.describe()))]
    pub fn select(&self, widget: &Widget, item: &str) -> RedDeerResult<()> {
        require_items(widget, "select")?;
        let item = item.to_string();
        self.on_ui(widget, move |w| {
            let items = w.raw().items()?;
            let index = index_of(w, &items, &item)?;
            w.raw().select(index)
        })
    }

    /// Selects the item at `index`, which must be below the current item count.
    #[instrument(level = "debug", skip(self, widget), fields(widget = %widget.describe()))]
    pub fn select_index(&self, widget: &Widget, index: usize) -> RedDeerResult<()> {
        require_items(widget, "select_index")?;
        self.on_ui(widget, move |w| {
            check_index(w, w.raw().items()?.len(), index)?;
            w.raw().select(index)
        })
    }

    /// Selected item of a combo, `None` when nothing is selected.
    pub fn selection(&self, widget: &Widget) -> RedDeerResult<Option<String>> {
        require_family(widget, WidgetFamily::Selectable, "selection")?;
        self.on_ui(widget, |w| {
            let items = w.raw().items()?;
            let selected = w.raw().selection_indices()?;
            Ok(selected.first().and_then(|i| items.get(*i)).cloned())
        })
    }

    pub fn selection_index(&self, widget: &Widget) -> RedDeerResult<Option<usize>> {
        require_family(widget, WidgetFamily::Selectable, "selection_index")?;
        self.on_ui(widget, |w| Ok(w.raw().selection_indices()?.first().copied()))
    }

    /// Selected items of a list in item order.
    pub fn selected_items(&self, widget: &Widget) -> RedDeerResult<Vec<String>> {
        require_family(widget, WidgetFamily::ListLike, "selected_items")?;
        self.on_ui(widget, |w| {
            let items = w.raw().items()?;
            Ok(w.raw()
                .selection_indices()?
                .into_iter()
                .filter_map(|i| items.get(i).cloned())
                .collect())
        })
    }

    pub fn deselect_all(&self, widget: &Widget) -> RedDeerResult<()> {
        require_family(widget, WidgetFamily::ListLike, "deselect_all")?;
        self.on_ui(widget, |w| w.raw().deselect_all())
    }

    pub fn select_all(&self, widget: &Widget) -> RedDeerResult<()> {
        require_multi(widget, "select_all")?;
        self.on_ui(widget, |w| {
            for index in 0..w.raw().items()?.len() {
                w.raw().select(index)?;
            }
            Ok(())
        })
    }

    /// Adds every item in `items` to a multi-selection list. Nothing is
    /// selected if one of them does not exist.
    #[instrument(level = "debug", skip(self, widget), fields(widget = %widget.describe()))]
    pub fn select_items(&self, widget: &Widget, items: &[&str]) -> RedDeerResult<()> {
        require_multi(widget, "select_items")?;
        let wanted: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        self.on_ui(widget, move |w| {
            let items = w.raw().items()?;
            let indices = wanted
                .iter()
                .map(|item| index_of(w, &items, item))
                .collect::<RedDeerResult<Vec<_>>>()?;
            indices.into_iter().try_for_each(|i| w.raw().select(i))
        })
    }

    pub fn select_indices(&self, widget: &Widget, indices: &[usize]) -> RedDeerResult<()> {
        require_multi(widget, "select_indices")?;
        let indices = indices.to_vec();
        self.on_ui(widget, move |w| {
            let count = w.raw().items()?.len();
            for index in &indices {
                check_index(w, count, *index)?;
            }
            indices.into_iter().try_for_each(|i| w.raw().select(i))
        })
    }

    /// Text of the label preceding an input control, if there is one.
    pub fn label(&self, widget: &Widget) -> RedDeerResult<Option<String>> {
        if !label::has_label(widget) {
            return Err(RedDeerError::unsupported("label", widget.kind()));
        }
        self.on_ui(widget, label::label_of)
    }

    pub fn tooltip_text(&self, widget: &Widget) -> RedDeerResult<Option<String>> {
        if !widget.kind().has_tooltip() {
            return Err(RedDeerError::unsupported("tooltip_text", widget.kind()));
        }
        self.on_ui(widget, |w| w.raw().tooltip())
    }

    /// Gives keyboard focus to the widget. Returns `false` when the toolkit
    /// refused, e.g. because the widget is disabled.
    pub fn set_focus(&self, widget: &Widget) -> RedDeerResult<bool> {
        if !widget.kind().is_control() {
            return Err(RedDeerError::unsupported("set_focus", widget.kind()));
        }
        let focused = self.on_ui(widget, |w| w.raw().set_focus())?;
        debug!(focused, "set_focus on {}", widget.describe());
        Ok(focused)
    }

    pub fn is_focused(&self, widget: &Widget) -> RedDeerResult<bool> {
        self.on_ui(widget, |w| w.raw().is_focused())
    }

    pub fn is_enabled(&self, widget: &Widget) -> RedDeerResult<bool> {
        self.on_ui(widget, |w| w.raw().is_enabled())
    }
}

fn require_family(widget: &Widget, family: WidgetFamily, operation: &'static str) -> RedDeerResult<()> {
    if widget.family() == family {
        Ok(())
    } else {
        Err(RedDeerError::unsupported(operation, widget.kind()))
    }
}

fn require_items(widget: &Widget, operation: &'static str) -> RedDeerResult<()> {
    match widget.family() {
        WidgetFamily::ListLike | WidgetFamily::Selectable => Ok(()),
        _ => Err(RedDeerError::unsupported(operation, widget.kind())),
    }
}

fn require_multi(widget: &Widget, operation: &'static str) -> RedDeerResult<()> {
    require_family(widget, WidgetFamily::ListLike, operation)?;
    if !widget.style().contains(Style::MULTI) {
        return Err(RedDeerError::InvalidArgument(format!(
            "{} does not support multi selection, it lacks the MULTI style",
            widget.describe()
        )));
    }
    Ok(())
}

fn index_of(widget: &Widget, items: &[String], item: &str) -> RedDeerResult<usize> {
    if let Some(index) = items.iter().position(|candidate| candidate == item) {
        return Ok(index);
    }
    let container = match widget.kind() {
        WidgetKind::Combo => "combo",
        _ => "list",
    };
    error!("'{}' is not contained in {} items", item, container);
    info!("Items present in {}:", container);
    for (index, present) in items.iter().enumerate() {
        info!("    {} (index {})", present, index);
    }
    Err(RedDeerError::InvalidArgument(format!(
        "Unable to select item '{item}' of {} because it does not exist; available items: [{}]",
        widget.describe(),
        items.join(", ")
    )))
}

fn check_index(widget: &Widget, count: usize, index: usize) -> RedDeerResult<()> {
    if index < count {
        return Ok(());
    }
    error!("{} does not have {} items", widget.describe(), index.saturating_add(1));
    info!("{} has {} items", widget.describe(), count);
    Err(RedDeerError::InvalidArgument(format!(
        "Unable to select item with index {index} of {} because it does not exist ({count} items)",
        widget.describe()
    )))
}

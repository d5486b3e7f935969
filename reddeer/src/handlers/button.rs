use crate::dispatcher::UiDispatcher;
use crate::errors::{RedDeerError, RedDeerResult};
use crate::widget::{Style, Widget, WidgetKind};
use tracing::{debug, instrument};

/// Push, check and radio buttons, plus hyperlinks for `click`.
#[derive(Clone)]
pub struct ButtonHandler {
    dispatcher: UiDispatcher,
}

impl ButtonHandler {
    pub fn new(dispatcher: UiDispatcher) -> Self {
        Self { dispatcher }
    }

    #[instrument(level = "debug", skip(self, widget), fields(widget = %widget.describe()))]
    pub fn click(&self, widget: &Widget) -> RedDeerResult<()> {
        if !matches!(widget.kind(), WidgetKind::Button | WidgetKind::Hyperlink) {
            return Err(RedDeerError::unsupported("click", widget.kind()));
        }
        let widget = widget.clone();
        self.dispatcher.run_on_ui_thread(move || widget.raw().click())
    }

    pub fn is_selected(&self, widget: &Widget) -> RedDeerResult<bool> {
        if widget.kind() != WidgetKind::Button {
            return Err(RedDeerError::unsupported("is_selected", widget.kind()));
        }
        let widget = widget.clone();
        self.dispatcher
            .run_on_ui_thread(move || widget.raw().is_selected())
    }

    /// Brings a check box to `checked`, clicking only when its state differs.
    #[instrument(level = "debug", skip(self, widget), fields(widget = %widget.describe()))]
    pub fn toggle(&self, widget: &Widget, checked: bool) -> RedDeerResult<()> {
        if widget.kind() != WidgetKind::Button || !widget.style().contains(Style::CHECK) {
            return Err(RedDeerError::unsupported("toggle", widget.kind()));
        }
        let target = widget.clone();
        let clicked = self.dispatcher.run_on_ui_thread(move || {
            if target.raw().is_selected()? == checked {
                return Ok(false);
            }
            target.raw().click()?;
            Ok(true)
        })?;
        debug!(clicked, checked, "toggled check box");
        Ok(())
    }
}

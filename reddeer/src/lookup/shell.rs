use crate::dispatcher::UiDispatcher;
use crate::errors::{RedDeerError, RedDeerResult};
use crate::matchers::TextMatcher;
use crate::widget::Widget;
use tracing::{debug, instrument};

/// Finds top-level shells by title or activation state.
#[derive(Clone)]
pub struct ShellLookup {
    dispatcher: UiDispatcher,
}

impl ShellLookup {
    pub fn new(dispatcher: UiDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Open shells in the order they were created
    pub fn shells(&self) -> RedDeerResult<Vec<Widget>> {
        let engine = self.dispatcher.engine().clone();
        self.dispatcher.run_on_ui_thread(move || engine.shells())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn active_shell(&self) -> RedDeerResult<Widget> {
        let engine = self.dispatcher.engine().clone();
        self.dispatcher
            .run_on_ui_thread(move || engine.active_shell())?
            .ok_or_else(|| RedDeerError::WidgetNotFound("no active shell".to_string()))
    }

    /// First open shell whose title satisfies `title`.
    #[instrument(level = "debug", skip(self), fields(title = %title))]
    pub fn shell(&self, title: &TextMatcher) -> RedDeerResult<Widget> {
        let engine = self.dispatcher.engine().clone();
        let matcher = title.clone();
        let found = self.dispatcher.run_on_ui_thread(move || {
            for shell in engine.shells()? {
                if matcher.matches(&shell.raw().text()?)? {
                    return Ok(Some(shell));
                }
            }
            Ok(None)
        })?;
        found.ok_or_else(|| {
            RedDeerError::WidgetNotFound(format!("no shell with title that {title}"))
        })
    }

    pub fn shell_with_title(&self, title: &str) -> RedDeerResult<Widget> {
        self.shell(&TextMatcher::equals(title))
    }

    pub fn title(&self, shell: &Widget) -> RedDeerResult<String> {
        let shell = shell.clone();
        self.dispatcher.run_on_ui_thread(move || shell.raw().text())
    }

    pub fn close(&self, shell: &Widget) -> RedDeerResult<()> {
        debug!(shell = %shell.describe(), "closing shell");
        let shell = shell.clone();
        self.dispatcher.run_on_ui_thread(move || shell.raw().close())
    }
}

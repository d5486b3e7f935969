//! UI automation core for toolkit-driven desktop tests
//!
//! Tests find live widgets with matcher-based selectors, drive them through
//! operations marshalled onto the toolkit's UI thread, and synchronize with
//! the UI through polling waits.

use std::sync::Arc;
use tracing::instrument;

pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod handlers;
pub mod locator;
pub mod logging;
pub mod lookup;
pub mod matchers;
pub mod platforms;
pub mod selector;
#[cfg(test)]
mod tests;
pub mod user_profile;
pub mod wait;
pub mod widget;

pub use dispatcher::UiDispatcher;
pub use errors::{RedDeerError, RedDeerResult};
pub use handlers::{ButtonHandler, WidgetHandler};
pub use locator::Locator;
pub use lookup::{ShellLookup, WidgetResolver};
pub use matchers::{Matcher, TextMatcher, VersionMatcher};
pub use platforms::memory::{MemoryDisplay, WidgetSpec};
pub use platforms::DisplayEngine;
pub use selector::Selector;
pub use user_profile::UserProfile;
pub use wait::{TimePeriod, WaitCondition, WaitUntil, WaitWhile};
pub use widget::{SerializableWidget, Style, Widget, WidgetFamily, WidgetImpl, WidgetKind};

/// Entry point for one automation session against one display.
///
/// Owns the display engine and hands out the dispatcher, resolver and
/// handlers bound to it. Independent sessions can run side by side.
#[derive(Clone)]
pub struct Session {
    dispatcher: UiDispatcher,
}

impl Session {
    pub fn new(engine: Arc<dyn DisplayEngine>) -> Self {
        Self {
            dispatcher: UiDispatcher::new(engine),
        }
    }

    /// Starts an in-memory display and a session bound to it.
    ///
    /// ```
    /// use reddeer::{Session, WidgetSpec};
    /// let (session, display) = Session::in_memory()?;
    /// let shell = session.run_on_ui_thread({
    ///     let display = display.clone();
    ///     move || display.open_shell(WidgetSpec::shell("Main"))
    /// })?;
    /// assert_eq!(session.shells().title(&shell)?, "Main");
    /// display.dispose();
    /// # Ok::<(), reddeer::RedDeerError>(())
    /// ```
    pub fn in_memory() -> RedDeerResult<(Self, MemoryDisplay)> {
        let display = MemoryDisplay::start()?;
        Ok((Self::new(Arc::new(display.clone())), display))
    }

    pub fn engine(&self) -> &Arc<dyn DisplayEngine> {
        self.dispatcher.engine()
    }

    pub fn dispatcher(&self) -> &UiDispatcher {
        &self.dispatcher
    }

    pub fn resolver(&self) -> WidgetResolver {
        WidgetResolver::new(self.dispatcher.clone())
    }

    pub fn widgets(&self) -> WidgetHandler {
        WidgetHandler::new(self.dispatcher.clone())
    }

    pub fn buttons(&self) -> ButtonHandler {
        ButtonHandler::new(self.dispatcher.clone())
    }

    pub fn shells(&self) -> ShellLookup {
        ShellLookup::new(self.dispatcher.clone())
    }

    #[instrument(level = "debug", skip(self, selector))]
    pub fn locator(&self, selector: impl Into<Selector>) -> Locator {
        Locator::new(self.resolver(), selector.into())
    }

    /// Resolves `selector` once, without waiting.
    pub fn find(&self, selector: impl Into<Selector>) -> RedDeerResult<Widget> {
        self.resolver().find(&selector.into())
    }

    pub fn find_all(&self, selector: impl Into<Selector>) -> RedDeerResult<Vec<Widget>> {
        self.resolver().find_all(&selector.into())
    }

    pub fn focused_widget(&self) -> RedDeerResult<Option<Widget>> {
        let engine = self.engine().clone();
        self.dispatcher
            .run_on_ui_thread(move || engine.focused_widget())
    }

    /// Diagnostic snapshot of `root` and its descendants down to `max_depth`.
    pub fn widget_tree(&self, root: &Widget, max_depth: usize) -> RedDeerResult<SerializableWidget> {
        let root = root.clone();
        self.dispatcher
            .run_on_ui_thread(move || root.to_serializable_tree(max_depth))
    }

    pub fn run_on_ui_thread<T, F>(&self, operation: F) -> RedDeerResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> RedDeerResult<T> + Send + 'static,
    {
        self.dispatcher.run_on_ui_thread(operation)
    }

    pub fn post_on_ui_thread<F>(&self, operation: F) -> RedDeerResult<()>
    where
        F: FnOnce() -> RedDeerResult<()> + Send + 'static,
    {
        self.dispatcher.post_on_ui_thread(operation)
    }

    /// Waits with the process-wide defaults until `condition` holds.
    pub fn wait_until<C: WaitCondition>(&self, condition: C) -> RedDeerResult<bool> {
        WaitUntil::new(condition).wait()
    }

    /// Waits with the process-wide defaults while `condition` holds.
    pub fn wait_while<C: WaitCondition>(&self, condition: C) -> RedDeerResult<bool> {
        WaitWhile::new(condition).wait()
    }
}

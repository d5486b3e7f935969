use tracing::{debug, instrument};

use crate::config;
use crate::errors::{RedDeerError, RedDeerResult};
use crate::lookup::WidgetResolver;
use crate::matchers::Matcher;
use crate::selector::Selector;
use crate::wait::{WaitUntil, WidgetIsFound};
use crate::widget::Widget;
use std::time::Duration;
use tokio::task;

/// Async façade over the resolver for callers running inside a tokio runtime.
///
/// Resolution and waiting block on the UI thread, so every call is moved to
/// tokio's blocking pool instead of stalling the async executor.
#[derive(Clone)]
pub struct Locator {
    resolver: WidgetResolver,
    selector: Selector,
    timeout: Duration,
}

impl Locator {
    pub(crate) fn new(resolver: WidgetResolver, selector: Selector) -> Self {
        Self {
            resolver,
            selector,
            timeout: config::wait_defaults().timeout.as_duration(),
        }
    }

    /// Timeout used when a call passes `None`.
    pub fn set_default_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn within(mut self, root: Widget) -> Self {
        self.selector = self.selector.within(root);
        self
    }

    pub fn nth(mut self, index: usize) -> Self {
        self.selector = self.selector.nth(index);
        self
    }

    /// Narrows the locator with one more matcher.
    pub fn and(mut self, matcher: Matcher) -> Self {
        self.selector = self.selector.and(matcher);
        self
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Waits until the selector resolves and returns the widget.
    #[instrument(level = "debug", skip(self, timeout), fields(selector = %self.selector))]
    pub async fn wait(&self, timeout: Option<Duration>) -> RedDeerResult<Widget> {
        let effective_timeout = timeout.unwrap_or(self.timeout);
        debug!("Waiting up to {:?} for widget", effective_timeout);
        let resolver = self.resolver.clone();
        let selector = self.selector.clone();
        task::spawn_blocking(move || {
            let description = selector.to_string();
            let mut wait =
                WaitUntil::new(WidgetIsFound::new(resolver, selector)).timeout(effective_timeout);
            wait.wait()?;
            wait.into_condition().into_widget().ok_or_else(|| {
                RedDeerError::WidgetNotFound(format!("{description} disappeared after the wait"))
            })
        })
        .await
        .map_err(|e| RedDeerError::OperationPanicked(format!("Task join error: {e}")))?
    }

    pub async fn first(&self, timeout: Option<Duration>) -> RedDeerResult<Widget> {
        self.wait(timeout).await
    }

    /// Every widget currently matching, without waiting. The selector's index
    /// is ignored.
    #[instrument(level = "debug", skip(self), fields(selector = %self.selector))]
    pub async fn all(&self) -> RedDeerResult<Vec<Widget>> {
        let resolver = self.resolver.clone();
        let selector = self.selector.clone();
        task::spawn_blocking(move || resolver.find_all(&selector))
            .await
            .map_err(|e| RedDeerError::OperationPanicked(format!("Task join error: {e}")))?
    }
}

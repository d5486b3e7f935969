//! Ready-made conditions over shells and widgets.

use super::condition::{probe, WaitCondition};
use crate::dispatcher::UiDispatcher;
use crate::errors::RedDeerError;
use crate::lookup::{ShellLookup, WidgetResolver};
use crate::matchers::TextMatcher;
use crate::selector::Selector;
use crate::widget::Widget;
use std::fmt;

/// Condition backed by a closure.
pub struct FnCondition<F: FnMut() -> bool> {
    func: F,
    description: String,
}

impl<F: FnMut() -> bool> FnCondition<F> {
    pub fn new(description: impl Into<String>, func: F) -> Self {
        Self {
            func,
            description: description.into(),
        }
    }
}

impl<F: FnMut() -> bool> fmt::Debug for FnCondition<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCondition")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<F: FnMut() -> bool> WaitCondition for FnCondition<F> {
    fn test(&mut self) -> bool {
        (self.func)()
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// Negation of another condition.
#[derive(Debug)]
pub struct Not<C>(pub C);

impl<C: WaitCondition> WaitCondition for Not<C> {
    fn test(&mut self) -> bool {
        !self.0.test()
    }

    fn description(&self) -> String {
        format!("not {}", self.0.description())
    }

    fn error_message_until(&self) -> String {
        self.0.error_message_while()
    }

    fn error_message_while(&self) -> String {
        self.0.error_message_until()
    }

    fn take_fatal_error(&mut self) -> Option<RedDeerError> {
        self.0.take_fatal_error()
    }
}

/// A shell whose title matches is open.
pub struct ShellIsAvailable {
    lookup: ShellLookup,
    title: TextMatcher,
    fatal: Option<RedDeerError>,
}

impl ShellIsAvailable {
    pub fn new(lookup: ShellLookup, title: TextMatcher) -> Self {
        Self {
            lookup,
            title,
            fatal: None,
        }
    }
}

impl WaitCondition for ShellIsAvailable {
    fn test(&mut self) -> bool {
        let outcome = match self.lookup.shell(&self.title) {
            Ok(_) => Ok(true),
            Err(RedDeerError::WidgetNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        };
        probe(outcome, &mut self.fatal)
    }

    fn description(&self) -> String {
        format!("shell with title that {} is available", self.title)
    }

    fn take_fatal_error(&mut self) -> Option<RedDeerError> {
        self.fatal.take()
    }
}

/// The active shell's title matches.
pub struct ShellIsActive {
    lookup: ShellLookup,
    title: TextMatcher,
    fatal: Option<RedDeerError>,
}

impl ShellIsActive {
    pub fn new(lookup: ShellLookup, title: TextMatcher) -> Self {
        Self {
            lookup,
            title,
            fatal: None,
        }
    }
}

impl WaitCondition for ShellIsActive {
    fn test(&mut self) -> bool {
        let outcome = self.lookup.active_shell().and_then(|shell| {
            let title = self.lookup.title(&shell)?;
            self.title.matches(&title)
        });
        probe(outcome, &mut self.fatal)
    }

    fn description(&self) -> String {
        format!("active shell has title that {}", self.title)
    }

    fn take_fatal_error(&mut self) -> Option<RedDeerError> {
        self.fatal.take()
    }
}

/// A selector resolves. The widget found by the last successful poll is kept.
pub struct WidgetIsFound {
    resolver: WidgetResolver,
    selector: Selector,
    found: Option<Widget>,
    fatal: Option<RedDeerError>,
}

impl WidgetIsFound {
    pub fn new(resolver: WidgetResolver, selector: Selector) -> Self {
        Self {
            resolver,
            selector,
            found: None,
            fatal: None,
        }
    }

    pub fn widget(&self) -> Option<&Widget> {
        self.found.as_ref()
    }

    pub fn into_widget(self) -> Option<Widget> {
        self.found
    }
}

impl WaitCondition for WidgetIsFound {
    fn test(&mut self) -> bool {
        let outcome = self.resolver.find(&self.selector).map(|widget| {
            self.found = Some(widget);
        });
        if outcome.is_err() {
            self.found = None;
        }
        probe(outcome.map(|_| true), &mut self.fatal)
    }

    fn description(&self) -> String {
        format!("widget {} is found", self.selector)
    }

    fn take_fatal_error(&mut self) -> Option<RedDeerError> {
        self.fatal.take()
    }
}

/// A widget's display text satisfies a matcher.
pub struct WidgetTextMatches {
    dispatcher: UiDispatcher,
    widget: Widget,
    matcher: TextMatcher,
    last_text: Option<String>,
    fatal: Option<RedDeerError>,
}

impl WidgetTextMatches {
    pub fn new(dispatcher: UiDispatcher, widget: Widget, matcher: TextMatcher) -> Self {
        Self {
            dispatcher,
            widget,
            matcher,
            last_text: None,
            fatal: None,
        }
    }
}

impl WaitCondition for WidgetTextMatches {
    fn test(&mut self) -> bool {
        let widget = self.widget.clone();
        let outcome = self
            .dispatcher
            .run_on_ui_thread(move || widget.raw().text())
            .and_then(|text| {
                let matched = self.matcher.matches(&text);
                self.last_text = Some(text);
                matched
            });
        probe(outcome, &mut self.fatal)
    }

    fn description(&self) -> String {
        format!("text of {} {}", self.widget.describe(), self.matcher)
    }

    fn error_message_until(&self) -> String {
        match &self.last_text {
            Some(text) => format!("{} (last text was '{text}')", self.description()),
            None => format!("{} is not fulfilled", self.description()),
        }
    }

    fn take_fatal_error(&mut self) -> Option<RedDeerError> {
        self.fatal.take()
    }
}

//! Predicates over widgets and widget-derived strings.
//!
//! Matchers are immutable values built by the caller for one lookup. They are
//! evaluated on the UI thread by the resolver; a list of matchers is AND-ed
//! left to right and stops at the first one that rejects a widget.

pub mod text;
pub mod version;

pub use text::{strip_mnemonic, LazyRegex, TextMatcher};
pub use version::{Version, VersionExpression, VersionMatcher, VersionOperator};

use crate::errors::RedDeerResult;
use crate::lookup::label;
use crate::widget::{Style, Widget, WidgetKind};
use std::fmt;
use std::sync::Arc;

type WidgetPredicate = Arc<dyn Fn(&Widget) -> RedDeerResult<bool> + Send + Sync>;

#[derive(Clone)]
pub enum Matcher {
    /// Display text of the widget
    Text(TextMatcher),
    /// Concrete widget type
    Kind(WidgetKind),
    /// All given style bits are set
    Style(Style),
    /// Text of the label associated with an input control
    Label(TextMatcher),
    Tooltip(TextMatcher),
    Custom {
        description: String,
        predicate: WidgetPredicate,
    },
}

impl Matcher {
    pub fn text(text: impl Into<String>) -> Self {
        Matcher::Text(TextMatcher::equals(text))
    }

    pub fn mnemonic_text(text: impl Into<String>) -> Self {
        Matcher::Text(TextMatcher::mnemonic(text))
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Matcher::Text(TextMatcher::regex(pattern))
    }

    pub fn kind(kind: WidgetKind) -> Self {
        Matcher::Kind(kind)
    }

    pub fn style(style: Style) -> Self {
        Matcher::Style(style)
    }

    pub fn label(text: impl Into<String>) -> Self {
        Matcher::Label(TextMatcher::equals(text))
    }

    pub fn tooltip(text: impl Into<String>) -> Self {
        Matcher::Tooltip(TextMatcher::equals(text))
    }

    pub fn custom<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Widget) -> RedDeerResult<bool> + Send + Sync + 'static,
    {
        Matcher::Custom {
            description: description.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluates the matcher against a live widget. UI thread only.
    ///
    /// Widgets lacking the inspected capability do not match; they are not an
    /// error.
    pub fn matches(&self, widget: &Widget) -> RedDeerResult<bool> {
        let kind = widget.kind();
        match self {
            Matcher::Text(matcher) => {
                if !kind.has_text() {
                    return Ok(false);
                }
                matcher.matches(&widget.raw().text()?)
            }
            Matcher::Kind(expected) => Ok(kind == *expected),
            Matcher::Style(style) => Ok(widget.style().contains(*style)),
            Matcher::Label(matcher) => {
                if !label::has_label(widget) {
                    return Ok(false);
                }
                match label::label_of(widget)? {
                    Some(text) => matcher.matches(&text),
                    None => Ok(false),
                }
            }
            Matcher::Tooltip(matcher) => {
                if !kind.has_tooltip() {
                    return Ok(false);
                }
                match widget.raw().tooltip()? {
                    Some(tooltip) => matcher.matches(&tooltip),
                    None => Ok(false),
                }
            }
            Matcher::Custom { predicate, .. } => predicate(widget),
        }
    }

    /// AND-combination of `matchers`, evaluated left to right.
    pub fn all_match(matchers: &[Matcher], widget: &Widget) -> RedDeerResult<bool> {
        for matcher in matchers {
            if !matcher.matches(widget)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Text(m) => write!(f, "text {m}"),
            Matcher::Kind(kind) => write!(f, "kind is {kind}"),
            Matcher::Style(style) => write!(f, "style contains {:#x}", style.bits()),
            Matcher::Label(m) => write!(f, "label {m}"),
            Matcher::Tooltip(m) => write!(f, "tooltip {m}"),
            Matcher::Custom { description, .. } => f.write_str(description),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matcher({self})")
    }
}

/// Joins matcher descriptions for error messages.
pub fn describe_all(matchers: &[Matcher]) -> String {
    if matchers.is_empty() {
        return "any widget".to_string();
    }
    matchers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" and ")
}

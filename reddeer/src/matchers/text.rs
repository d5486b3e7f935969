use crate::errors::{RedDeerError, RedDeerResult};
use crate::matchers::version::VersionMatcher;
use once_cell::sync::OnceCell;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Keyboard accelerator marker embedded in display text.
pub const MNEMONIC_MARKER: char = '&';

/// Removes mnemonic markers: a single `&` is dropped, `&&` stands for a
/// literal ampersand.
pub fn strip_mnemonic(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == MNEMONIC_MARKER {
            if chars.peek() == Some(&MNEMONIC_MARKER) {
                out.push(MNEMONIC_MARKER);
                chars.next();
            }
            continue;
        }
        out.push(c);
    }
    out
}

type StringPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Predicate over a widget-derived string.
#[derive(Clone)]
pub enum TextMatcher {
    /// Case-sensitive exact equality
    Equals(String),
    /// Equality after stripping mnemonic markers from both sides
    Mnemonic(String),
    /// Substring containment
    Contains(String),
    /// Regular expression, compiled on first use
    Regex(LazyRegex),
    /// Version range expression
    Version(VersionMatcher),
    /// Arbitrary predicate with a description for diagnostics
    Custom {
        description: String,
        predicate: StringPredicate,
    },
}

impl TextMatcher {
    pub fn equals(text: impl Into<String>) -> Self {
        TextMatcher::Equals(text.into())
    }

    pub fn mnemonic(text: impl Into<String>) -> Self {
        TextMatcher::Mnemonic(text.into())
    }

    pub fn contains(text: impl Into<String>) -> Self {
        TextMatcher::Contains(text.into())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        TextMatcher::Regex(LazyRegex::new(pattern))
    }

    pub fn version(expression: impl Into<String>) -> Self {
        TextMatcher::Version(VersionMatcher::new(expression))
    }

    pub fn custom<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        TextMatcher::Custom {
            description: description.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn matches(&self, value: &str) -> RedDeerResult<bool> {
        match self {
            TextMatcher::Equals(expected) => Ok(value == expected),
            TextMatcher::Mnemonic(expected) => {
                Ok(strip_mnemonic(value) == strip_mnemonic(expected))
            }
            TextMatcher::Contains(needle) => Ok(value.contains(needle.as_str())),
            TextMatcher::Regex(regex) => Ok(regex.get()?.is_match(value)),
            TextMatcher::Version(matcher) => matcher.matches(value),
            TextMatcher::Custom { predicate, .. } => Ok(predicate(value)),
        }
    }
}

impl fmt::Display for TextMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextMatcher::Equals(text) => write!(f, "is equal to '{text}'"),
            TextMatcher::Mnemonic(text) => write!(f, "matches mnemonic text '{text}'"),
            TextMatcher::Contains(text) => write!(f, "contains '{text}'"),
            TextMatcher::Regex(regex) => write!(f, "matches regex '{}'", regex.pattern()),
            TextMatcher::Version(matcher) => write!(f, "{matcher}"),
            TextMatcher::Custom { description, .. } => f.write_str(description),
        }
    }
}

impl fmt::Debug for TextMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextMatcher({self})")
    }
}

/// Regex source with a compile-once cache. Compilation errors surface when
/// the matcher is first evaluated.
#[derive(Clone)]
pub struct LazyRegex {
    pattern: String,
    compiled: Arc<OnceCell<Result<Regex, String>>>,
}

impl LazyRegex {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            compiled: Arc::new(OnceCell::new()),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn get(&self) -> RedDeerResult<&Regex> {
        self.compiled
            .get_or_init(|| Regex::new(&self.pattern).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|e| {
                RedDeerError::UnmatchedFormat(format!("Invalid regex '{}': {e}", self.pattern))
            })
    }
}

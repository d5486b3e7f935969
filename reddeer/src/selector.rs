use crate::errors::{RedDeerError, RedDeerResult};
use crate::matchers::{Matcher, TextMatcher};
use crate::widget::{Widget, WidgetKind};
use std::fmt;
use std::str::FromStr;

/// Identifies "the Nth widget under a root satisfying all matchers".
///
/// Without a root, lookups search the active shell. The index is 0-based.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    root: Option<Widget>,
    index: usize,
    matchers: Vec<Matcher>,
}

impl Selector {
    pub fn new(matchers: Vec<Matcher>) -> Self {
        Self {
            root: None,
            index: 0,
            matchers,
        }
    }

    /// Restrict the search to descendants of `root`
    pub fn within(mut self, root: Widget) -> Self {
        self.root = Some(root);
        self
    }

    pub fn nth(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn and(mut self, matcher: Matcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    pub fn root(&self) -> Option<&Widget> {
        self.root.as_ref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Parses the textual selector form.
    ///
    /// Parts are chained with `>>` and AND-ed:
    ///
    /// - `kind:button`, `text:Save`, `mnemonic:Save`, `regex:^Sa.*`,
    ///   `contains:ave`, `label:Name:`, `tooltip:Search`, `version:>=1.0`
    /// - `nth:1` (or `nth=1`) sets the index
    /// - `button|Save` is shorthand for `kind:button >> mnemonic:Save`
    pub fn parse(s: &str) -> RedDeerResult<Self> {
        let mut selector = Selector::default();
        for part in s.split(">>").map(str::trim) {
            if part.is_empty() {
                return Err(RedDeerError::InvalidArgument(format!(
                    "Empty selector part in \"{s}\""
                )));
            }
            if let Some((kind, text)) = part.split_once('|') {
                selector.matchers.push(Matcher::Kind(kind.trim().parse()?));
                selector.matchers.push(Matcher::mnemonic_text(text.trim()));
                continue;
            }
            let lower = part.to_lowercase();
            if let Some(index) = lower
                .strip_prefix("nth:")
                .or_else(|| lower.strip_prefix("nth="))
            {
                selector.index = index.trim().parse::<usize>().map_err(|_| {
                    RedDeerError::InvalidArgument(format!(
                        "Invalid index for nth selector: '{index}'"
                    ))
                })?;
                continue;
            }
            let Some((prefix, value)) = part.split_once(':') else {
                return Err(RedDeerError::InvalidArgument(format!(
                    "Unknown selector format: \"{part}\". Use prefixes like 'kind:', 'text:', 'mnemonic:', 'regex:', 'label:', 'tooltip:' or 'nth:'."
                )));
            };
            let matcher = match prefix.to_lowercase().as_str() {
                "kind" | "role" => Matcher::Kind(value.parse::<WidgetKind>()?),
                "text" => Matcher::text(value),
                "mnemonic" => Matcher::mnemonic_text(value),
                "regex" => Matcher::regex(value),
                "contains" => Matcher::Text(TextMatcher::contains(value)),
                "version" => Matcher::Text(TextMatcher::version(value)),
                "label" => Matcher::label(value),
                "tooltip" => Matcher::tooltip(value),
                other => {
                    return Err(RedDeerError::InvalidArgument(format!(
                        "Unknown selector prefix '{other}' in \"{part}\""
                    )))
                }
            };
            selector.matchers.push(matcher);
        }
        Ok(selector)
    }
}

impl FromStr for Selector {
    type Err = RedDeerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl From<Matcher> for Selector {
    fn from(matcher: Matcher) -> Self {
        Selector::new(vec![matcher])
    }
}

impl From<Vec<Matcher>> for Selector {
    fn from(matchers: Vec<Matcher>) -> Self {
        Selector::new(matchers)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] index {}",
            crate::matchers::describe_all(&self.matchers),
            self.index
        )?;
        if let Some(root) = &self.root {
            write!(f, " within {}", root.describe())?;
        }
        Ok(())
    }
}

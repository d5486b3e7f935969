//! Version range matching.
//!
//! Supported expressions:
//!
//! ```text
//! >X.Y.Z     >=X.Y     <X     <=X.Y
//! X.Y                          (equality)
//! [X.Y;X.Z]  [X.Y;X.Z)  (X.Y;X.Z]  (X.Y;X.Z)
//! ```
//!
//! Parsing is deferred to match time: a malformed expression or candidate is
//! reported as [`RedDeerError::UnmatchedFormat`] when it is evaluated.

use crate::errors::{RedDeerError, RedDeerResult};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Dot separated numeric version, compared component-wise with missing
/// trailing components treated as zero.
#[derive(Debug, Clone)]
pub struct Version(Vec<u64>);

impl Version {
    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl FromStr for Version {
    type Err = RedDeerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RedDeerError::UnmatchedFormat(
                "Empty version string".to_string(),
            ));
        }
        trimmed
            .split('.')
            .map(|part| {
                part.parse::<u64>().map_err(|_| {
                    RedDeerError::UnmatchedFormat(format!(
                        "Version component '{part}' in '{trimmed}' is not a number"
                    ))
                })
            })
            .collect::<RedDeerResult<Vec<_>>>()
            .map(Version)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let a = self.0.get(i).copied().unwrap_or(0);
            let b = other.0.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u64::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOperator {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    /// Interval; the flags say whether the lower/upper bound is inclusive.
    Range {
        lower_inclusive: bool,
        upper_inclusive: bool,
    },
    Equal,
}

/// Parsed form of a version expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionExpression {
    pub operator: VersionOperator,
    pub operands: Vec<Version>,
}

impl VersionExpression {
    pub fn parse(expression: &str) -> RedDeerResult<Self> {
        let expr = expression.trim();
        let malformed = |reason: &str| {
            RedDeerError::UnmatchedFormat(format!(
                "Version expression '{expression}' {reason}"
            ))
        };

        let (operator, body) = if let Some(rest) = expr.strip_prefix(">=") {
            (VersionOperator::GreaterOrEqual, rest)
        } else if let Some(rest) = expr.strip_prefix("<=") {
            (VersionOperator::LessOrEqual, rest)
        } else if let Some(rest) = expr.strip_prefix('>') {
            (VersionOperator::Greater, rest)
        } else if let Some(rest) = expr.strip_prefix('<') {
            (VersionOperator::Less, rest)
        } else if expr.starts_with('[') || expr.starts_with('(') {
            let upper_inclusive = if expr.ends_with(']') {
                true
            } else if expr.ends_with(')') {
                false
            } else {
                return Err(malformed("has an unterminated interval"));
            };
            if expr.len() < 2 {
                return Err(malformed("has an empty interval"));
            }
            (
                VersionOperator::Range {
                    lower_inclusive: expr.starts_with('['),
                    upper_inclusive,
                },
                &expr[1..expr.len() - 1],
            )
        } else {
            (VersionOperator::Equal, expr)
        };

        let operands = body
            .split(';')
            .map(str::parse::<Version>)
            .collect::<RedDeerResult<Vec<_>>>()
            .map_err(|e| malformed(&format!("has a bad operand: {e}")))?;

        let expected = match operator {
            VersionOperator::Range { .. } => 2,
            _ => 1,
        };
        if operands.len() != expected {
            return Err(malformed(&format!(
                "needs {expected} operand(s), found {}",
                operands.len()
            )));
        }

        Ok(Self { operator, operands })
    }

    pub fn is_satisfied_by(&self, version: &Version) -> bool {
        let first = &self.operands[0];
        match self.operator {
            VersionOperator::Greater => version > first,
            VersionOperator::GreaterOrEqual => version >= first,
            VersionOperator::Less => version < first,
            VersionOperator::LessOrEqual => version <= first,
            VersionOperator::Equal => version == first,
            VersionOperator::Range {
                lower_inclusive,
                upper_inclusive,
            } => {
                let upper = &self.operands[1];
                let above = if lower_inclusive {
                    version >= first
                } else {
                    version > first
                };
                let below = if upper_inclusive {
                    version <= upper
                } else {
                    version < upper
                };
                above && below
            }
        }
    }
}

/// Matches version strings against a version expression such as `>=1.1.0`
/// or `[1.0;2.0)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMatcher {
    expression: String,
}

impl VersionMatcher {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn matches(&self, candidate: &str) -> RedDeerResult<bool> {
        let expression = VersionExpression::parse(&self.expression)?;
        let version = candidate.parse::<Version>()?;
        Ok(expression.is_satisfied_by(&version))
    }
}

impl fmt::Display for VersionMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "matches string to version '{}'", self.expression)
    }
}

use std::time::Duration;
use thiserror::Error;

use crate::widget::WidgetKind;

#[derive(Error, Debug)]
pub enum RedDeerError {
    #[error("Widget not found: {0}")]
    WidgetNotFound(String),

    #[error("Unsupported widget type: {operation} is not supported by {kind}")]
    UnsupportedWidgetType {
        operation: &'static str,
        kind: WidgetKind,
    },

    #[error("Timeout after: {}.: {detail}", format_timeout(timeout))]
    WaitTimeoutExpired {
        timeout: Duration,
        description: String,
        detail: String,
    },

    #[error("Display is not available: {0}")]
    DisplayUnavailable(String),

    #[error("Unmatched format: {0}")]
    UnmatchedFormat(String),

    #[error("Widget is disposed: {0}")]
    WidgetDisposed(String),

    #[error("Invalid thread access: {0}")]
    InvalidThreadAccess(String),

    #[error("Operation panicked on the UI thread: {0}")]
    OperationPanicked(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RedDeerError {
    /// Errors that indicate environment misuse or a caller bug rather than a
    /// UI state the test could wait out.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RedDeerError::DisplayUnavailable(_) | RedDeerError::UnsupportedWidgetType { .. }
        )
    }

    pub(crate) fn unsupported(operation: &'static str, kind: WidgetKind) -> Self {
        RedDeerError::UnsupportedWidgetType { operation, kind }
    }
}

pub type RedDeerResult<T> = Result<T, RedDeerError>;

/// Whole seconds as `N s`, anything finer in `Debug` form (`600ms`, `1.5s`).
fn format_timeout(timeout: &Duration) -> String {
    if timeout.subsec_nanos() == 0 {
        format!("{} s", timeout.as_secs())
    } else {
        format!("{timeout:?}")
    }
}

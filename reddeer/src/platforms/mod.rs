use crate::errors::RedDeerResult;
use crate::widget::Widget;

pub mod memory;

/// A unit of work queued onto the UI thread.
pub type UiJob = Box<dyn FnOnce() + Send + 'static>;

/// What the core needs from a live toolkit: an event loop it can post work to
/// and read access to the top-level widgets.
///
/// `shells`, `active_shell` and `focused_widget` read live state and must be
/// called on the UI thread.
pub trait DisplayEngine: Send + Sync {
    /// Append `job` to the UI thread's event queue. Jobs run in the order
    /// they were scheduled. Fails with `DisplayUnavailable` once the event
    /// loop is gone.
    fn schedule(&self, job: UiJob) -> RedDeerResult<()>;

    /// Whether the calling thread is the UI thread
    fn is_ui_thread(&self) -> bool;

    fn is_disposed(&self) -> bool;

    /// Open top-level shells in creation order
    fn shells(&self) -> RedDeerResult<Vec<Widget>>;

    fn active_shell(&self) -> RedDeerResult<Option<Widget>>;

    fn focused_widget(&self) -> RedDeerResult<Option<Widget>>;

    /// Enable downcasting to concrete engine types
    fn as_any(&self) -> &dyn std::any::Any;
}

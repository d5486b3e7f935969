mod config_tests;
mod dispatcher_tests;
mod matcher_tests;
mod selector_tests;
mod wait_tests;

use crate::{MemoryDisplay, Session, Widget, WidgetSpec};

// Initialize tracing for tests
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_test_writer()
        .try_init();
}

/// A session on a fresh in-memory display, disposed when the fixture drops.
pub struct DisplayFixture {
    pub session: Session,
    pub display: MemoryDisplay,
}

impl DisplayFixture {
    pub fn new() -> Self {
        init_tracing();
        let (session, display) = Session::in_memory().expect("Failed to start display");
        Self { session, display }
    }

    /// Opens `spec` as a new active shell.
    pub fn open(&self, spec: WidgetSpec) -> Widget {
        let display = self.display.clone();
        self.session
            .run_on_ui_thread(move || display.open_shell(spec))
            .expect("Failed to open shell")
    }
}

impl Drop for DisplayFixture {
    fn drop(&mut self) {
        self.display.dispose();
    }
}

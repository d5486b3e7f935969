//! Widget operations, one handler per capability area.

pub mod button;
pub mod widget;

pub use button::ButtonHandler;
pub use widget::WidgetHandler;

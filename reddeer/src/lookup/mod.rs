//! Widget tree lookup: matcher-driven resolution, label association and
//! shell lookup.

pub mod label;
pub mod resolver;
pub mod shell;

pub use label::{clean_label, label_of};
pub use resolver::{collect_matches, WidgetResolver};
pub use shell::ShellLookup;

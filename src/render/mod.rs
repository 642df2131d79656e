//! Terminal rendering of the report

pub mod terminal;
pub mod theme;
pub mod widgets;

pub use terminal::TerminalReport;
pub use theme::Theme;

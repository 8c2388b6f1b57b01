//! Terminal plotting without a TUI.

pub mod ascii;

pub use ascii::render_ascii_chart;

//! `quote-chart` library crate.
//!
//! The binary (`qc`) is a thin wrapper around this library so that:
//!
//! - quote fetching, normalization and the search flow are testable without a terminal
//! - the chart model is shared by the TUI and the ASCII plot

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;

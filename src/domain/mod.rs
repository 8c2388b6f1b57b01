//! Domain types used throughout the app.
//!
//! This module defines:
//!
//! - range and granularity tokens (`Range`, `Granularity`, `granularity_for`)
//! - the canonical series record (`QuoteSeries`, `Point`)
//! - label and direction helpers shared by the summary and the chart

pub mod types;

pub use types::*;

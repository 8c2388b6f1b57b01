//! Fetching and normalizing quote-chart data.

pub mod chart_api;
pub mod config;
pub mod normalize;

pub use chart_api::{ChartClient, QuoteRequest, QuoteSource, build_request_url, parse_envelope};
pub use config::ClientConfig;
pub use normalize::normalize;

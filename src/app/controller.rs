//! Search controller shared by the CLI and TUI front-ends.
//!
//! Owns the transient input state (symbol text, range), the search phase, and
//! the chart renderer. The workflow is always:
//! validate -> fetch/normalize -> summary + chart, or -> one error message.
//!
//! The CLI and the TUI then focus on presentation (printing vs widgets).

use tracing::{debug, warn};

use crate::chart::{ChartRenderer, STOCK_CHART_SURFACE};
use crate::data::QuoteSource;
use crate::domain::{QuoteSeries, Range};
use crate::error::QuoteError;
use crate::report::{Summary, summarize};

pub const DEFAULT_SYMBOL: &str = "AAPL";

/// Idle → Loading → {Displayed, ErrorShown} → Loading → …
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Displayed,
    ErrorShown,
}

/// Identifies one search; only the newest ticket may complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub id: u64,
    pub symbol: String,
    pub range: Range,
}

/// Trim and uppercase user input.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub struct SearchController<S> {
    source: S,
    symbol_input: String,
    range: Range,
    phase: Phase,
    error: Option<(QuoteError, String)>,
    summary: Option<Summary>,
    series: Option<QuoteSeries>,
    chart: ChartRenderer,
    latest_ticket: u64,
}

impl<S: QuoteSource> SearchController<S> {
    pub fn new(source: S, symbol: &str, range: Range) -> Self {
        Self {
            source,
            symbol_input: symbol.to_string(),
            range,
            phase: Phase::Idle,
            error: None,
            summary: None,
            series: None,
            chart: ChartRenderer::new(STOCK_CHART_SURFACE),
            latest_ticket: 0,
        }
    }

    pub fn symbol_input(&self) -> &str {
        &self.symbol_input
    }

    pub fn set_symbol_input(&mut self, text: &str) {
        self.symbol_input = text.to_string();
    }

    pub fn push_char(&mut self, c: char) {
        self.symbol_input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.symbol_input.pop();
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn set_range(&mut self, range: Range) {
        self.range = range;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Text for the error region.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|(_, text)| text.as_str())
    }

    pub fn last_error(&self) -> Option<&QuoteError> {
        self.error.as_ref().map(|(err, _)| err)
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn series(&self) -> Option<&QuoteSeries> {
        self.series.as_ref()
    }

    pub fn chart(&self) -> &ChartRenderer {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut ChartRenderer {
        &mut self.chart
    }

    /// Validate the input and enter `Loading`.
    ///
    /// Returns `None` (and shows the validation message) for an empty symbol;
    /// no request must be made in that case.
    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        let symbol = normalize_symbol(&self.symbol_input);
        if symbol.is_empty() {
            let err = QuoteError::EmptySymbol;
            let text = err.to_string();
            self.error = Some((err, text));
            self.phase = Phase::ErrorShown;
            return None;
        }

        self.latest_ticket += 1;
        self.error = None;
        self.phase = Phase::Loading;
        debug!(ticket = self.latest_ticket, %symbol, range = %self.range, "search started");

        Some(SearchTicket {
            id: self.latest_ticket,
            symbol,
            range: self.range,
        })
    }

    /// Perform the single network call for a ticket.
    pub fn fetch(&self, ticket: &SearchTicket) -> Result<QuoteSeries, QuoteError> {
        self.source.fetch_series(&ticket.symbol, ticket.range.as_str())
    }

    /// Apply a fetch outcome. Outcomes for superseded tickets are dropped and
    /// `false` is returned.
    pub fn complete_search(&mut self, ticket: &SearchTicket, outcome: Result<QuoteSeries, QuoteError>) -> bool {
        if ticket.id != self.latest_ticket {
            debug!(ticket = ticket.id, latest = self.latest_ticket, "dropping stale search result");
            return false;
        }

        match outcome {
            Ok(series) => {
                self.summary = Some(summarize(&series));
                self.chart.render(&series);
                self.series = Some(series);
                self.error = None;
                self.phase = Phase::Displayed;
            }
            Err(err) => {
                warn!(symbol = %ticket.symbol, range = %ticket.range, error = %err, "search failed");
                self.summary = None;
                let text = format!("Error: {err}");
                self.error = Some((err, text));
                self.phase = Phase::ErrorShown;
            }
        }
        true
    }

    /// Validate, fetch, and apply in one go.
    pub fn search(&mut self) -> Phase {
        if let Some(ticket) = self.begin_search() {
            let outcome = self.fetch(&ticket);
            self.complete_search(&ticket, outcome);
        }
        self.phase
    }
}

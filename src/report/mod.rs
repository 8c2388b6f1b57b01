//! Reporting utilities: the price summary panel and its text formatting.

pub mod format;

pub use format::*;

use crate::domain::{ChangeDirection, QuoteSeries, finite_or_zero};

/// Display-ready summary of one series (header of the TUI, top of `qc quote`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub symbol: String,
    pub exchange_name: String,
    /// Current price as currency.
    pub price: String,
    /// `+$15.00 (+10.00%)`
    pub change: String,
    pub direction: ChangeDirection,
    pub range: String,
    pub granularity: String,
    pub points: usize,
}

/// Build the summary for a freshly loaded series.
pub fn summarize(series: &QuoteSeries) -> Summary {
    Summary {
        symbol: series.symbol.clone(),
        exchange_name: series.exchange_name.clone(),
        price: format_currency(finite_or_zero(series.regular_market_price), &series.currency),
        change: format_change(series),
        direction: series.direction(),
        range: series.range.clone(),
        granularity: series.data_granularity.clone(),
        points: series.points.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalize::price_change;

    fn series(current: Option<f64>, previous: Option<f64>) -> QuoteSeries {
        let (price_change, price_change_percent) = price_change(current, previous);
        QuoteSeries {
            symbol: "AAPL".to_string(),
            currency: "USD".to_string(),
            exchange_name: "NMS".to_string(),
            instrument_type: None,
            regular_market_price: current,
            previous_close: previous,
            chart_previous_close: None,
            data_granularity: "1d".to_string(),
            range: "1mo".to_string(),
            timezone: None,
            gmt_offset_secs: None,
            price_change,
            price_change_percent,
            points: Vec::new(),
        }
    }

    #[test]
    fn rising_price_gets_plus_prefix() {
        let summary = summarize(&series(Some(165.0), Some(150.0)));
        assert_eq!(summary.price, "$165.00");
        assert_eq!(summary.change, "+$15.00 (+10.00%)");
        assert_eq!(summary.direction, ChangeDirection::Positive);
    }

    #[test]
    fn falling_price_keeps_minus_sign_once() {
        let summary = summarize(&series(Some(95.0), Some(100.0)));
        assert_eq!(summary.change, "-$5.00 (-5.00%)");
        assert_eq!(summary.direction, ChangeDirection::Negative);
    }

    #[test]
    fn zero_previous_close_shows_zero_percent() {
        let summary = summarize(&series(Some(12.0), Some(0.0)));
        assert_eq!(summary.change, "+$12.00 (+0.00%)");
    }

    #[test]
    fn missing_prices_show_zeroes() {
        let summary = summarize(&series(None, None));
        assert_eq!(summary.price, "$0.00");
        assert_eq!(summary.change, "+$0.00 (+0.00%)");
        assert_eq!(summary.direction, ChangeDirection::Positive);
    }

    #[test]
    fn cli_summary_lists_fields() {
        let text = format_summary(&summarize(&series(Some(165.0), Some(150.0))));
        assert!(text.starts_with("=== AAPL ===\n"));
        assert!(text.contains("Exchange: NMS"));
        assert!(text.contains("▲ +$15.00 (+10.00%)"));
        assert!(text.contains("Range:    1mo (1d samples, 0 points)"));
    }
}

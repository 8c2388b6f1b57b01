//! Envelope → `QuoteSeries`.
//!
//! The wire schema is already typed by the time it gets here; this step walks
//! the parallel arrays, drops indices without a close, and derives the price
//! change fields.

use crate::data::chart_api::{ChartResult, QuoteArrays, QuoteRequest};
use crate::domain::{Point, QuoteSeries};

const DEFAULT_CURRENCY: &str = "USD";

/// Map a validated result entry into the canonical series.
///
/// Missing metadata falls back to the request (symbol, range, interval).
pub fn normalize(result: ChartResult, request: &QuoteRequest) -> QuoteSeries {
    let ChartResult {
        meta,
        timestamp,
        indicators,
    } = result;

    let empty = QuoteArrays::default();
    let quote = indicators.quote.first().unwrap_or(&empty);
    let adj_close = indicators
        .adjclose
        .as_ref()
        .and_then(|v| v.first())
        .map(|a| a.adjclose.as_slice());

    let points = collect_points(&timestamp, quote, adj_close);
    let (price_change, price_change_percent) =
        price_change(meta.regular_market_price, meta.previous_close);

    QuoteSeries {
        symbol: meta.symbol.unwrap_or_else(|| request.symbol.clone()),
        currency: meta
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        exchange_name: meta.exchange_name.unwrap_or_default(),
        instrument_type: meta.instrument_type,
        regular_market_price: meta.regular_market_price,
        previous_close: meta.previous_close,
        chart_previous_close: meta.chart_previous_close,
        data_granularity: meta
            .data_granularity
            .unwrap_or_else(|| request.granularity.to_string()),
        range: meta.range.unwrap_or_else(|| request.range.clone()),
        timezone: meta.timezone.or(meta.exchange_timezone_name),
        gmt_offset_secs: meta.gmt_offset,
        price_change,
        price_change_percent,
        points,
    }
}

/// One point per index whose close is present and finite, in feed order.
pub fn collect_points(timestamps: &[i64], quote: &QuoteArrays, adj_close: Option<&[Option<f64>]>) -> Vec<Point> {
    let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let mut out = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(close) = at(&quote.close, i).filter(|c| c.is_finite()) else {
            continue;
        };
        out.push(Point {
            timestamp_ms: ts.saturating_mul(1000),
            open: at(&quote.open, i),
            high: at(&quote.high, i),
            low: at(&quote.low, i),
            close,
            volume: at(&quote.volume, i).and_then(to_volume),
            adj_close: match adj_close {
                Some(values) => at(values, i),
                None => Some(close),
            },
        });
    }
    out
}

/// `(current - previous, change / previous * 100)`.
///
/// Either side missing yields `None` for both; a non-finite percent (zero
/// previous close) yields `None` for the percent only.
pub fn price_change(current: Option<f64>, previous: Option<f64>) -> (Option<f64>, Option<f64>) {
    let (Some(current), Some(previous)) = (current, previous) else {
        return (None, None);
    };
    let change = current - previous;
    let percent = change / previous * 100.0;
    (
        Some(change).filter(|v| v.is_finite()),
        Some(percent).filter(|v| v.is_finite()),
    )
}

fn to_volume(v: f64) -> Option<u64> {
    if v.is_finite() && v >= 0.0 {
        Some(v.round() as u64)
    } else {
        None
    }
}

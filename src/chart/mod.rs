//! Chart renderer: owns the single live chart instance for a surface.
//!
//! A `LineChart` is the fully prepared, render-ready description of one series
//! (labels, values, palette, bounds, tooltip cursor). The TUI widget and the
//! ASCII plot both draw from it; neither recomputes anything.

use tracing::debug;

use crate::domain::{ChangeDirection, QuoteSeries};
use crate::report::format_currency;

/// Surface id of the main chart panel.
pub const STOCK_CHART_SURFACE: &str = "stock-chart";

/// Upper bound on x-axis labels.
pub const MAX_X_TICKS: usize = 10;

/// Line/fill colors picked from the sign of the price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub line: (u8, u8, u8),
}

impl Palette {
    pub const POSITIVE: Palette = Palette { line: (46, 204, 113) };
    pub const NEGATIVE: Palette = Palette { line: (231, 76, 60) };

    pub fn for_direction(direction: ChangeDirection) -> Self {
        match direction {
            ChangeDirection::Positive => Self::POSITIVE,
            ChangeDirection::Negative => Self::NEGATIVE,
        }
    }

    /// Palette for a raw change value. A missing change fails `>= 0` and draws red.
    pub fn for_change(change: Option<f64>) -> Self {
        if matches!(change, Some(c) if c >= 0.0) {
            Self::POSITIVE
        } else {
            Self::NEGATIVE
        }
    }

    /// Fill under the line: the line color at 70% opacity.
    pub fn fill_alpha(self) -> f64 {
        0.7
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub surface: String,
    /// Dataset label, e.g. `AAPL Stock Price`.
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub currency: String,
    pub palette: Palette,
    pub y_bounds: [f64; 2],
    cursor: Option<usize>,
}

impl LineChart {
    pub fn from_series(surface: &str, series: &QuoteSeries) -> Self {
        let labels = series.points.iter().map(|p| series.point_label(p)).collect();
        let values: Vec<f64> = series.points.iter().map(|p| p.close).collect();
        let y_bounds = padded_bounds(series.close_bounds());
        let cursor = values.len().checked_sub(1);

        Self {
            surface: surface.to_string(),
            title: format!("{} Stock Price", series.symbol),
            labels,
            values,
            currency: series.currency.clone(),
            palette: Palette::for_change(series.price_change),
            y_bounds,
            cursor,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// X runs over point indices, so gaps in trading hours collapse.
    pub fn x_bounds(&self) -> [f64; 2] {
        let last = self.values.len().saturating_sub(1) as f64;
        [0.0, last.max(1.0)]
    }

    /// `(index, close)` pairs for line drawing.
    pub fn series_points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, v))
            .collect()
    }

    /// Label of the point nearest to an x coordinate.
    pub fn label_at(&self, x: f64) -> String {
        if !x.is_finite() || x < -0.5 {
            return String::new();
        }
        let idx = x.round() as usize;
        self.labels.get(idx).cloned().unwrap_or_default()
    }

    /// X tick label. Plotters may place ticks between points; those stay blank
    /// so a short series never repeats a date.
    pub fn axis_label(&self, x: f64) -> String {
        if x.fract() != 0.0 {
            return String::new();
        }
        self.label_at(x)
    }

    /// Y tick label.
    pub fn format_value(&self, v: f64) -> String {
        format_currency(v, &self.currency)
    }

    /// Indices that get an x label, evenly spread, at most `max_ticks`.
    pub fn tick_indices(&self, max_ticks: usize) -> Vec<usize> {
        let n = self.values.len();
        if n == 0 || max_ticks == 0 {
            return Vec::new();
        }
        if n <= max_ticks {
            return (0..n).collect();
        }
        if max_ticks == 1 {
            return vec![0];
        }
        let mut out: Vec<usize> = (0..max_ticks)
            .map(|k| ((k * (n - 1)) as f64 / (max_ticks - 1) as f64).round() as usize)
            .collect();
        out.dedup();
        out
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Move the tooltip cursor, clamped to the data.
    pub fn move_cursor(&mut self, delta: isize) {
        let Some(last) = self.values.len().checked_sub(1) else {
            self.cursor = None;
            return;
        };
        let cur = self.cursor.unwrap_or(last) as isize;
        self.cursor = Some(cur.saturating_add(delta).clamp(0, last as isize) as usize);
    }

    /// `Mar 4  AAPL Stock Price: $171.20` for the point under the cursor.
    pub fn tooltip(&self) -> Option<String> {
        let idx = self.cursor?;
        let value = self.values.get(idx)?;
        let label = self.labels.get(idx).map(String::as_str).unwrap_or("");
        Some(format!("{label}  {}: {}", self.title, self.format_value(*value)))
    }
}

fn padded_bounds(bounds: Option<(f64, f64)>) -> [f64; 2] {
    let Some((lo, hi)) = bounds.filter(|(lo, hi)| lo.is_finite() && hi.is_finite()) else {
        return [0.0, 1.0];
    };
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        (lo.abs() * 0.01).max(0.01)
    };
    [lo - pad, hi + pad]
}

/// Owns the chart instance attached to one surface.
///
/// `render` always destroys the previous instance before creating the next,
/// so at most one chart is alive per renderer.
#[derive(Debug)]
pub struct ChartRenderer {
    surface: String,
    current: Option<LineChart>,
    created: u64,
}

impl ChartRenderer {
    pub fn new(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            current: None,
            created: 0,
        }
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn render(&mut self, series: &QuoteSeries) -> &LineChart {
        self.destroy();
        self.created += 1;
        debug!(
            surface = %self.surface,
            symbol = %series.symbol,
            generation = self.created,
            "creating chart"
        );
        self.current.insert(LineChart::from_series(&self.surface, series))
    }

    pub fn destroy(&mut self) {
        if let Some(old) = self.current.take() {
            debug!(surface = %self.surface, title = %old.title, "destroying chart");
        }
    }

    pub fn current(&self) -> Option<&LineChart> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut LineChart> {
        self.current.as_mut()
    }

    pub fn active_instances(&self) -> usize {
        usize::from(self.current.is_some())
    }

    /// How many charts this renderer has created so far.
    pub fn generation(&self) -> u64 {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;

    fn series(closes: &[f64], change: Option<f64>, range: &str) -> QuoteSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Point {
                // 2024-03-04 14:30 UTC plus one day per point
                timestamp_ms: 1_709_562_600_000 + i as i64 * 86_400_000,
                open: None,
                high: None,
                low: None,
                close,
                volume: None,
                adj_close: Some(close),
            })
            .collect();
        QuoteSeries {
            symbol: "AAPL".to_string(),
            currency: "USD".to_string(),
            exchange_name: "NMS".to_string(),
            instrument_type: None,
            regular_market_price: closes.last().copied(),
            previous_close: None,
            chart_previous_close: None,
            data_granularity: "1d".to_string(),
            range: range.to_string(),
            timezone: None,
            gmt_offset_secs: None,
            price_change: change,
            price_change_percent: None,
            points,
        }
    }

    #[test]
    fn rendering_twice_leaves_one_instance() {
        let s = series(&[1.0, 2.0, 3.0], Some(1.0), "1mo");
        let mut renderer = ChartRenderer::new(STOCK_CHART_SURFACE);
        assert_eq!(renderer.active_instances(), 0);

        renderer.render(&s);
        renderer.render(&s);
        assert_eq!(renderer.active_instances(), 1);
        assert_eq!(renderer.generation(), 2);
        assert_eq!(renderer.current().unwrap().surface, "stock-chart");

        renderer.destroy();
        assert_eq!(renderer.active_instances(), 0);
    }

    #[test]
    fn palette_follows_change_sign() {
        let up = LineChart::from_series("s", &series(&[1.0], Some(0.0), "1d"));
        assert_eq!(up.palette, Palette::POSITIVE);
        assert_eq!(up.palette.line, (46, 204, 113));

        let down = LineChart::from_series("s", &series(&[1.0], Some(-0.01), "1d"));
        assert_eq!(down.palette, Palette::NEGATIVE);
    }

    #[test]
    fn unknown_change_draws_negative_palette() {
        let missing = series(&[1.0, 2.0], None, "1mo");
        assert_eq!(missing.direction(), ChangeDirection::Positive);
        assert_eq!(LineChart::from_series("s", &missing).palette, Palette::NEGATIVE);

        let nan = LineChart::from_series("s", &series(&[1.0], Some(f64::NAN), "1d"));
        assert_eq!(nan.palette, Palette::NEGATIVE);
    }

    #[test]
    fn labels_depend_on_range() {
        let month = LineChart::from_series("s", &series(&[1.0, 2.0], None, "1mo"));
        assert_eq!(month.labels, vec!["Mar 4", "Mar 5"]);
        let year = LineChart::from_series("s", &series(&[1.0], None, "1y"));
        assert_eq!(year.labels, vec!["Mar 2024"]);
        let day = LineChart::from_series("s", &series(&[1.0], None, "1d"));
        assert_eq!(day.labels, vec!["14:30"]);
        assert_eq!(day.title, "AAPL Stock Price");
    }

    #[test]
    fn tooltip_and_axis_use_currency() {
        let mut chart = LineChart::from_series("s", &series(&[100.0, 1234.5], None, "1mo"));
        assert_eq!(chart.tooltip().as_deref(), Some("Mar 5  AAPL Stock Price: $1,234.50"));
        chart.move_cursor(-5);
        assert_eq!(chart.cursor(), Some(0));
        assert_eq!(chart.tooltip().as_deref(), Some("Mar 4  AAPL Stock Price: $100.00"));
        chart.move_cursor(10);
        assert_eq!(chart.cursor(), Some(1));
        assert_eq!(chart.format_value(99.5), "$99.50");
        assert_eq!(chart.label_at(0.9), "Mar 5");
        assert_eq!(chart.label_at(7.0), "");
    }

    #[test]
    fn axis_labels_only_on_whole_points() {
        let chart = LineChart::from_series("s", &series(&[1.0, 2.0], None, "1mo"));
        let labels: Vec<String> = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0]
            .iter()
            .map(|&x| chart.axis_label(x))
            .filter(|l| !l.is_empty())
            .collect();
        assert_eq!(labels, vec!["Mar 4", "Mar 5"]);
    }

    #[test]
    fn ticks_are_capped() {
        let closes: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let chart = LineChart::from_series("s", &series(&closes, None, "1y"));
        let ticks = chart.tick_indices(MAX_X_TICKS);
        assert_eq!(ticks.len(), MAX_X_TICKS);
        assert_eq!(ticks.first(), Some(&0));
        assert_eq!(ticks.last(), Some(&99));

        let short = LineChart::from_series("s", &series(&[1.0, 2.0, 3.0], None, "1y"));
        assert_eq!(short.tick_indices(MAX_X_TICKS), vec![0, 1, 2]);
    }

    #[test]
    fn bounds_are_padded_and_safe() {
        let chart = LineChart::from_series("s", &series(&[100.0, 200.0], None, "1y"));
        assert_eq!(chart.y_bounds, [95.0, 205.0]);

        let flat = LineChart::from_series("s", &series(&[50.0, 50.0], None, "1y"));
        assert!(flat.y_bounds[1] > flat.y_bounds[0]);

        let empty = LineChart::from_series("s", &series(&[], None, "1y"));
        assert!(empty.is_empty());
        assert_eq!(empty.y_bounds, [0.0, 1.0]);
        assert_eq!(empty.x_bounds(), [0.0, 1.0]);
        assert_eq!(empty.tooltip(), None);
    }
}

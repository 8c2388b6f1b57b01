//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built once per search by the normalizer
//! - handed to the summary view and the chart renderer
//! - exported to JSON/CSV and reloaded later for plotting

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Requested historical window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Range {
    #[serde(rename = "1d")]
    #[value(name = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    #[value(name = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    #[value(name = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    #[value(name = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    #[value(name = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    #[value(name = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    #[value(name = "5y")]
    FiveYears,
}

impl Range {
    /// Selector order, shortest window first.
    pub const ALL: [Range; 7] = [
        Range::OneDay,
        Range::FiveDays,
        Range::OneMonth,
        Range::ThreeMonths,
        Range::SixMonths,
        Range::OneYear,
        Range::FiveYears,
    ];

    /// Wire token used in the `range=` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Range::OneDay => "1d",
            Range::FiveDays => "5d",
            Range::OneMonth => "1mo",
            Range::ThreeMonths => "3mo",
            Range::SixMonths => "6mo",
            Range::OneYear => "1y",
            Range::FiveYears => "5y",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Range::OneDay => "1 day",
            Range::FiveDays => "5 days",
            Range::OneMonth => "1 month",
            Range::ThreeMonths => "3 months",
            Range::SixMonths => "6 months",
            Range::OneYear => "1 year",
            Range::FiveYears => "5 years",
        }
    }

    /// Sampling interval requested for this window.
    pub fn granularity(self) -> Granularity {
        match self {
            Range::OneDay => Granularity::FiveMinutes,
            Range::FiveDays => Granularity::FifteenMinutes,
            Range::OneMonth | Range::ThreeMonths | Range::SixMonths => Granularity::Daily,
            Range::OneYear => Granularity::Weekly,
            Range::FiveYears => Granularity::Monthly,
        }
    }

    /// How x-axis labels are written for this window.
    pub fn label_style(self) -> LabelStyle {
        match self {
            Range::OneDay => LabelStyle::TimeOfDay,
            Range::FiveDays => LabelStyle::DayAndTime,
            Range::OneMonth | Range::ThreeMonths | Range::SixMonths => LabelStyle::MonthDay,
            Range::OneYear | Range::FiveYears => LabelStyle::MonthYear,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Range {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Range::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown range '{s}'"))
    }
}

/// Sampling interval used within a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1wk")]
    Weekly,
    #[serde(rename = "1mo")]
    Monthly,
}

impl Granularity {
    /// Wire token used in the `interval=` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::FiveMinutes => "5m",
            Granularity::FifteenMinutes => "15m",
            Granularity::Daily => "1d",
            Granularity::Weekly => "1wk",
            Granularity::Monthly => "1mo",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granularity for an arbitrary range token; unknown tokens sample daily.
pub fn granularity_for(range_token: &str) -> Granularity {
    range_token
        .parse::<Range>()
        .map(Range::granularity)
        .unwrap_or(Granularity::Daily)
}

/// Shape of an x-axis label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// `14:35`
    TimeOfDay,
    /// `Mar 4, 14:35`
    DayAndTime,
    /// `Mar 4`
    MonthDay,
    /// `Mar 2024`
    MonthYear,
}

impl LabelStyle {
    fn pattern(self) -> &'static str {
        match self {
            LabelStyle::TimeOfDay => "%H:%M",
            LabelStyle::DayAndTime => "%b %-d, %H:%M",
            LabelStyle::MonthDay => "%b %-d",
            LabelStyle::MonthYear => "%b %Y",
        }
    }

    pub fn format(self, at: &DateTime<FixedOffset>) -> String {
        at.format(self.pattern()).to_string()
    }
}

/// Label style for an arbitrary range token; unknown tokens use month/day.
pub fn label_style_for(range_token: &str) -> LabelStyle {
    range_token
        .parse::<Range>()
        .map(Range::label_style)
        .unwrap_or(LabelStyle::MonthDay)
}

/// Sign of the series' price change, used for palette and prefix choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Positive,
    Negative,
}

/// One sampled OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Epoch milliseconds.
    pub timestamp_ms: i64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    /// Always present; indices without a close never become points.
    pub close: f64,
    pub volume: Option<u64>,
    /// Adjusted close when the feed has one, otherwise the close.
    pub adj_close: Option<f64>,
}

/// Normalized per-symbol time series plus metadata, scoped to one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSeries {
    pub symbol: String,
    /// ISO currency code; `USD` when the feed omits it.
    pub currency: String,
    pub exchange_name: String,
    pub instrument_type: Option<String>,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub chart_previous_close: Option<f64>,
    pub data_granularity: String,
    pub range: String,
    pub timezone: Option<String>,
    /// Exchange offset from UTC, in seconds.
    pub gmt_offset_secs: Option<i32>,
    /// `current - previous`; `None` when either side is missing.
    pub price_change: Option<f64>,
    /// `change / previous * 100`; `None` when not a finite number.
    pub price_change_percent: Option<f64>,
    pub points: Vec<Point>,
}

impl QuoteSeries {
    /// Price change with the "not computable" case shown as zero.
    pub fn display_change(&self) -> f64 {
        finite_or_zero(self.price_change)
    }

    pub fn display_change_percent(&self) -> f64 {
        finite_or_zero(self.price_change_percent)
    }

    pub fn direction(&self) -> ChangeDirection {
        if self.display_change() >= 0.0 {
            ChangeDirection::Positive
        } else {
            ChangeDirection::Negative
        }
    }

    pub fn label_style(&self) -> LabelStyle {
        label_style_for(&self.range)
    }

    /// Exchange-local time of a point (UTC when the offset is unknown).
    pub fn local_time(&self, point: &Point) -> Option<DateTime<FixedOffset>> {
        let offset = self
            .gmt_offset_secs
            .and_then(FixedOffset::east_opt)
            .or_else(|| FixedOffset::east_opt(0))?;
        DateTime::from_timestamp_millis(point.timestamp_ms).map(|at| at.with_timezone(&offset))
    }

    /// Axis label for a point, per the series' range.
    pub fn point_label(&self, point: &Point) -> String {
        self.local_time(point)
            .map(|at| self.label_style().format(&at))
            .unwrap_or_default()
    }

    /// Lowest and highest close, if any points exist.
    pub fn close_bounds(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|p| p.close);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c))))
    }
}

pub fn finite_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

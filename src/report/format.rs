//! Number and text formatting for terminal output.
//!
//! We keep formatting code in one place so:
//! - the normalizer stays a pure data transformation
//! - the TUI, the CLI and the chart widget print prices the same way

use crate::domain::{ChangeDirection, QuoteSeries};
use crate::report::Summary;

/// Format a value as currency with two decimals and thousands separators,
/// e.g. `$1,234.50`, `-€3.10`, `CHF 12.00`.
///
/// Non-finite values print as zero.
pub fn format_currency(value: f64, currency: &str) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let code = currency.trim().to_ascii_uppercase();
    let code = if code.is_empty() { "USD".to_string() } else { code };

    let amount = group_thousands(&format!("{:.2}", value.abs()));
    let sign = if value < 0.0 && amount.bytes().any(|b| (b'1'..=b'9').contains(&b)) {
        "-"
    } else {
        ""
    };

    match currency_symbol(&code) {
        Some(symbol) => format!("{sign}{symbol}{amount}"),
        None => format!("{sign}{code}\u{a0}{amount}"),
    }
}

/// `10.00%`; non-finite values print as `0.00%`.
pub fn format_percent(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.2}%")
}

/// `+` for non-negative changes; negative numbers carry their own sign.
pub fn change_prefix(direction: ChangeDirection) -> &'static str {
    match direction {
        ChangeDirection::Positive => "+",
        ChangeDirection::Negative => "",
    }
}

/// `+$15.00 (+10.00%)` / `-$5.00 (-3.23%)`.
pub fn format_change(series: &QuoteSeries) -> String {
    let prefix = change_prefix(series.direction());
    format!(
        "{prefix}{} ({prefix}{})",
        format_currency(series.display_change(), &series.currency),
        format_percent(series.display_change_percent()),
    )
}

/// Multi-line summary for the one-shot CLI.
pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", summary.symbol));
    if !summary.exchange_name.is_empty() {
        out.push_str(&format!("Exchange: {}\n", summary.exchange_name));
    }
    out.push_str(&format!("Price:    {}\n", summary.price));
    let arrow = match summary.direction {
        ChangeDirection::Positive => "▲",
        ChangeDirection::Negative => "▼",
    };
    out.push_str(&format!("Change:   {arrow} {}\n", summary.change));
    out.push_str(&format!(
        "Range:    {} ({} samples, {} points)\n",
        summary.range, summary.granularity, summary.points
    ));
    out
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CNY" => "CN¥",
        "INR" => "₹",
        "KRW" => "₩",
        "ILS" => "₪",
        "CAD" => "CA$",
        "AUD" => "A$",
        "NZD" => "NZ$",
        "HKD" => "HK$",
        "MXN" => "MX$",
        "BRL" => "R$",
        "TWD" => "NT$",
        _ => return None,
    };
    Some(symbol)
}

fn group_thousands(fixed: &str) -> String {
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed, ""));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if frac_part.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac_part}")
    }
}

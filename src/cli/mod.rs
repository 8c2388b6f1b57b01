//! Command-line parsing for the quote chart viewer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from fetching, normalization and rendering.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::controller::DEFAULT_SYMBOL;
use crate::domain::Range;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "qc", version, about = "Ticker price summary and chart viewer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI (type a symbol, pick a range, Enter to search).
    Tui(SearchArgs),
    /// Fetch once, print the summary and an ASCII chart, optionally export.
    Quote(QuoteArgs),
    /// Plot a previously exported series JSON.
    Plot(PlotArgs),
}

/// Where to search and how to reach the quote service.
#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    /// Ticker symbol (trimmed and uppercased before searching).
    #[arg(short = 's', long, default_value = DEFAULT_SYMBOL)]
    pub symbol: String,

    /// Time range.
    #[arg(short = 'r', long, value_enum, default_value_t = Range::OneMonth)]
    pub range: Range,

    /// Override the chart endpoint (default: QC_BASE_URL or the public endpoint).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Route requests through a relay prefix; pass "" to disable QC_RELAY_URL.
    #[arg(long)]
    pub relay: Option<String>,
}

/// Options for the one-shot `quote` command.
#[derive(Debug, Args, Clone)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Disable the ASCII chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export points to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the whole series to JSON (readable by `qc plot`).
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for plotting a saved series.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Series JSON file produced by `qc quote --export-json`.
    #[arg(long, value_name = "JSON")]
    pub series: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_defaults() {
        let cli = Cli::try_parse_from(["qc", "quote"]).unwrap();
        let Command::Quote(args) = cli.command else {
            panic!("expected quote");
        };
        assert_eq!(args.search.symbol, "AAPL");
        assert_eq!(args.search.range, Range::OneMonth);
        assert!(!args.no_plot);
        assert_eq!(args.width, 80);
    }

    #[test]
    fn range_tokens_parse() {
        let cli = Cli::try_parse_from(["qc", "tui", "-s", "msft", "-r", "5y"]).unwrap();
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(args.symbol, "msft");
        assert_eq!(args.range, Range::FiveYears);
    }

    #[test]
    fn unknown_range_is_rejected() {
        assert!(Cli::try_parse_from(["qc", "quote", "-r", "10y"]).is_err());
    }
}

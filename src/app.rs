//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - builds the quote client from env + flags
//! - hands off to the TUI or runs a one-shot search
//! - prints reports/plots and writes optional exports

use clap::Parser;

use crate::chart::{LineChart, STOCK_CHART_SURFACE};
use crate::cli::{Command, PlotArgs, QuoteArgs, SearchArgs};
use crate::data::{ChartClient, ClientConfig};
use crate::error::AppError;

pub mod controller;

use controller::{Phase, SearchController};

/// Entry point for the `qc` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `qc` and `qc -s MSFT` to behave like `qc tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Quote(args) => handle_quote(args),
        Command::Plot(args) => handle_plot(args),
    }
}

/// Build the HTTP client: environment first, then CLI overrides.
pub fn client_from_args(args: &SearchArgs) -> Result<ChartClient, AppError> {
    let config = ClientConfig::from_env()?.with_overrides(args.base_url.as_deref(), args.relay.as_deref());
    ChartClient::new(config)
}

fn handle_tui(args: SearchArgs) -> Result<(), AppError> {
    crate::logging::init_for_tui()?;
    let client = client_from_args(&args)?;
    crate::tui::run(SearchController::new(client, &args.symbol, args.range))
}

fn handle_quote(args: QuoteArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let client = client_from_args(&args.search)?;
    let mut controller = SearchController::new(client, &args.search.symbol, args.search.range);

    if controller.search() != Phase::Displayed {
        let message = controller.error_message().unwrap_or("Search failed.").to_string();
        let code = controller
            .last_error()
            .map(|err| AppError::from(err.clone()).exit_code())
            .unwrap_or(4);
        return Err(AppError::new(code, message));
    }

    if let Some(summary) = controller.summary() {
        println!("{}", crate::report::format_summary(summary));
    }

    if !args.no_plot {
        if let Some(chart) = controller.chart().current() {
            println!("{}", crate::plot::render_ascii_chart(chart, args.width, args.height));
        }
    }

    // Optional exports.
    if let Some(series) = controller.series() {
        if let Some(path) = &args.export {
            crate::io::export::write_points_csv(path, series)?;
        }
        if let Some(path) = &args.export_json {
            crate::io::series::write_series_json(path, series)?;
        }
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let series = crate::io::series::read_series_json(&args.series)?;

    println!("{}", crate::report::format_summary(&crate::report::summarize(&series)));
    let chart = LineChart::from_series(STOCK_CHART_SURFACE, &series);
    println!("{}", crate::plot::render_ascii_chart(&chart, args.width, args.height));
    Ok(())
}

/// Rewrite argv so `qc` defaults to `qc tui`.
///
/// Rules:
/// - `qc`                      -> `qc tui`
/// - `qc -s MSFT ...`          -> `qc tui -s MSFT ...`
/// - `qc --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "quote" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

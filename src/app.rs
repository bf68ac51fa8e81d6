//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the dataset once and runs queries against it
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, DataArgs, ForecastArgs, ProjectArgs, SampleArgs, TrendsArgs};
use crate::data::sample::{write_sample_csv, SampleConfig};
use crate::data::store::Dataset;
use crate::domain::{Indicator, NATIONAL_TARGET_PCT};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `fid` binary.
pub fn run() -> Result<(), AppError> {
    // We want `fid` and `fid --data x.csv` to behave like `fid tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Overview(args) => handle_overview(args),
        Command::Trends(args) => handle_trends(args),
        Command::Forecast(args) => handle_forecast(args),
        Command::Project(args) => handle_project(args),
        Command::Sample(args) => handle_sample(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_overview(args: DataArgs) -> Result<(), AppError> {
    let config = args.query_config();
    let run = pipeline::run_query(&config)?;

    println!(
        "{}",
        crate::report::format_overview(&run.views, &run.dataset.stats())
    );
    Ok(())
}

fn handle_trends(args: TrendsArgs) -> Result<(), AppError> {
    let config = args.data.query_config();
    let dataset = Dataset::load(&config)?;
    let view = pipeline::view(&dataset, args.indicator);

    println!("{}", crate::report::format_series_table(&view));

    if args.plot.enabled() && !view.series.is_empty() {
        let plot = crate::plot::render_trend_plot(
            &view.series,
            None,
            None,
            args.plot.width,
            args.plot.height,
        );
        println!("{plot}");
    }

    if let Some(path) = &args.export {
        crate::io::export::write_series_csv(path, &view.series)?;
        println!("Exported series to '{}'.", path.display());
    }

    Ok(())
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let config = args.data.query_config();
    let dataset = Dataset::load(&config)?;
    let view = pipeline::view(&dataset, args.indicator);

    println!("{}", crate::report::format_forecast(&view));

    if args.plot.enabled() {
        if let Ok(forecast) = &view.forecast {
            let plot = crate::plot::render_trend_plot(
                &view.series,
                Some(forecast),
                None,
                args.plot.width,
                args.plot.height,
            );
            println!("{plot}");
        }
    }

    if let Some(path) = &args.export_forecast {
        // The interactive display degrades to an advisory, but an explicit
        // export request that cannot be satisfied is a hard failure.
        match &view.forecast {
            Ok(forecast) => {
                crate::io::export::write_forecast_json(path, &view.series, forecast)?;
                println!("Exported forecast to '{}'.", path.display());
            }
            Err(err) => {
                return Err(AppError::new(3, format!("Cannot export forecast: {err}")));
            }
        }
    }

    Ok(())
}

fn handle_project(args: ProjectArgs) -> Result<(), AppError> {
    let config = args.data.query_config();
    let dataset = Dataset::load(&config)?;
    let view = pipeline::view(&dataset, Indicator::AccountOwnership);

    println!("{}", crate::report::format_projection(&view));

    if args.plot.enabled() {
        if let Ok(forecast) = &view.forecast {
            let plot = crate::plot::render_trend_plot(
                &view.series,
                Some(forecast),
                Some(NATIONAL_TARGET_PCT),
                args.plot.width,
                args.plot.height,
            );
            println!("{plot}");
        }
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        seed: args.seed,
        start_year: args.start_year,
        end_year: args.end_year,
    };
    let summary = write_sample_csv(&args.out, &config)?;

    println!(
        "Wrote {} rows ({} observations) to '{}'.",
        summary.rows_written,
        summary.observation_rows,
        args.out.display(),
    );
    Ok(())
}

fn handle_tui(args: DataArgs) -> Result<(), AppError> {
    crate::tui::run(args.query_config())
}

/// Rewrite argv so `fid` defaults to `fid tui`.
///
/// Rules:
/// - `fid`                      -> `fid tui`
/// - `fid --data x.csv ...`     -> `fid tui --data x.csv ...`
/// - `fid --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "overview" | "trends" | "forecast" | "project" | "sample" | "tui"
    );
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

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["fid"])), args(&["fid", "tui"]));
    }

    #[test]
    fn leading_flags_route_to_tui() {
        assert_eq!(
            rewrite_args(args(&["fid", "--data", "x.csv"])),
            args(&["fid", "tui", "--data", "x.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(
            rewrite_args(args(&["fid", "overview"])),
            args(&["fid", "overview"])
        );
        assert_eq!(rewrite_args(args(&["fid", "--help"])), args(&["fid", "--help"]));
    }
}

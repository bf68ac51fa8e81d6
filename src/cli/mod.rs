//! Command-line parsing for the financial-inclusion dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the query/projection code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{Indicator, QueryConfig};

/// Where the upstream pipeline drops the enriched dataset.
pub const DEFAULT_DATA_PATH: &str = "data/processed/fi_enriched.csv";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fid", version, about = "Financial-Inclusion Trends Dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Latest value per indicator plus a dataset summary.
    Overview(DataArgs),
    /// Historical trend for one indicator (table + optional plot + CSV export).
    Trends(TrendsArgs),
    /// Linear-trend forecast (2025-2027) for one indicator.
    Forecast(ForecastArgs),
    /// Account-ownership projection against the 60% national target.
    Project(ProjectArgs),
    /// Generate a synthetic enriched dataset (deterministic per seed).
    Sample(SampleArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying query pipeline as the subcommands, but
    /// renders results in a terminal UI using Ratatui.
    Tui(DataArgs),
}

/// Dataset location, shared by every command that reads data.
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Path to the enriched dataset CSV.
    ///
    /// Falls back to the `FI_DATA` environment variable (a `.env` file is
    /// honored), then to the conventional pipeline output path.
    #[arg(long)]
    pub data: Option<PathBuf>,
}

impl DataArgs {
    pub fn query_config(&self) -> QueryConfig {
        dotenvy::dotenv().ok();
        let data_path = self
            .data
            .clone()
            .or_else(|| std::env::var_os("FI_DATA").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        QueryConfig { data_path }
    }
}

/// ASCII plot options, shared by the chart-rendering commands.
#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 18)]
    pub height: usize,
}

impl PlotArgs {
    pub fn enabled(&self) -> bool {
        self.plot && !self.no_plot
    }
}

/// Options for the `trends` command.
#[derive(Debug, Parser)]
pub struct TrendsArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Indicator to display.
    #[arg(short = 'i', long, value_enum, default_value_t = Indicator::AccountOwnership)]
    pub indicator: Indicator,

    /// Re-export the filtered series to a CSV file.
    #[arg(long)]
    pub export: Option<PathBuf>,

    #[command(flatten)]
    pub plot: PlotArgs,
}

/// Options for the `forecast` command.
#[derive(Debug, Parser)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Indicator to forecast.
    #[arg(short = 'i', long, value_enum, default_value_t = Indicator::AccountOwnership)]
    pub indicator: Indicator,

    /// Export the fitted line + forecast points to JSON.
    #[arg(long = "export-forecast")]
    pub export_forecast: Option<PathBuf>,

    #[command(flatten)]
    pub plot: PlotArgs,
}

/// Options for the `project` command.
#[derive(Debug, Parser)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub plot: PlotArgs,
}

/// Options for the `sample` command.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Where to write the generated CSV.
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    pub out: PathBuf,

    /// Random seed (same seed, same dataset).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First survey year (inclusive).
    #[arg(long, default_value_t = 2014)]
    pub start_year: i32,

    /// Last survey year (inclusive).
    #[arg(long, default_value_t = 2024)]
    pub end_year: i32,
}

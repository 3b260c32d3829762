use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "farmsight",
    version,
    about = "Crop field water balance and irrigation advisor"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate soil moisture and irrigation decisions from a weather CSV
    Simulate {
        /// Weather CSV (date,tmin_c,tmax_c[,tmean_c][,rain_mm]); defaults to data.weather_csv
        #[arg(short, long)]
        weather: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Forecast one daily series
    Forecast {
        /// CSV with a date column; defaults to data.ndvi_csv, then data.weather_csv
        #[arg(short, long)]
        series: Option<PathBuf>,

        /// Column to forecast (ndvi, tmin_c, tmax_c, tmean_c, rain_mm, ...)
        #[arg(long)]
        column: Option<String>,

        /// Days to forecast; overrides forecast.horizon_days
        #[arg(long)]
        horizon: Option<usize>,

        /// Rolling mean window in days; overrides forecast.rolling_window_days
        #[arg(long)]
        window: Option<usize>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Fetch the OpenWeatherMap forecast and simulate the coming days
    Weather {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Validate config and test connections
    Check,
    /// Re-run interactive setup
    Init,
}

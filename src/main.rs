use anyhow::{bail, Context, Result};
use clap::Parser;
use farmsight::cli::{Cli, Commands};
use farmsight::config::Config;
use farmsight::datasources::{self, OpenWeatherMapClient};
use farmsight::logic::calculations::summarize;
use farmsight::logic::forecasting::clean_series;
use farmsight::logic::{run_water_balance, ForecastEstimator, IrrigationEngine};
use farmsight::models::{DailyWeatherRecord, ForecastMethod, SeriesPoint};
use farmsight::output::{self, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr so CSV/JSON on stdout stays clean
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => run_init(cli.config.as_ref()),
        Commands::Check => run_check(cli.config).await,
        Commands::Simulate { weather, format } => {
            let config = Config::load(cli.config)?;
            let path = weather
                .or_else(|| config.data.weather_csv.clone())
                .context("No weather file: pass --weather or set data.weather_csv")?;
            let records = datasources::load_weather_csv(&path)
                .with_context(|| format!("Failed to load weather from {}", path.display()))?;
            simulate(&config, &records, format)
        }
        Commands::Forecast {
            series,
            column,
            horizon,
            window,
            format,
        } => {
            let config = Config::load(cli.config)?;
            let horizon = horizon.unwrap_or(config.forecast.horizon_days);
            let window = window.unwrap_or(config.forecast.rolling_window_days);
            let (history, column) = load_forecast_series(&config, series, column)?;

            let estimator = match config.forecast.model {
                ForecastMethod::Seasonal => ForecastEstimator::new(window)?,
                ForecastMethod::RollingMean => ForecastEstimator::fallback_only(window)?,
            };
            let forecast = estimator.forecast(&history, horizon)?;
            let history = clean_series(&history);
            print!(
                "{}",
                output::render_forecast(&column, &history, &forecast, format)?
            );
            Ok(())
        }
        Commands::Weather { format } => {
            let config = Config::load(cli.config)?;
            let owm = config
                .openweathermap()
                .context("OpenWeatherMap is not configured (openweathermap.api_key)")?;
            let client = OpenWeatherMapClient::new(owm, &config.site);
            let records = client.fetch_daily().await?;
            if records.is_empty() {
                bail!("OpenWeatherMap returned no forecast days");
            }
            simulate(&config, &records, format)
        }
    }
}

fn simulate(config: &Config, records: &[DailyWeatherRecord], format: OutputFormat) -> Result<()> {
    let balance = run_water_balance(records, &config.soil_parameters())?;
    let engine = IrrigationEngine::new(config.irrigation_parameters())?
        .with_wilting_point(config.soil.wilting_point_mm);
    let (decisions, recommendations) = engine.evaluate(&balance)?;

    let summary = summarize(&balance, &decisions);
    let rows = output::simulation_rows(&balance, &decisions);
    print!(
        "{}",
        output::render_simulation(&rows, &summary, &recommendations, format)?
    );
    Ok(())
}

/// Resolve which file and column to forecast.
///
/// An explicit `--series` file wins, then the configured NDVI file for the
/// `ndvi` column, then a column of the configured weather file.
fn load_forecast_series(
    config: &Config,
    series: Option<PathBuf>,
    column: Option<String>,
) -> Result<(Vec<SeriesPoint>, String)> {
    if let Some(path) = series {
        let column = column.unwrap_or_else(|| "ndvi".to_string());
        let points = datasources::load_series_csv(&path, &column)
            .with_context(|| format!("Failed to load '{}' from {}", column, path.display()))?;
        let points = if column.eq_ignore_ascii_case("ndvi") {
            datasources::local::rescale_modis(points)
        } else {
            points
        };
        return Ok((points, column));
    }

    let wants_ndvi = column.as_deref().map_or(true, |c| c == "ndvi");
    if wants_ndvi {
        if let Some(path) = &config.data.ndvi_csv {
            let points = datasources::load_ndvi_csv(path)
                .with_context(|| format!("Failed to load NDVI from {}", path.display()))?;
            return Ok((points, "ndvi".to_string()));
        }
    }

    let Some(path) = &config.data.weather_csv else {
        bail!("No series to forecast: pass --series or set data.ndvi_csv / data.weather_csv");
    };
    let column = column
        .filter(|c| c != "ndvi")
        .unwrap_or_else(|| "tmean_c".to_string());
    let records = datasources::load_weather_csv(path)
        .with_context(|| format!("Failed to load weather from {}", path.display()))?;
    let points = datasources::series_from_weather(&records, &column)?;
    Ok((points, column))
}

fn run_init(config_override: Option<&PathBuf>) -> Result<()> {
    if Config::exists(config_override) {
        let overwrite = dialoguer::Confirm::new()
            .with_prompt("A configuration already exists. Overwrite it?")
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Keeping existing configuration.");
            return Ok(());
        }
    }

    let (_, path) = Config::setup_interactive()?;
    println!("Run `farmsight check --config {}` to verify it.", path.display());
    Ok(())
}

async fn run_check(config_override: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config_override)?;
    println!("Config OK: {}", config.site.name);

    let soil = config.soil_parameters();
    let irrigation = config.irrigation_parameters();
    println!(
        "  Soil: FC {:.1} mm, WP {:.1} mm, Kc {:.2} ({} stage)",
        soil.field_capacity_mm, soil.wilting_point_mm, soil.crop_coefficient_kc, config.crop.stage
    );
    println!(
        "  Irrigation: {:.1} mm below {:.1} mm",
        irrigation.irrigation_amount_mm,
        irrigation.threshold_mm()
    );
    println!(
        "  Forecast: {} day(s), {} model, {} day rolling window",
        config.forecast.horizon_days, config.forecast.model, config.forecast.rolling_window_days
    );

    for (label, path) in [
        ("Weather CSV", &config.data.weather_csv),
        ("NDVI CSV", &config.data.ndvi_csv),
    ] {
        match path {
            Some(p) if p.exists() => println!("  {}: {}", label, p.display()),
            Some(p) => println!("  {}: MISSING ({})", label, p.display()),
            None => println!("  {}: not configured", label),
        }
    }

    match config.openweathermap() {
        Some(owm) => {
            let client = OpenWeatherMapClient::new(owm, &config.site);
            match client.test_connection().await {
                Ok(true) => println!("  OpenWeatherMap: OK"),
                Ok(false) => println!("  OpenWeatherMap: rejected (check API key)"),
                Err(e) => println!("  OpenWeatherMap: OFFLINE ({})", e),
            }
        }
        None => println!("  OpenWeatherMap: not configured"),
    }

    Ok(())
}

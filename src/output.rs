use crate::error::{FarmSightError, Result};
use crate::logic::calculations::SeasonSummary;
use crate::models::{
    DailyBalanceRecord, Forecast, IrrigationDecision, Recommendation, SeriesPoint,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// One simulated day joined with its irrigation decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRow {
    pub date: NaiveDate,
    pub eto_mm: f64,
    pub etc_mm: f64,
    pub rain_mm: f64,
    pub drainage_mm: f64,
    pub soil_moisture_mm: f64,
    pub recommend_irrigate: bool,
    pub irrigation_mm: f64,
}

#[derive(Debug, Serialize)]
struct SimulationReport<'a> {
    summary: &'a SeasonSummary,
    days: &'a [SimulationRow],
    recommendations: &'a [Recommendation],
}

#[derive(Debug, Serialize)]
struct ForecastReport<'a> {
    column: &'a str,
    method: String,
    observations: usize,
    last_observation: Option<&'a SeriesPoint>,
    forecast: &'a Forecast,
}

pub fn simulation_rows(
    balance: &[DailyBalanceRecord],
    decisions: &[IrrigationDecision],
) -> Vec<SimulationRow> {
    balance
        .iter()
        .zip(decisions)
        .map(|(b, d)| SimulationRow {
            date: b.date,
            eto_mm: b.eto_mm,
            etc_mm: b.etc_mm,
            rain_mm: b.rain_mm,
            drainage_mm: b.drainage_mm,
            soil_moisture_mm: b.soil_moisture_mm,
            recommend_irrigate: d.recommend_irrigate,
            irrigation_mm: d.irrigation_mm,
        })
        .collect()
}

/// Serialize records as CSV with a header row
pub fn to_csv<T: Serialize>(data: &[T]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| FarmSightError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| FarmSightError::InvalidData(format!("UTF-8 conversion error: {}", e)))
}

pub fn render_simulation(
    rows: &[SimulationRow],
    summary: &SeasonSummary,
    recommendations: &[Recommendation],
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Csv => to_csv(rows),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&SimulationReport {
            summary,
            days: rows,
            recommendations,
        })?),
        OutputFormat::Table => Ok(simulation_table(rows, summary, recommendations)),
    }
}

pub fn render_forecast(
    column: &str,
    history: &[SeriesPoint],
    forecast: &Forecast,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Csv => to_csv(&forecast.points),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ForecastReport {
            column,
            method: forecast.method.to_string(),
            observations: history.len(),
            last_observation: history.last(),
            forecast,
        })?),
        OutputFormat::Table => {
            let mut out = String::new();
            let _ = writeln!(
                out,
                "{} forecast of '{}' from {} observation(s)",
                forecast.method,
                column,
                history.len()
            );
            if let Some(last) = history.last() {
                let _ = writeln!(out, "Last observed: {} = {:.3}", last.date, last.value);
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "{:<12} {:>10}", "Date", "Forecast");
            for point in &forecast.points {
                let _ = writeln!(out, "{:<12} {:>10.3}", point.date, point.yhat);
            }
            Ok(out)
        }
    }
}

fn simulation_table(
    rows: &[SimulationRow],
    summary: &SeasonSummary,
    recommendations: &[Recommendation],
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:>7} {:>7} {:>7} {:>8} {:>9} {:>9}",
        "Date", "ETo", "ETc", "Rain", "Drain", "Moisture", "Irrigate"
    );
    for row in rows {
        let irrigate = if row.recommend_irrigate {
            format!("{:.1}", row.irrigation_mm)
        } else {
            "-".to_string()
        };
        let _ = writeln!(
            out,
            "{:<12} {:>7.2} {:>7.2} {:>7.1} {:>8.1} {:>9.1} {:>9}",
            row.date,
            row.eto_mm,
            row.etc_mm,
            row.rain_mm,
            row.drainage_mm,
            row.soil_moisture_mm,
            irrigate
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Days simulated:    {}", summary.days);
    let _ = writeln!(out, "Total rain:        {:.1} mm", summary.total_rain_mm);
    let _ = writeln!(out, "Total ETc:         {:.1} mm", summary.total_etc_mm);
    let _ = writeln!(out, "Total drainage:    {:.1} mm", summary.total_drainage_mm);
    let _ = writeln!(
        out,
        "Irrigation:        {} day(s), {:.1} mm",
        summary.irrigation_days, summary.total_irrigation_mm
    );
    if let (Some(min), Some(mean)) = (summary.min_soil_moisture_mm, summary.mean_soil_moisture_mm)
    {
        let _ = writeln!(out, "Soil moisture:     min {:.1} mm, mean {:.1} mm", min, mean);
    }

    if !recommendations.is_empty() {
        let _ = writeln!(out);
        for rec in recommendations {
            let _ = writeln!(
                out,
                "{} {} [{}] {}",
                rec.severity.symbol(),
                rec.date,
                rec.severity,
                rec.title
            );
            if let Some(action) = &rec.suggested_action {
                let _ = writeln!(out, "    {}", action);
            }
        }
    }
    out
}

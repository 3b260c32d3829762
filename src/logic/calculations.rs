use crate::models::{DailyBalanceRecord, IrrigationDecision};
use serde::Serialize;

/// Totals over a simulated period
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub days: usize,
    pub total_rain_mm: f64,
    pub total_etc_mm: f64,
    pub total_drainage_mm: f64,
    pub total_irrigation_mm: f64,
    pub irrigation_days: usize,
    pub min_soil_moisture_mm: Option<f64>,
    pub mean_soil_moisture_mm: Option<f64>,
}

/// Calculate total rainfall over a period
pub fn total_rain(balance: &[DailyBalanceRecord]) -> f64 {
    balance.iter().map(|r| r.rain_mm).sum()
}

/// Calculate total crop evapotranspiration over a period
pub fn total_etc(balance: &[DailyBalanceRecord]) -> f64 {
    balance.iter().map(|r| r.etc_mm).sum()
}

pub fn total_drainage(balance: &[DailyBalanceRecord]) -> f64 {
    balance.iter().map(|r| r.drainage_mm).sum()
}

pub fn total_irrigation(decisions: &[IrrigationDecision]) -> f64 {
    decisions.iter().map(|d| d.irrigation_mm).sum()
}

pub fn min_soil_moisture(balance: &[DailyBalanceRecord]) -> Option<f64> {
    balance
        .iter()
        .map(|r| r.soil_moisture_mm)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

/// Calculate average soil moisture over a period
pub fn average_soil_moisture(balance: &[DailyBalanceRecord]) -> Option<f64> {
    if balance.is_empty() {
        None
    } else {
        Some(balance.iter().map(|r| r.soil_moisture_mm).sum::<f64>() / balance.len() as f64)
    }
}

pub fn summarize(balance: &[DailyBalanceRecord], decisions: &[IrrigationDecision]) -> SeasonSummary {
    SeasonSummary {
        days: balance.len(),
        total_rain_mm: total_rain(balance),
        total_etc_mm: total_etc(balance),
        total_drainage_mm: total_drainage(balance),
        total_irrigation_mm: total_irrigation(decisions),
        irrigation_days: decisions.iter().filter(|d| d.recommend_irrigate).count(),
        min_soil_moisture_mm: min_soil_moisture(balance),
        mean_soil_moisture_mm: average_soil_moisture(balance),
    }
}

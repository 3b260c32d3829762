use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Soil water state at the end of one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBalanceRecord {
    pub date: NaiveDate,
    /// Always within [wilting point, field capacity].
    pub soil_moisture_mm: f64,
    pub etc_mm: f64,
    pub eto_mm: f64,
    pub rain_mm: f64,
    /// Water lost above field capacity on this day.
    pub drainage_mm: f64,
}

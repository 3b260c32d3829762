use crate::error::{ensure_finite, FarmSightError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of weather forcing for the water balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeatherRecord {
    pub date: NaiveDate,
    pub tmin_c: f64,
    pub tmax_c: f64,
    pub tmean_c: f64,
    #[serde(default)]
    pub rain_mm: f64,
}

impl DailyWeatherRecord {
    /// Build a dry day; `tmean_c` is derived as the midpoint of min and max.
    pub fn new(date: NaiveDate, tmin_c: f64, tmax_c: f64) -> Self {
        Self {
            date,
            tmin_c,
            tmax_c,
            tmean_c: (tmin_c + tmax_c) / 2.0,
            rain_mm: 0.0,
        }
    }

    pub fn with_tmean(mut self, tmean_c: f64) -> Self {
        self.tmean_c = tmean_c;
        self
    }

    pub fn with_rain(mut self, rain_mm: f64) -> Self {
        self.rain_mm = rain_mm;
        self
    }

    /// Build from optional columns the way file and API producers deliver them.
    pub fn from_parts(
        date: NaiveDate,
        tmin_c: f64,
        tmax_c: f64,
        tmean_c: Option<f64>,
        rain_mm: Option<f64>,
    ) -> Self {
        let record = Self::new(date, tmin_c, tmax_c).with_rain(rain_mm.unwrap_or(0.0));
        match tmean_c {
            Some(t) => record.with_tmean(t),
            None => record,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("tmin_c", self.tmin_c)?;
        ensure_finite("tmax_c", self.tmax_c)?;
        ensure_finite("tmean_c", self.tmean_c)?;
        ensure_finite("rain_mm", self.rain_mm)?;
        if self.rain_mm < 0.0 {
            return Err(FarmSightError::invalid_input(format!(
                "rain_mm must be >= 0 on {}, got {}",
                self.date, self.rain_mm
            )));
        }
        Ok(())
    }
}

/// Sort a weather series ascending by date.
///
/// Records sharing a date collapse to the one that came last in input order.
pub fn sorted_by_date(records: &[DailyWeatherRecord]) -> Vec<DailyWeatherRecord> {
    let mut sorted = records.to_vec();
    // Stable sort keeps input order among equal dates, so "last wins" below holds.
    sorted.sort_by_key(|r| r.date);

    let mut out: Vec<DailyWeatherRecord> = Vec::with_capacity(sorted.len());
    let mut duplicates = 0usize;
    for record in sorted {
        match out.last_mut() {
            Some(prev) if prev.date == record.date => {
                *prev = record;
                duplicates += 1;
            }
            _ => out.push(record),
        }
    }

    if duplicates > 0 {
        tracing::warn!(
            "Dropped {} duplicate weather record(s); the last record per date was kept",
            duplicates
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn new_derives_mean_temperature() {
        let r = DailyWeatherRecord::new(day(1), 10.0, 30.0);
        assert!((r.tmean_c - 20.0).abs() < 1e-12);
        assert_eq!(r.rain_mm, 0.0);
    }

    #[test]
    fn from_parts_prefers_supplied_mean_and_defaults_rain() {
        let r = DailyWeatherRecord::from_parts(day(1), 10.0, 30.0, Some(18.0), None);
        assert_eq!(r.tmean_c, 18.0);
        assert_eq!(r.rain_mm, 0.0);

        let r = DailyWeatherRecord::from_parts(day(1), 10.0, 30.0, None, Some(4.2));
        assert_eq!(r.tmean_c, 20.0);
        assert_eq!(r.rain_mm, 4.2);
    }

    #[test]
    fn validate_rejects_negative_rain_and_nan() {
        assert!(DailyWeatherRecord::new(day(1), 10.0, 20.0)
            .with_rain(-1.0)
            .validate()
            .is_err());
        assert!(DailyWeatherRecord::new(day(1), f64::NAN, 20.0)
            .validate()
            .is_err());
        assert!(DailyWeatherRecord::new(day(1), 10.0, 20.0)
            .with_rain(3.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn sorted_by_date_orders_and_keeps_last_duplicate() {
        let records = vec![
            DailyWeatherRecord::new(day(3), 10.0, 20.0),
            DailyWeatherRecord::new(day(1), 10.0, 20.0).with_rain(1.0),
            DailyWeatherRecord::new(day(2), 10.0, 20.0),
            DailyWeatherRecord::new(day(1), 10.0, 20.0).with_rain(7.0),
        ];

        let sorted = sorted_by_date(&records);
        let dates: Vec<_> = sorted.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
        assert_eq!(sorted[0].rain_mm, 7.0);
    }

    #[test]
    fn sorted_by_date_handles_empty() {
        assert!(sorted_by_date(&[]).is_empty());
    }
}

use super::{future_dates, Forecaster};
use crate::error::{FarmSightError, Result};
use crate::models::{ForecastMethod, ForecastPoint, SeriesPoint};

/// Repeats the mean of the last `window` observations over the whole horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingMeanForecaster {
    window: usize,
}

impl RollingMeanForecaster {
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(FarmSightError::invalid_input(
                "rolling window must be at least 1 observation",
            ));
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Forecaster for RollingMeanForecaster {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::RollingMean
    }

    fn forecast(&self, series: &[SeriesPoint], horizon: usize) -> Result<Vec<ForecastPoint>> {
        let last = series.last().ok_or_else(|| {
            FarmSightError::invalid_input("cannot forecast an empty series")
        })?;

        let tail = &series[series.len().saturating_sub(self.window)..];
        let mean = tail.iter().map(|p| p.value).sum::<f64>() / tail.len() as f64;

        Ok(future_dates(last.date, horizon)?
            .into_iter()
            .map(|date| ForecastPoint { date, yhat: mean })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn daily(values: &[f64]) -> Vec<SeriesPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SeriesPoint::new(start + Duration::days(i as i64), *v))
            .collect()
    }

    #[test]
    fn uses_only_the_trailing_window() {
        let f = RollingMeanForecaster::new(2).unwrap();
        let out = f.forecast(&daily(&[100.0, 1.0, 3.0]), 3).unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|p| (p.yhat - 2.0).abs() < 1e-12));
    }

    #[test]
    fn window_longer_than_series_uses_everything() {
        let f = RollingMeanForecaster::new(30).unwrap();
        let out = f.forecast(&daily(&[1.0, 2.0, 3.0, 6.0]), 1).unwrap();
        assert!((out[0].yhat - 3.0).abs() < 1e-12);
    }

    #[test]
    fn single_observation() {
        let f = RollingMeanForecaster::new(7).unwrap();
        let out = f.forecast(&daily(&[0.62]), 2).unwrap();
        assert_eq!(out[0].yhat, 0.62);
        assert_eq!(out[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn zero_window_rejected() {
        assert!(RollingMeanForecaster::new(0).is_err());
    }
}
